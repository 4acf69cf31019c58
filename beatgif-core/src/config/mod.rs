//! Configuration structures and constants for the beatgif-core library.
//!
//! `EncodeConfig` is built once at startup (defaults, then an optional TOML
//! file, then environment overrides), validated, and handed to the
//! orchestrator by reference. Its values are copied into every
//! `EncodeRequest`; nothing reads configuration from global state.

mod builder;
mod file;
mod logging;
mod utils;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use builder::EncodeConfigBuilder;
pub use file::{CONFIG_ENV_VAR, ConfigFile, DEFAULT_CONFIG_PATH, load_config};
pub use logging::{DEFAULT_BACKUP_COUNT, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL, LoggingConfig};

// Default constants

/// Default overlay font. Meiryo covers the Japanese song titles common in the catalog.
#[cfg(windows)]
pub const DEFAULT_FONT_FILE: &str = "C:/Windows/Fonts/meiryo.ttc";

/// Default overlay font on non-Windows hosts.
#[cfg(not(windows))]
pub const DEFAULT_FONT_FILE: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Length of the GIF in seconds, cut from the start of the clip.
pub const DEFAULT_CUT_DURATION_SECS: u32 = 10;

/// Output frame rate.
pub const DEFAULT_FRAME_RATE: u32 = 15;

/// Pixels removed from each edge before scaling: (left, top, right, bottom).
pub const DEFAULT_CROP: CropMargins = CropMargins {
    left: 510,
    top: 140,
    right: 510,
    bottom: 40,
};

/// Output width in pixels; height follows the cropped aspect ratio.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 256;

/// Maximum number of colors in the generated palette.
pub const DEFAULT_PALETTE_SIZE: u32 = 64;

pub const DEFAULT_TITLE_FONT_SIZE: u32 = 24;
pub const DEFAULT_CAPTION_FONT_SIZE: u32 = 8;

/// Gap between the bottom edge of the frame and the title line.
pub const DEFAULT_BOTTOM_MARGIN: u32 = 10;

/// Vertical gap between the title line and the caption line above it.
pub const DEFAULT_LINE_SPACING: u32 = 10;

pub const DEFAULT_FONT_COLOR: &str = "white";

/// Root under which `works/` and `gifs/` are created.
pub const DEFAULT_OUTPUT_ROOT: &str = "data";

pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
pub const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Upper bound on a single ffprobe/ffmpeg run.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// Beatmap catalog API root.
pub const DEFAULT_METADATA_BASE_URL: &str = "https://api.beatsaver.com";

/// Palette bounds accepted by ffmpeg's `palettegen`.
pub const PALETTE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 2..=256;

/// Fixed pixel margins removed from each edge of the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropMargins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropMargins {
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn horizontal(&self) -> u64 {
        self.left as u64 + self.right as u64
    }

    #[must_use]
    pub const fn vertical(&self) -> u64 {
        self.top as u64 + self.bottom as u64
    }
}

/// Placement and styling of the two text lines drawn over the GIF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout {
    /// Font size of the title line at the bottom.
    pub title_font_size: u32,
    /// Font size of the "Mapped by" caption above the title.
    pub caption_font_size: u32,
    pub bottom_margin: u32,
    pub line_spacing: u32,
    pub font_color: String,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            caption_font_size: DEFAULT_CAPTION_FONT_SIZE,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            line_spacing: DEFAULT_LINE_SPACING,
            font_color: DEFAULT_FONT_COLOR.to_string(),
        }
    }
}

/// Process-wide, read-only encoding configuration.
///
/// Construct it with [`EncodeConfigBuilder`] or [`load_config`]; both run
/// [`EncodeConfig::validate`] before handing it out.
///
/// # Examples
///
/// ```rust
/// use beatgif_core::config::{CropMargins, EncodeConfigBuilder};
///
/// let config = EncodeConfigBuilder::new()
///     .crop(CropMargins::new(0, 0, 0, 0))
///     .output_width(320)
///     .frame_rate(20)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_width, 320);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Font resource used by both overlay lines
    pub font_file: PathBuf,

    /// Seconds of video, from time zero, that end up in the GIF
    pub cut_duration_secs: u32,

    /// Output frame rate
    pub frame_rate: u32,

    /// Margins cropped from the source before scaling
    pub crop: CropMargins,

    /// Output width in pixels
    pub output_width: u32,

    /// Maximum palette colors (2-256)
    pub palette_size: u32,

    /// Text overlay placement
    pub overlay: OverlayLayout,

    /// Directory under which `works/` and `gifs/` are written
    pub output_root: PathBuf,

    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,

    /// Bound on each external tool run; `None` waits indefinitely
    pub tool_timeout: Option<Duration>,

    /// Root URL of the beatmap catalog API
    pub metadata_base_url: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            font_file: PathBuf::from(DEFAULT_FONT_FILE),
            cut_duration_secs: DEFAULT_CUT_DURATION_SECS,
            frame_rate: DEFAULT_FRAME_RATE,
            crop: DEFAULT_CROP,
            output_width: DEFAULT_OUTPUT_WIDTH,
            palette_size: DEFAULT_PALETTE_SIZE,
            overlay: OverlayLayout::default(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE_PATH),
            tool_timeout: Some(Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS)),
            metadata_base_url: DEFAULT_METADATA_BASE_URL.to_string(),
        }
    }
}

impl EncodeConfig {
    /// Checks that every value can produce a working ffmpeg invocation.
    pub fn validate(&self) -> CoreResult<()> {
        if self.cut_duration_secs == 0 {
            return Err(CoreError::Config(
                "cut duration must be at least 1 second".to_string(),
            ));
        }
        if self.frame_rate == 0 {
            return Err(CoreError::Config("frame rate must be positive".to_string()));
        }
        if self.output_width == 0 {
            return Err(CoreError::Config("output width must be positive".to_string()));
        }
        if !PALETTE_SIZE_RANGE.contains(&self.palette_size) {
            return Err(CoreError::Config(format!(
                "palette size {} is outside {}..={}",
                self.palette_size,
                PALETTE_SIZE_RANGE.start(),
                PALETTE_SIZE_RANGE.end()
            )));
        }
        if self.overlay.title_font_size == 0 || self.overlay.caption_font_size == 0 {
            return Err(CoreError::Config("font sizes must be positive".to_string()));
        }
        if self.overlay.font_color.trim().is_empty() {
            return Err(CoreError::Config("font color must not be empty".to_string()));
        }
        if self.font_file.as_os_str().is_empty() {
            return Err(CoreError::Config("font file path must not be empty".to_string()));
        }
        if self.ffmpeg_path.as_os_str().is_empty() || self.ffprobe_path.as_os_str().is_empty() {
            return Err(CoreError::Config("tool paths must not be empty".to_string()));
        }
        if self.metadata_base_url.trim().is_empty() {
            return Err(CoreError::Config(
                "metadata base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
