//! Configuration file loading
//!
//! Reads the optional TOML configuration file and layers it between the
//! built-in defaults and the environment overrides:
//!
//! ```toml
//! [encode]
//! font_file = "C:/Windows/Fonts/meiryo.ttc"
//! cut_duration_secs = 10
//! frame_rate = 15
//! crop = [510, 140, 510, 40]   # left, top, right, bottom
//! output_width = 256
//! palette_size = 64
//! output_root = "data"
//!
//! [overlay]
//! title_font_size = 24
//! caption_font_size = 8
//! bottom_margin = 10
//! line_spacing = 10
//! font_color = "white"
//!
//! [tools]
//! ffmpeg = "ffmpeg"
//! ffprobe = "ffprobe"
//! timeout_secs = 300           # 0 disables the timeout
//!
//! [metadata]
//! base_url = "https://api.beatsaver.com"
//!
//! [logging]
//! level = "INFO"
//! log_dir = "logs"
//! backup_count = 7
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use super::utils::{get_env_parsed, get_env_path, get_env_string};
use super::{CropMargins, EncodeConfig, EncodeConfigBuilder, LoggingConfig};
use crate::error::{CoreError, CoreResult};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "BEATGIF_CONFIG";

/// Configuration file picked up when present and no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "configs/beatgif.toml";

/// Parsed configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub encode: EncodeSection,
    pub overlay: OverlaySection,
    pub tools: ToolsSection,
    pub metadata: MetadataSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeSection {
    pub font_file: Option<PathBuf>,
    pub cut_duration_secs: Option<u32>,
    pub frame_rate: Option<u32>,
    pub crop: Option<[u32; 4]>,
    pub output_width: Option<u32>,
    pub palette_size: Option<u32>,
    pub output_root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlaySection {
    pub title_font_size: Option<u32>,
    pub caption_font_size: Option<u32>,
    pub bottom_margin: Option<u32>,
    pub line_spacing: Option<u32>,
    pub font_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub backup_count: Option<usize>,
}

impl ConfigFile {
    /// Parses configuration from TOML text.
    pub fn parse(text: &str) -> CoreResult<Self> {
        toml::from_str(text).map_err(|e| CoreError::Config(format!("invalid configuration file: {e}")))
    }

    /// Reads and parses the file at `path`.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Layers the file's encode settings over `base`.
    pub fn apply_encode(&self, base: EncodeConfig) -> EncodeConfig {
        let mut config = base;
        let encode = &self.encode;
        if let Some(font) = &encode.font_file {
            config.font_file = font.clone();
        }
        if let Some(secs) = encode.cut_duration_secs {
            config.cut_duration_secs = secs;
        }
        if let Some(fps) = encode.frame_rate {
            config.frame_rate = fps;
        }
        if let Some([left, top, right, bottom]) = encode.crop {
            config.crop = CropMargins::new(left, top, right, bottom);
        }
        if let Some(width) = encode.output_width {
            config.output_width = width;
        }
        if let Some(colors) = encode.palette_size {
            config.palette_size = colors;
        }
        if let Some(root) = &encode.output_root {
            config.output_root = root.clone();
        }

        let overlay = &self.overlay;
        if let Some(size) = overlay.title_font_size {
            config.overlay.title_font_size = size;
        }
        if let Some(size) = overlay.caption_font_size {
            config.overlay.caption_font_size = size;
        }
        if let Some(margin) = overlay.bottom_margin {
            config.overlay.bottom_margin = margin;
        }
        if let Some(spacing) = overlay.line_spacing {
            config.overlay.line_spacing = spacing;
        }
        if let Some(color) = &overlay.font_color {
            config.overlay.font_color = color.clone();
        }

        if let Some(ffmpeg) = &self.tools.ffmpeg {
            config.ffmpeg_path = ffmpeg.clone();
        }
        if let Some(ffprobe) = &self.tools.ffprobe {
            config.ffprobe_path = ffprobe.clone();
        }
        if let Some(secs) = self.tools.timeout_secs {
            config.tool_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(url) = &self.metadata.base_url {
            config.metadata_base_url = url.clone();
        }
        config
    }

    /// Layers the file's `[logging]` table over `base`.
    pub fn apply_logging(&self, base: LoggingConfig) -> CoreResult<LoggingConfig> {
        let mut config = base;
        if let Some(level) = &self.logging.level {
            config.level = level.parse::<LevelFilter>().map_err(|_| {
                CoreError::Config(format!("unknown log level '{level}'"))
            })?;
        }
        if let Some(dir) = &self.logging.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(count) = self.logging.backup_count {
            config.backup_count = count;
        }
        Ok(config)
    }
}

/// Applies the `BEATGIF_*` encode overrides.
fn apply_env_overrides(mut config: EncodeConfig) -> EncodeConfig {
    if let Some(font) = get_env_path("BEATGIF_FONT_FILE") {
        config.font_file = font;
    }
    config.cut_duration_secs = get_env_parsed("BEATGIF_CUT_DURATION", config.cut_duration_secs);
    config.frame_rate = get_env_parsed("BEATGIF_FPS", config.frame_rate);
    config.output_width = get_env_parsed("BEATGIF_OUTPUT_WIDTH", config.output_width);
    config.palette_size = get_env_parsed("BEATGIF_PALETTE_SIZE", config.palette_size);
    if let Some(root) = get_env_path("BEATGIF_OUTPUT_ROOT") {
        config.output_root = root;
    }
    config
}

/// Picks the configuration file to read, if any.
///
/// An explicit path or `BEATGIF_CONFIG` must exist; the default location is
/// only used when present.
fn resolve_config_path(explicit: Option<&Path>) -> CoreResult<Option<PathBuf>> {
    let requested = explicit
        .map(Path::to_path_buf)
        .or_else(|| get_env_string(CONFIG_ENV_VAR).map(PathBuf::from));

    match requested {
        Some(path) if path.is_file() => Ok(Some(path)),
        Some(path) => Err(CoreError::Config(format!(
            "configuration file {} does not exist",
            path.display()
        ))),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            Ok(default.is_file().then_some(default))
        }
    }
}

/// Loads the encode and logging configuration: defaults, then the optional
/// file, then environment overrides. The encode configuration is validated.
pub fn load_config(explicit: Option<&Path>) -> CoreResult<(EncodeConfig, LoggingConfig)> {
    let file = match resolve_config_path(explicit)? {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ConfigFile::from_path(&path)?
        }
        None => ConfigFile::default(),
    };

    let encode = apply_env_overrides(file.apply_encode(EncodeConfig::default()));
    let encode = EncodeConfigBuilder::from_config(encode).build()?;
    let logging = file
        .apply_logging(LoggingConfig::default())?
        .with_env_overrides();

    Ok((encode, logging))
}
