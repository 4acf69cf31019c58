// ============================================================================
// beatgif-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for EncodeConfig
//
// This module implements the builder pattern for EncodeConfig, providing a
// fluent API that starts from the defaults and validates on `build()`.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for EncodeConfig

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::{CropMargins, EncodeConfig, OverlayLayout};
use crate::error::CoreResult;

/// Builder for creating EncodeConfig instances.
///
/// # Examples
///
/// ```rust
/// use beatgif_core::config::EncodeConfigBuilder;
/// use std::time::Duration;
///
/// let config = EncodeConfigBuilder::new()
///     .font_file("/fonts/NotoSansJP.ttf")
///     .cut_duration_secs(8)
///     .palette_size(128)
///     .tool_timeout(Some(Duration::from_secs(60)))
///     .build()
///     .unwrap();
/// assert_eq!(config.palette_size, 128);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodeConfigBuilder {
    config: EncodeConfig,
}

impl EncodeConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration instead of the defaults.
    #[must_use]
    pub fn from_config(config: EncodeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn font_file(mut self, font_file: impl Into<PathBuf>) -> Self {
        self.config.font_file = font_file.into();
        self
    }

    #[must_use]
    pub fn cut_duration_secs(mut self, secs: u32) -> Self {
        self.config.cut_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn frame_rate(mut self, fps: u32) -> Self {
        self.config.frame_rate = fps;
        self
    }

    #[must_use]
    pub fn crop(mut self, crop: CropMargins) -> Self {
        self.config.crop = crop;
        self
    }

    #[must_use]
    pub fn output_width(mut self, width: u32) -> Self {
        self.config.output_width = width;
        self
    }

    #[must_use]
    pub fn palette_size(mut self, colors: u32) -> Self {
        self.config.palette_size = colors;
        self
    }

    #[must_use]
    pub fn overlay(mut self, overlay: OverlayLayout) -> Self {
        self.config.overlay = overlay;
        self
    }

    #[must_use]
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = root.into();
        self
    }

    #[must_use]
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    #[must_use]
    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    /// Sets the bound on each external tool run. `None` disables it.
    #[must_use]
    pub fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    #[must_use]
    pub fn metadata_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.metadata_base_url = url.into();
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<EncodeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
