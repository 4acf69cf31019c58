//! FFmpeg command and filter graph builders
//!
//! This module provides a builder for the base `FFmpeg` command and a
//! structured filter graph builder. Every user-supplied value interpolated
//! into the graph (font path, overlay text) goes through
//! [`escape_filter_value`], so titles containing `:`, `'`, `,` or `%` cannot
//! break or alter the graph.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;

/// Base `FFmpeg` command for a configured binary, banner suppressed
pub struct FfmpegCommandBuilder {
    ffmpeg_path: PathBuf,
}

impl FfmpegCommandBuilder {
    #[must_use]
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    #[must_use]
    pub fn build(self) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new_with_path(&self.ffmpeg_path);
        cmd.arg("-hide_banner");
        cmd
    }
}

/// Characters with meaning inside a single filter option value.
const OPTION_LEVEL_SPECIAL: &[char] = &['\\', '\'', ':'];

/// Characters with meaning in the filter graph description.
const GRAPH_LEVEL_SPECIAL: &[char] = &['\\', '\'', '[', ']', ',', ';'];

fn backslash_escape(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes a literal for use as a filter option value inside a filter graph.
///
/// Applies both quoting levels ffmpeg parses: the option value level and the
/// graph description level.
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    backslash_escape(
        &backslash_escape(value, OPTION_LEVEL_SPECIAL),
        GRAPH_LEVEL_SPECIAL,
    )
}

/// One `drawtext` layer.
#[derive(Debug, Clone)]
pub struct DrawText<'a> {
    pub font_file: &'a Path,
    pub text: &'a str,
    pub font_size: u32,
    pub font_color: &'a str,
    /// x position expression
    pub x: String,
    /// y position expression
    pub y: String,
}

impl DrawText<'_> {
    fn render(&self) -> String {
        format!(
            "drawtext=fontfile={}:text={}:expansion=none:fontsize={}:fontcolor={}:x={}:y={}",
            escape_filter_value(&self.font_file.to_string_lossy()),
            escape_filter_value(self.text),
            self.font_size,
            escape_filter_value(self.font_color),
            self.x,
            self.y
        )
    }
}

/// Builder for the single-input GIF filter graph.
///
/// Stages are chained with `,` in insertion order; [`FilterGraph::build_with_palette`]
/// closes the chain with the two-pass palette split.
#[derive(Default)]
pub struct FilterGraph {
    filters: Vec<String>,
}

impl FilterGraph {
    /// Creates a new empty filter graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Crops a `width`x`height` rectangle whose top-left corner is at (`x`, `y`)
    #[must_use]
    pub fn crop(mut self, width: u32, height: u32, x: u32, y: u32) -> Self {
        self.filters.push(format!("crop={width}:{height}:{x}:{y}"));
        self
    }

    /// Scales with the lanczos resampler
    #[must_use]
    pub fn scale_lanczos(mut self, width: u32, height: u32) -> Self {
        self.filters.push(format!("scale={width}:{height}:flags=lanczos"));
        self
    }

    #[must_use]
    pub fn fps(mut self, fps: u32) -> Self {
        self.filters.push(format!("fps={fps}"));
        self
    }

    #[must_use]
    pub fn draw_text(mut self, layer: &DrawText<'_>) -> Self {
        self.filters.push(layer.render());
        self
    }

    /// Builds the chain without a palette stage, or `None` when empty
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }

    /// Builds the graph, generating a palette of at most `max_colors` from one
    /// copy of the stream and applying it to the other.
    #[must_use]
    pub fn build_with_palette(self, max_colors: u32) -> String {
        let palette = format!(
            "split[s0][s1];[s0]palettegen=max_colors={max_colors}[p];[s1][p]paletteuse"
        );
        match self.build() {
            Some(chain) => format!("{chain},{palette}"),
            None => palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_matches_ffmpeg_documentation_example() {
        let text = "this is a 'string': may contain one, or more, special characters";
        assert_eq!(
            escape_filter_value(text),
            r"this is a \\\'string\\\'\\: may contain one\, or more\, special characters"
        );
    }

    #[test]
    fn test_escape_plain_text_is_unchanged() {
        assert_eq!(escape_filter_value("Night of Nights"), "Night of Nights");
        assert_eq!(escape_filter_value("100%"), "100%");
    }

    #[test]
    fn test_escape_windows_font_path() {
        assert_eq!(
            escape_filter_value("C:/Windows/Fonts/meiryo.ttc"),
            r"C\\:/Windows/Fonts/meiryo.ttc"
        );
    }

    #[test]
    fn test_escape_graph_delimiters() {
        assert_eq!(escape_filter_value("[a];[b]"), r"\[a\]\;\[b\]");
        assert_eq!(escape_filter_value(r"back\slash"), r"back\\\\slash");
    }

    #[test]
    fn test_filter_graph_empty() {
        assert_eq!(FilterGraph::new().build(), None);
        assert_eq!(
            FilterGraph::new().build_with_palette(64),
            "split[s0][s1];[s0]palettegen=max_colors=64[p];[s1][p]paletteuse"
        );
    }

    #[test]
    fn test_filter_graph_order() {
        let graph = FilterGraph::new()
            .crop(900, 900, 510, 140)
            .scale_lanczos(256, 256)
            .fps(15)
            .build_with_palette(64);
        assert_eq!(
            graph,
            "crop=900:900:510:140,scale=256:256:flags=lanczos,fps=15,\
             split[s0][s1];[s0]palettegen=max_colors=64[p];[s1][p]paletteuse"
        );
    }

    #[test]
    fn test_draw_text_escapes_values() {
        let layer = DrawText {
            font_file: Path::new("/fonts/a.ttf"),
            text: "Re: Zero, 100%",
            font_size: 24,
            font_color: "white",
            x: "(w-tw)/2".to_string(),
            y: "h-th-10".to_string(),
        };
        assert_eq!(
            FilterGraph::new().draw_text(&layer).build().unwrap(),
            r"drawtext=fontfile=/fonts/a.ttf:text=Re\\: Zero\, 100%:expansion=none:fontsize=24:fontcolor=white:x=(w-tw)/2:y=h-th-10"
        );
    }

    #[test]
    fn test_command_builder_hides_banner() {
        let mut cmd = FfmpegCommandBuilder::new("/opt/ffmpeg/bin/ffmpeg").build();
        assert_eq!(cmd.as_inner().get_program(), "/opt/ffmpeg/bin/ffmpeg");
        assert!(cmd.get_args().any(|a| a == "-hide_banner"));
    }
}
