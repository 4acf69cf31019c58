//! GIF encode pipeline.
//!
//! One ffmpeg run per output: crop, lanczos scale, frame rate conversion, the
//! two text overlays and the two-pass palette, trimmed to the configured cut
//! length from time zero. The destination is overwritten unconditionally.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{EncodeConfig, OverlayLayout};
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{DrawText, FfmpegCommandBuilder, FfmpegProcess, FfmpegSpawner, FilterGraph};
use crate::processing::geometry::VideoGeometry;
use crate::progress_reporting::{self, ffmpeg_handler::EncodeProgressHandler};

/// Everything needed for one encode. Built once per output and consumed by [`encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub input_path: PathBuf,
    pub song_title: String,
    /// Caption line, `<mapId> - Mapped by <mapper>`.
    pub mapper_label: String,
    /// Overlay label from the file name, shown in brackets before the title.
    pub overlay_text: String,
    pub output_path: PathBuf,
    pub cut_duration_secs: u32,
    pub frame_rate: u32,
    pub palette_size: u32,
    pub font_file: PathBuf,
    pub overlay: OverlayLayout,
    pub ffmpeg_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl EncodeRequest {
    /// Copies the encode settings out of `config`.
    #[must_use]
    pub fn new(
        config: &EncodeConfig,
        input_path: PathBuf,
        song_title: String,
        mapper_label: String,
        overlay_text: String,
        output_path: PathBuf,
    ) -> Self {
        Self {
            input_path,
            song_title,
            mapper_label,
            overlay_text,
            output_path,
            cut_duration_secs: config.cut_duration_secs,
            frame_rate: config.frame_rate,
            palette_size: config.palette_size,
            font_file: config.font_file.clone(),
            overlay: config.overlay.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
            timeout: config.tool_timeout,
        }
    }

    /// Bottom overlay line: `[<label>] <song title>`.
    #[must_use]
    pub fn title_line(&self) -> String {
        format!("[{}] {}", self.overlay_text, self.song_title)
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    pub output_path: PathBuf,
    pub output_size: u64,
    pub elapsed: Duration,
}

/// Builds the `-vf` graph for `request` at `geometry`.
#[must_use]
pub fn build_filter_graph(request: &EncodeRequest, geometry: &VideoGeometry) -> String {
    let layout = &request.overlay;
    let title = request.title_line();
    let title_layer = DrawText {
        font_file: &request.font_file,
        text: &title,
        font_size: layout.title_font_size,
        font_color: &layout.font_color,
        x: "(w-tw)/2".to_string(),
        y: format!("h-th-{}", layout.bottom_margin),
    };
    let caption_layer = DrawText {
        font_file: &request.font_file,
        text: &request.mapper_label,
        font_size: layout.caption_font_size,
        font_color: &layout.font_color,
        x: "(w-tw)/2".to_string(),
        y: format!(
            "h-th-{}",
            layout.bottom_margin + layout.title_font_size + layout.line_spacing
        ),
    };

    FilterGraph::new()
        .crop(
            geometry.cropped_width(),
            geometry.cropped_height(),
            geometry.crop.left,
            geometry.crop.top,
        )
        .scale_lanczos(geometry.output_width, geometry.output_height())
        .fps(request.frame_rate)
        .draw_text(&title_layer)
        .draw_text(&caption_layer)
        .build_with_palette(request.palette_size)
}

/// Encodes one GIF.
///
/// Fails with `FileNotFound` before spawning anything when the input is missing,
/// with `Timeout` (after killing ffmpeg) when the deadline passes, and with
/// `Encode` when ffmpeg exits unsuccessfully.
pub fn encode<S: FfmpegSpawner>(
    spawner: &S,
    request: EncodeRequest,
    geometry: &VideoGeometry,
) -> CoreResult<EncodeStats> {
    if !request.input_path.exists() {
        return Err(CoreError::FileNotFound(request.input_path));
    }

    let graph = build_filter_graph(&request, geometry);
    let cut = request.cut_duration_secs.to_string();

    let mut cmd = FfmpegCommandBuilder::new(&request.ffmpeg_path).build();
    cmd.input(&request.input_path)
        .args(["-vf", graph.as_str()])
        .args(["-ss", "0", "-t", cut.as_str()])
        .overwrite()
        .output(&request.output_path);

    let args: Vec<_> = cmd.get_args().map(|arg| arg.to_string_lossy()).collect();
    log::debug!(
        "Executing command: {} {}",
        request.ffmpeg_path.display(),
        args.join(" ")
    );
    progress_reporting::encode_start(&request.input_path);

    let started = Instant::now();
    let mut process = spawner.spawn(cmd)?;
    let mut handler = EncodeProgressHandler::new(request.cut_duration_secs);

    if let Err(err) = process.handle_events(request.timeout, |event| handler.handle_event(event)) {
        progress_reporting::clear_progress();
        if let Err(kill_err) = process.kill() {
            log::warn!("Failed to kill ffmpeg after error: {kill_err}");
        }
        if let Err(wait_err) = process.wait() {
            log::debug!("Could not reap ffmpeg: {wait_err}");
        }
        return Err(err);
    }
    progress_reporting::clear_progress();

    let status = process.wait()?;
    if !status.success() {
        log::error!(
            "ffmpeg failed for {} with {status}",
            request.output_path.display()
        );
        return Err(command_failed_error(
            "ffmpeg",
            status,
            handler.stderr_buffer().trim_end(),
        ));
    }

    let output_size = std::fs::metadata(&request.output_path)?.len();
    let elapsed = started.elapsed();
    progress_reporting::encode_summary(&request.output_path, elapsed, output_size);
    log::info!(
        "Wrote {} ({} bytes) in {:.1}s",
        request.output_path.display(),
        output_size,
        elapsed.as_secs_f64()
    );

    Ok(EncodeStats {
        output_path: request.output_path,
        output_size,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropMargins, EncodeConfig};
    use crate::processing::geometry::compute_geometry;

    fn request(config: &EncodeConfig, title: &str) -> EncodeRequest {
        EncodeRequest::new(
            config,
            PathBuf::from("clips/1a2b_Expert.mp4"),
            title.to_string(),
            "1a2b - Mapped by Someone".to_string(),
            "Expert".to_string(),
            PathBuf::from("data/gifs/Expert/1a2b.gif"),
        )
    }

    #[test]
    fn request_copies_config_values() {
        let config = EncodeConfig::default();
        let req = request(&config, "Song");
        assert_eq!(req.cut_duration_secs, config.cut_duration_secs);
        assert_eq!(req.frame_rate, config.frame_rate);
        assert_eq!(req.palette_size, config.palette_size);
        assert_eq!(req.font_file, config.font_file);
        assert_eq!(req.title_line(), "[Expert] Song");
    }

    #[test]
    fn filter_graph_for_reference_geometry() {
        let config = EncodeConfig {
            font_file: PathBuf::from("/fonts/a.ttf"),
            ..EncodeConfig::default()
        };
        let geometry =
            compute_geometry(1920, 1080, CropMargins::new(510, 140, 510, 40), 256).unwrap();
        let graph = build_filter_graph(&request(&config, "Song"), &geometry);
        let expected = concat!(
            "crop=900:900:510:140,scale=256:256:flags=lanczos,fps=15,",
            r"drawtext=fontfile=/fonts/a.ttf:text=\[Expert\] Song:expansion=none:fontsize=24:",
            "fontcolor=white:x=(w-tw)/2:y=h-th-10,",
            "drawtext=fontfile=/fonts/a.ttf:text=1a2b - Mapped by Someone:expansion=none:fontsize=8:",
            "fontcolor=white:x=(w-tw)/2:y=h-th-44,",
            "split[s0][s1];[s0]palettegen=max_colors=64[p];[s1][p]paletteuse"
        );
        assert_eq!(graph, expected);
    }

    #[test]
    fn titles_with_graph_syntax_are_escaped() {
        let config = EncodeConfig::default();
        let geometry =
            compute_geometry(1920, 1080, CropMargins::new(510, 140, 510, 40), 256).unwrap();
        let graph = build_filter_graph(&request(&config, "Re: Zero, it's 100%"), &geometry);
        assert!(graph.contains(r"Re\\: Zero\, it\\\'s 100%"));
        assert!(!graph.contains("Re: Zero"));
    }

    #[cfg(unix)]
    mod with_fake_ffmpeg {
        use super::*;
        use crate::external::SidecarSpawner;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use tempfile::tempdir;

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("ffmpeg");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn request_for(dir: &Path, ffmpeg: PathBuf, timeout: Option<Duration>) -> EncodeRequest {
            let input = dir.join("1a2b_Expert.mp4");
            std::fs::write(&input, b"clip").unwrap();
            let config = EncodeConfig {
                ffmpeg_path: ffmpeg,
                tool_timeout: timeout,
                ..EncodeConfig::default()
            };
            EncodeRequest::new(
                &config,
                input,
                "Song".to_string(),
                "1a2b - Mapped by Someone".to_string(),
                "Expert".to_string(),
                dir.join("out.gif"),
            )
        }

        fn geometry() -> VideoGeometry {
            compute_geometry(1920, 1080, CropMargins::new(510, 140, 510, 40), 256).unwrap()
        }

        #[test]
        fn silent_hung_encoder_is_killed_at_the_deadline() {
            let dir = tempdir().unwrap();
            let ffmpeg = write_script(dir.path(), "exec sleep 30");
            let request = request_for(dir.path(), ffmpeg, Some(Duration::from_millis(500)));

            let started = Instant::now();
            let result = encode(&SidecarSpawner, request, &geometry());

            assert!(
                matches!(result, Err(CoreError::Timeout { ref tool, .. }) if tool == "ffmpeg"),
                "{result:?}"
            );
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn error_log_lines_reach_the_encode_error() {
            let dir = tempdir().unwrap();
            let ffmpeg = write_script(
                dir.path(),
                "echo \"[error] No such filter: 'palettegem'\" >&2\n\
                 echo \"[fatal] Error opening output files\" >&2\n\
                 exit 1",
            );
            let request = request_for(dir.path(), ffmpeg, Some(Duration::from_secs(20)));

            let err = encode(&SidecarSpawner, request, &geometry()).unwrap_err();

            match err {
                CoreError::Encode { tool, code, stderr } => {
                    assert_eq!(tool, "ffmpeg");
                    assert_eq!(code, Some(1));
                    assert!(stderr.contains("No such filter: 'palettegem'"), "{stderr}");
                    assert!(stderr.contains("Error opening output files"), "{stderr}");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
