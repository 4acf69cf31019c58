//! FFprobe integration for dimension probing
//!
//! This module runs ffprobe to read the pixel width and height of a clip's
//! first video stream. ffprobe is asked for a bare `width,height` CSV line,
//! and anything that is not exactly two positive integers is reported as
//! `CoreError::Probe` rather than trusted.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{CoreError, CoreResult, command_start_error};

/// Poll interval while waiting on a bounded child process.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Something that can report the pixel dimensions of a video file.
pub trait DimensionProber {
    /// Returns `(width, height)` of the first video stream.
    fn probe_dimensions(&self, input_path: &Path) -> CoreResult<(u32, u32)>;
}

/// `DimensionProber` backed by the ffprobe executable.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfprobeProber {
    #[must_use]
    pub fn new(ffprobe_path: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    fn command(&self, input_path: &Path) -> Command {
        let mut cmd = Command::new(&self.ffprobe_path);
        cmd.args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0",
        ])
        .arg(input_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
        cmd
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_FFPROBE_PATH,
            Some(Duration::from_secs(crate::config::DEFAULT_TOOL_TIMEOUT_SECS)),
        )
    }
}

impl DimensionProber for FfprobeProber {
    fn probe_dimensions(&self, input_path: &Path) -> CoreResult<(u32, u32)> {
        log::debug!("Running ffprobe for dimensions on: {}", input_path.display());

        let child = self
            .command(input_path)
            .spawn()
            .map_err(|e| command_start_error("ffprobe", e))?;
        let (status, stdout, stderr) = wait_with_deadline(child, "ffprobe", self.timeout)?;

        if !status.success() {
            log::error!(
                "ffprobe failed for {} ({}): {}",
                input_path.display(),
                status,
                stderr.trim()
            );
            return Err(CoreError::Probe(format!(
                "ffprobe exited with {} for {}: {}",
                status,
                input_path.display(),
                stderr.trim()
            )));
        }

        parse_dimensions(&stdout).map_err(|e| {
            log::error!("Unusable ffprobe output for {}: {}", input_path.display(), e);
            e
        })
    }
}

/// Waits for `child`, killing it once `timeout` has elapsed.
///
/// Returns the exit status with captured stdout and stderr. Both pipes are
/// drained on their own threads while polling, so a chatty child cannot stall
/// on a full pipe and be mistaken for a hung one.
fn wait_with_deadline(
    mut child: Child,
    tool: &str,
    timeout: Option<Duration>,
) -> CoreResult<(ExitStatus, String, String)> {
    let stdout = child.stdout.take().map(drain_pipe);
    let stderr = child.stderr.take().map(drain_pipe);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                log::error!("{} exceeded {}s, killing it", tool, limit.as_secs());
                let _ = child.kill();
                let _ = child.wait();
                return Err(CoreError::Timeout {
                    tool: tool.to_string(),
                    after: limit,
                });
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok((status, collect_pipe(stdout)?, collect_pipe(stderr)?))
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
}

fn collect_pipe(reader: Option<JoinHandle<io::Result<String>>>) -> CoreResult<String> {
    let Some(handle) = reader else {
        return Ok(String::new());
    };
    match handle.join() {
        Ok(output) => Ok(output?),
        Err(_) => Err(CoreError::Probe("output reader thread panicked".to_string())),
    }
}

/// Parses ffprobe's `width,height` output.
///
/// The first non-empty line must hold exactly two positive integers separated
/// by a comma; a single trailing comma is tolerated.
pub fn parse_dimensions(output: &str) -> CoreResult<(u32, u32)> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| CoreError::Probe("ffprobe reported no video stream".to_string()))?;
    let line = line.strip_suffix(',').unwrap_or(line);

    let mut fields = line.split(',').map(str::trim);
    let (Some(width), Some(height), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(CoreError::Probe(format!(
            "expected 'width,height', got '{line}'"
        )));
    };

    let parse = |field: &str, name: &str| -> CoreResult<u32> {
        match field.parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(CoreError::Probe(format!("invalid {name} '{field}' in '{line}'"))),
        }
    };
    Ok((parse(width, "width")?, parse(height, "height")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_output() {
        assert_eq!(parse_dimensions("1920,1080\n").unwrap(), (1920, 1080));
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_trailing_comma() {
        assert_eq!(parse_dimensions("\n  1280,720,\r\n").unwrap(), (1280, 720));
    }

    #[test]
    fn test_parse_uses_first_line_only() {
        assert_eq!(parse_dimensions("640,480\n1920,1080\n").unwrap(), (640, 480));
    }

    #[test]
    fn test_parse_rejects_malformed_output() {
        for bad in ["", "\n\n", "1920", "1920x1080", "1920,1080,60", "wide,tall", "-1,1080", "0,1080", "N/A,N/A"] {
            assert!(
                matches!(parse_dimensions(bad), Err(CoreError::Probe(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_missing_ffprobe_binary() {
        let prober = FfprobeProber::new("surely-not-an-installed-ffprobe-binary", None);
        let result = prober.probe_dimensions(Path::new("clip.mp4"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }

    #[cfg(unix)]
    mod with_fake_ffprobe {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::tempdir;

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("ffprobe");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn reads_dimensions_from_the_tool() {
            let dir = tempdir().unwrap();
            let ffprobe = write_script(dir.path(), "echo 1920,1080");
            let prober = FfprobeProber::new(ffprobe, Some(Duration::from_secs(20)));
            let dims = prober.probe_dimensions(Path::new("clip.mp4")).unwrap();
            assert_eq!(dims, (1920, 1080));
        }

        #[test]
        fn hung_ffprobe_is_killed_at_the_deadline() {
            let dir = tempdir().unwrap();
            let ffprobe = write_script(dir.path(), "exec sleep 30");
            let prober = FfprobeProber::new(ffprobe, Some(Duration::from_millis(300)));

            let started = Instant::now();
            let result = prober.probe_dimensions(Path::new("clip.mp4"));

            assert!(
                matches!(result, Err(CoreError::Timeout { ref tool, .. }) if tool == "ffprobe"),
                "{result:?}"
            );
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn large_stderr_is_a_probe_error_not_a_timeout() {
            let dir = tempdir().unwrap();
            let ffprobe = write_script(
                dir.path(),
                "head -c 300000 /dev/zero | tr '\\0' x >&2\nexit 1",
            );
            let prober = FfprobeProber::new(ffprobe, Some(Duration::from_secs(20)));

            let result = prober.probe_dimensions(Path::new("clip.mp4"));

            assert!(matches!(result, Err(CoreError::Probe(_))), "{result:?}");
        }
    }
}
