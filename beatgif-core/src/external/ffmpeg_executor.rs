// ============================================================================
// beatgif-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. The encode pipeline only talks to these traits, so tests can
// substitute a spawner that records arguments instead of running ffmpeg.
// The run deadline lives here: events are read on a helper thread so a
// silent, hung ffmpeg is still killed on time.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
//
// AI-ASSISTANT-INFO: FFmpeg process management and execution abstraction

use crate::error::{CoreError, CoreResult, command_start_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    ///
    /// Stops at the first handler error and returns it. With a `timeout`, fails
    /// with `CoreError::Timeout` once it has elapsed, whether or not ffmpeg is
    /// still printing anything.
    fn handle_events<F>(&mut self, timeout: Option<Duration>, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;

    /// Terminates the process.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(FfmpegChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, timeout: Option<Duration>, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            CoreError::Encode {
                tool: "ffmpeg".to_string(),
                code: None,
                stderr: e.to_string(),
            }
        })?;

        let (tx, rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            for event in iterator {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
        let result = loop {
            let event = match deadline {
                Some((at, limit)) => {
                    match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
                        Ok(event) => event,
                        Err(RecvTimeoutError::Timeout) => {
                            log::error!("ffmpeg exceeded {}s, killing it", limit.as_secs());
                            break Err(CoreError::Timeout {
                                tool: "ffmpeg".to_string(),
                                after: limit,
                            });
                        }
                        Err(RecvTimeoutError::Disconnected) => break Ok(()),
                    }
                }
                None => match rx.recv() {
                    Ok(event) => event,
                    Err(_) => break Ok(()),
                },
            };
            if let Err(err) = handler(event) {
                break Err(err);
            }
        };

        match result {
            Ok(()) => {
                if reader.join().is_err() {
                    log::warn!("ffmpeg event reader thread panicked");
                }
                Ok(())
            }
            Err(err) => {
                // The reader thread ends on its own once the killed process closes its pipes.
                if let Err(kill_err) = self.0.kill() {
                    log::warn!("Failed to kill ffmpeg: {kill_err}");
                }
                Err(err)
            }
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.0.wait()?)
    }

    fn kill(&mut self) -> CoreResult<()> {
        Ok(self.0.kill()?)
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}
