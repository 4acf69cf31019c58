// beatgif-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{DimensionProber, FfmpegProcess, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use crate::metadata::{BeatmapMetadata, MetadataResolver};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::{Cell, RefCell};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use std::time::Duration;

/// Builds an exit status carrying `code` as a normal exit code.
pub fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
    /// Set when kill is called.
    pub killed: Rc<Cell<bool>>,
    /// Never finishes on its own: runs into the timeout once the events are drained.
    pub hangs: bool,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, timeout: Option<Duration>, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.drain(..) {
            handler(event)?;
        }
        match timeout {
            Some(after) if self.hangs => Err(CoreError::Timeout {
                tool: "ffmpeg".to_string(),
                after,
            }),
            _ => Ok(()),
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.killed.set(true);
        Ok(())
    }
}

/// Represents an expected ffmpeg call: matched when any argument contains `arg_pattern`.
struct MockFfmpegExpectation {
    arg_pattern: String,
    events: Vec<FfmpegEvent>,
    exit_code: i32,
    create_dummy_output: bool,
    hangs: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Calls that match no expectation succeed and write a dummy output file.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
    killed: Rc<Cell<bool>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            events,
            exit_code: 0,
            create_dummy_output: true,
            hangs: false,
        });
    }

    /// The matching call emits `events` and then stops responding.
    pub fn add_hang_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            events,
            exit_code: 0,
            create_dummy_output: false,
            hangs: true,
        });
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            events,
            exit_code,
            create_dummy_output: false,
            hangs: false,
        });
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    pub fn was_killed(&self) -> bool {
        self.killed.get()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let expectation = {
            let mut expectations = self.expectations.borrow_mut();
            expectations
                .iter()
                .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)))
                .map(|index| expectations.remove(index))
        };
        let (events, exit_code, create_dummy_output, hangs) = match expectation {
            Some(exp) => (exp.events, exp.exit_code, exp.create_dummy_output, exp.hangs),
            None => (Vec::new(), 0, true, false),
        };

        if create_dummy_output {
            if let Some(output) = args.last() {
                let output = PathBuf::from(output);
                if let Some(parent) = output.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&output, b"GIF89a")?;
            }
        }

        Ok(MockFfmpegProcess {
            events_to_emit: events,
            exit_status: exit_status(exit_code),
            killed: Rc::clone(&self.killed),
            hangs,
        })
    }
}

/// Prober returning fixed dimensions or a fixed error message.
pub struct MockProber {
    pub result: Result<(u32, u32), String>,
    pub calls: Cell<usize>,
}

impl MockProber {
    pub fn returning(width: u32, height: u32) -> Self {
        Self {
            result: Ok((width, height)),
            calls: Cell::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl DimensionProber for MockProber {
    fn probe_dimensions(&self, _input_path: &Path) -> CoreResult<(u32, u32)> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone().map_err(CoreError::Probe)
    }
}

/// Resolver returning a fixed record or a fixed lookup error.
pub struct MockResolver {
    pub result: Result<BeatmapMetadata, String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockResolver {
    pub fn returning(song_name: &str, mapper_name: &str) -> Self {
        Self {
            result: Ok(BeatmapMetadata {
                song_name: song_name.to_string(),
                mapper_name: mapper_name.to_string(),
                ..BeatmapMetadata::default()
            }),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl MetadataResolver for MockResolver {
    fn resolve(&self, map_id: &str) -> CoreResult<BeatmapMetadata> {
        self.requested.borrow_mut().push(map_id.to_string());
        self.result.clone().map_err(CoreError::MetadataLookup)
    }
}
