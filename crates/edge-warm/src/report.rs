//! Operator-facing reporting and exit status.

use parking_lot::Mutex;

use crate::connection::ResolvedConnection;
use crate::dispatch::DispatchOutcome;
use crate::error::WarmError;
use crate::request::{WarmRequest, WarmResult};

/// Exit code for a completed run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when static caching is disabled or the run could not start.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the queue backend rejected a job.
pub const EXIT_SUBMISSION_FAILED: i32 = 2;

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Progress events emitted while warming inline.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// Inline warming is about to visit `total` URLs.
    Started { total: usize },
    /// One URL was visited.
    Visited {
        request: &'a WarmRequest,
        result: &'a WarmResult,
    },
    /// All URLs were visited.
    Finished,
}

/// Destination for report lines.
pub trait ReportSink: Send + Sync {
    /// Emit one line of text.
    fn line(&self, level: Level, text: &str);

    /// Observe inline progress. Ignored by default.
    fn progress(&self, _event: Progress<'_>) {}
}

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Dispatch completed, whatever the individual fetch results.
    Success,
    /// Static caching is not enabled.
    Disabled,
    /// A job could not be submitted to the queue.
    SubmissionFailed,
    /// Any other error stopped the run before dispatch.
    Failed,
}

impl ExitStatus {
    /// Process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => EXIT_SUCCESS,
            Self::Disabled | Self::Failed => EXIT_FAILURE,
            Self::SubmissionFailed => EXIT_SUBMISSION_FAILED,
        }
    }

    /// Whether the run succeeded.
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Formats warming lines and maps outcomes to an exit status.
pub struct Reporter<'a> {
    sink: &'a dyn ReportSink,
}

impl<'a> Reporter<'a> {
    /// Create a reporter writing to a sink.
    pub fn new(sink: &'a dyn ReportSink) -> Self {
        Self { sink }
    }

    /// Announce inline warming.
    pub fn visiting(&self, count: usize) {
        self.sink.line(Level::Info, &format!("Visiting {} URLs...", count));
    }

    /// Announce that queueing was requested but the connection is synchronous.
    pub fn queue_disabled(&self, connection: &ResolvedConnection) {
        self.sink.line(
            Level::Warn,
            &format!(
                "The queue connection is set to \"{}\". Queueing will be disabled.",
                connection
            ),
        );
    }

    /// Announce queued warming.
    pub fn adding(&self, count: usize) {
        self.sink.line(Level::Info, &format!("Adding {} requests...", count));
    }

    /// Forward a progress event.
    pub fn progress(&self, event: Progress<'_>) {
        self.sink.progress(event);
    }

    /// Report how the run ended and pick the exit status.
    pub fn finish(&self, result: &Result<DispatchOutcome, WarmError>) -> ExitStatus {
        match result {
            Ok(DispatchOutcome::Inline {
                visited,
                succeeded,
                failed,
            }) => {
                if *failed > 0 {
                    self.sink.line(
                        Level::Warn,
                        &format!("Warmed {} of {} URLs ({} failed).", succeeded, visited, failed),
                    );
                } else {
                    self.sink.line(Level::Success, "The static cache has been warmed.");
                }
                ExitStatus::Success
            }
            Ok(DispatchOutcome::Queued { .. }) => {
                self.sink.line(Level::Success, "All requests have been queued.");
                ExitStatus::Success
            }
            Err(e) => {
                self.sink.line(Level::Error, &e.to_string());
                match e {
                    WarmError::Disabled => ExitStatus::Disabled,
                    WarmError::Submission(_) => ExitStatus::SubmissionFailed,
                    _ => ExitStatus::Failed,
                }
            }
        }
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(Level, String)>>,
    visited: Mutex<usize>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines, without levels.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Recorded lines at a given level.
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.count(needle) > 0
    }

    /// Number of lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|(_, l)| l.contains(needle))
            .count()
    }

    /// Number of visited progress events.
    pub fn visited(&self) -> usize {
        *self.visited.lock()
    }
}

impl ReportSink for RecordingSink {
    fn line(&self, level: Level, text: &str) {
        self.lines.lock().push((level, text.to_string()));
    }

    fn progress(&self, event: Progress<'_>) {
        if let Progress::Visited { .. } = event {
            *self.visited.lock() += 1;
        }
    }
}
