//! Terminal rendering of warm reports.

use edge_warm::{Level, Progress, ReportSink};
use indicatif::ProgressBar;
use parking_lot::Mutex;
use serde::Serialize;

use crate::output::Output;

/// Writes report lines to the terminal and shows a progress bar while
/// warming inline. In JSON mode lines are collected for a final summary.
pub struct TerminalReport {
    output: Output,
    bar: Mutex<Option<ProgressBar>>,
    messages: Mutex<Vec<String>>,
}

/// JSON summary printed in `--json` mode.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub exit_code: i32,
    pub messages: Vec<String>,
}

impl TerminalReport {
    /// Create a report over an output handler.
    pub fn new(output: Output) -> Self {
        Self {
            output,
            bar: Mutex::new(None),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Build the JSON summary for an exit code.
    pub fn summary(&self, exit_code: i32) -> Summary {
        Summary {
            exit_code,
            messages: self.messages.lock().clone(),
        }
    }
}

impl ReportSink for TerminalReport {
    fn line(&self, level: Level, text: &str) {
        self.messages.lock().push(text.to_string());

        match level {
            Level::Info => self.output.line(text),
            Level::Success => self.output.success(text),
            Level::Warn => self.output.warn(text),
            Level::Error => self.output.error(text),
        }
    }

    fn progress(&self, event: Progress<'_>) {
        let mut bar = self.bar.lock();
        match event {
            Progress::Started { total } if total > 0 => {
                *bar = Some(self.output.progress(total as u64, "Warming"));
            }
            Progress::Started { .. } => {}
            Progress::Visited { request, result } => {
                if let Some(pb) = bar.as_ref() {
                    pb.set_message(request.path());
                    pb.inc(1);
                }
                if !result.success {
                    self.output.debug(&format!(
                        "{} failed: {}",
                        request.url(),
                        result.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
            Progress::Finished => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_warm::{WarmRequest, WarmResult};

    #[test]
    fn test_collects_messages_for_summary() {
        let report = TerminalReport::new(Output::new(false, true));

        report.line(Level::Info, "Visiting 2 URLs...");
        report.line(Level::Success, "The static cache has been warmed.");

        let summary = report.summary(0);
        assert_eq!(summary.exit_code, 0);
        assert_eq!(
            summary.messages,
            vec!["Visiting 2 URLs...", "The static cache has been warmed."]
        );
    }

    #[test]
    fn test_progress_lifecycle() {
        let report = TerminalReport::new(Output::new(false, true));
        let request = WarmRequest::get("http://localhost/about");
        let result = WarmResult::ok(200);

        report.progress(Progress::Started { total: 1 });
        assert!(report.bar.lock().is_some());

        report.progress(Progress::Visited {
            request: &request,
            result: &result,
        });
        assert_eq!(report.bar.lock().as_ref().map(|pb| pb.position()), Some(1));

        report.progress(Progress::Finished);
        assert!(report.bar.lock().is_none());
    }

    #[test]
    fn test_no_bar_for_empty_run() {
        let report = TerminalReport::new(Output::new(false, true));
        report.progress(Progress::Started { total: 0 });
        assert!(report.bar.lock().is_none());
    }
}
