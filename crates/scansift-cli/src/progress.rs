use indicatif::{ProgressBar, ProgressStyle};
use scansift_core::{DecisionRecord, SelectionEvent};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// How a run ended, as seen by the front end.
pub enum RunOutcome {
    Complete {
        summary: String,
        flagged_count: usize,
        records: Vec<DecisionRecord>,
    },
    Failed(String),
}

/// Terminal progress bar fed by engine events.
///
/// - current file: shown as the bar message
/// - progress: bar position/length
/// - error/complete: bar cleared, outcome returned
pub struct ProgressView {
    bar: ProgressBar,
}

impl ProgressView {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} [{bar:30.cyan/dim}] {pos}/{len} {percent}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Consume events until a terminal one arrives or the engine hangs up.
    pub fn drive(self, events: Receiver<SelectionEvent>) -> RunOutcome {
        for event in events {
            match event {
                SelectionEvent::CurrentFile(file) => {
                    self.bar.set_message(format!("Processing: {}", file));
                }
                SelectionEvent::Progress { processed, total } => {
                    if self.bar.length() != Some(total as u64) {
                        self.bar.set_length(total as u64);
                    }
                    self.bar.set_position(processed as u64);
                }
                SelectionEvent::Error(message) => {
                    self.bar.finish_and_clear();
                    return RunOutcome::Failed(message);
                }
                SelectionEvent::Complete {
                    summary,
                    flagged_count,
                    records,
                } => {
                    self.bar.finish_and_clear();
                    return RunOutcome::Complete {
                        summary,
                        flagged_count,
                        records,
                    };
                }
            }
        }

        self.bar.finish_and_clear();
        RunOutcome::Failed("Processing stopped without a result.".to_string())
    }
}
