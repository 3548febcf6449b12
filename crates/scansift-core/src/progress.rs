use std::fmt;
use std::sync::mpsc::Sender;
use tracing::{error, info, warn};

use crate::decision::DecisionRecord;
use crate::gray::GrayError;
use crate::identity::{KeyError, ScanIdentityKey};

/// User-facing events of one selection run.
///
/// `Error` and `Complete` are terminal: exactly one of them ends every run.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    CurrentFile(String),
    Progress {
        processed: usize,
        total: usize,
    },
    Error(String),
    Complete {
        summary: String,
        flagged_count: usize,
        records: Vec<DecisionRecord>,
    },
}

/// Receiver of run events.
///
/// CLI forwards through a channel to its progress bar; tests record them.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SelectionEvent);
}

/// Drops every event.
pub struct SilentSink;

impl EventSink for SilentSink {
    fn emit(&self, _event: SelectionEvent) {}
}

impl EventSink for Sender<SelectionEvent> {
    fn emit(&self, event: SelectionEvent) {
        // receiver gone means nobody is listening any more
        let _ = self.send(event);
    }
}

/// Why a compressed file produced no decision.
#[derive(Debug)]
pub enum SkipReason {
    BadKey(KeyError),
    NoCounterpart(ScanIdentityKey),
    Unreadable(GrayError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BadKey(e) => write!(f, "could not extract identity key: {}", e),
            SkipReason::NoCounterpart(key) => write!(f, "no corresponding TIFF for key {}", key),
            SkipReason::Unreadable(e) => write!(f, "unreadable image: {}", e),
        }
    }
}

/// Diagnostic trail of a run, separate from the user-facing events.
///
/// All methods have default no-op implementations.
pub trait Diagnostics: Send + Sync {
    fn on_counterpart_skipped(&self, _file: &str, _reason: &KeyError) {}
    fn on_file_skipped(&self, _file: &str, _reason: &SkipReason) {}
    fn on_decision(&self, _file: &str, _record: &DecisionRecord) {}
    fn on_run_failed(&self, _message: &str) {}
}

/// Forwards diagnostics to `tracing`.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn on_counterpart_skipped(&self, file: &str, reason: &KeyError) {
        warn!("Could not extract key from TIFF '{}': {}. Skipping.", file, reason);
    }

    fn on_file_skipped(&self, file: &str, reason: &SkipReason) {
        match reason {
            SkipReason::Unreadable(_) => error!("Skipping '{}': {}", file, reason),
            _ => warn!("Skipping '{}': {}", file, reason),
        }
    }

    fn on_decision(&self, _file: &str, record: &DecisionRecord) {
        info!(
            "Document: {}, Gray_Percentage: {}, Selected_Format: {}, Flagged: {}",
            record.selected_documents,
            record.gray_percentage_text,
            record.selected_format,
            record.flagged_text(),
        );
    }

    fn on_run_failed(&self, message: &str) {
        error!("{}", message);
    }
}
