use glob::Pattern;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::decision::{DecisionRecord, Thresholds};
use crate::error::Error;
use crate::gray;
use crate::identity::ScanIdentityKey;
use crate::progress::{Diagnostics, EventSink, SelectionEvent, SkipReason, TracingDiagnostics};
use crate::scanner::{self, CounterpartIndex, FileFamily};

pub const COMPLETION_MESSAGE: &str = "Processing complete.";

pub struct SelectionEngine {
    workers: usize,
    ignore_patterns: Vec<Pattern>,
    diagnostics: Arc<dyn Diagnostics>,
    cancel: Option<Arc<AtomicBool>>,
}

/// Counters of a finished run. The records themselves travel on the
/// `Complete` event.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub duration: Duration,
    pub total_files: usize,
    pub decided: usize,
    pub skipped: usize,
    pub flagged: usize,
}

struct RunContext<'a> {
    compressed_dir: &'a Path,
    index: &'a CounterpartIndex,
    thresholds: Thresholds,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self {
            workers: 1,
            ignore_patterns: Vec::new(),
            diagnostics: Arc::new(TracingDiagnostics),
            cancel: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_workers(config.workers)
            .with_ignore_patterns(&config.ignore_patterns)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_ignore_patterns(mut self, globs: &[String]) -> Self {
        self.ignore_patterns = scanner::compile_ignore_patterns(globs);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Checked before each file; once set the run ends with a
    /// `Processing cancelled.` error event.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Decide a format for every valid compressed file in `compressed_dir`:
    /// 1. Index the TIFF counterparts in `high_fidelity_dir`
    /// 2. Measure gray coverage of each JPG that has a counterpart
    /// 3. Sort the decisions by (role digit, sequence id) and emit `Complete`
    ///
    /// Fatal problems are emitted as a single `Error` event and also returned.
    /// Per-file problems only reach the diagnostics and never abort the run.
    pub fn process(
        &self,
        compressed_dir: &Path,
        high_fidelity_dir: &Path,
        low_threshold: f64,
        high_threshold: f64,
        sink: &dyn EventSink,
    ) -> Result<RunStats, Error> {
        let result = self.run(
            compressed_dir,
            high_fidelity_dir,
            low_threshold,
            high_threshold,
            sink,
        );
        if let Err(err) = &result {
            let message = err.to_string();
            self.diagnostics.on_run_failed(&message);
            sink.emit(SelectionEvent::Error(message));
        }
        result
    }

    fn run(
        &self,
        compressed_dir: &Path,
        high_fidelity_dir: &Path,
        low_threshold: f64,
        high_threshold: f64,
        sink: &dyn EventSink,
    ) -> Result<RunStats, Error> {
        let start = Instant::now();
        let thresholds = Thresholds::new(low_threshold, high_threshold)?;

        let index = CounterpartIndex::build(high_fidelity_dir, &self.ignore_patterns)?;
        for (file, reason) in index.unkeyed() {
            self.diagnostics.on_counterpart_skipped(file, reason);
        }
        if index.is_empty() {
            return Err(Error::NoValidFiles {
                kind: FileFamily::HighFidelity,
                dir: high_fidelity_dir.to_path_buf(),
            });
        }

        let compressed =
            scanner::list_candidates(compressed_dir, FileFamily::Compressed, &self.ignore_patterns)?;
        if compressed.is_empty() {
            return Err(Error::NoValidFiles {
                kind: FileFamily::Compressed,
                dir: compressed_dir.to_path_buf(),
            });
        }
        info!(
            "Found {} valid JPG files in '{}'; flagging {:.2}% to {:.2}% gray.",
            compressed.len(),
            compressed_dir.display(),
            thresholds.low(),
            thresholds.high(),
        );

        let ctx = RunContext {
            compressed_dir,
            index: &index,
            thresholds,
        };

        let mut records = if self.workers > 1 {
            self.decide_parallel(&ctx, &compressed, sink)?
        } else {
            self.decide_sequential(&ctx, &compressed, sink)?
        };

        // stable, so equal keys keep listing order in the sequential path
        records.sort_by_key(|record| record.sort_key);

        let flagged = records.iter().filter(|record| record.flagged).count();
        let stats = RunStats {
            duration: start.elapsed(),
            total_files: compressed.len(),
            decided: records.len(),
            skipped: compressed.len() - records.len(),
            flagged,
        };
        info!(
            "{} Decided {} of {} files, {} flagged, in {:.2}s",
            COMPLETION_MESSAGE,
            stats.decided,
            stats.total_files,
            stats.flagged,
            stats.duration.as_secs_f64(),
        );

        sink.emit(SelectionEvent::Complete {
            summary: COMPLETION_MESSAGE.to_string(),
            flagged_count: flagged,
            records,
        });

        Ok(stats)
    }

    fn decide_sequential(
        &self,
        ctx: &RunContext<'_>,
        compressed: &[String],
        sink: &dyn EventSink,
    ) -> Result<Vec<DecisionRecord>, Error> {
        let total = compressed.len();
        let mut records = Vec::new();

        for (done, file) in compressed.iter().enumerate() {
            if self.is_cancelled() {
                return Err(Error::Cancelled);
            }
            sink.emit(SelectionEvent::CurrentFile(file.clone()));

            if let Some(record) = self.decide(ctx, file) {
                records.push(record);
            }

            sink.emit(SelectionEvent::Progress {
                processed: done + 1,
                total,
            });
        }

        Ok(records)
    }

    /// Files are decided on a rayon pool. The processed counter is bumped and
    /// its progress event sent under one lock so counts reach the sink in order.
    fn decide_parallel(
        &self,
        ctx: &RunContext<'_>,
        compressed: &[String],
        sink: &dyn EventSink,
    ) -> Result<Vec<DecisionRecord>, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::Other(format!("Failed to start worker pool: {}", e)))?;
        debug!("Deciding on {} worker threads", self.workers);

        let total = compressed.len();
        let processed = Mutex::new(0usize);
        let records = Mutex::new(Vec::new());

        pool.install(|| {
            compressed.par_iter().for_each(|file| {
                if self.is_cancelled() {
                    return;
                }
                sink.emit(SelectionEvent::CurrentFile(file.clone()));

                if let Some(record) = self.decide(ctx, file) {
                    records
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(record);
                }

                let mut done = processed.lock().unwrap_or_else(PoisonError::into_inner);
                *done += 1;
                sink.emit(SelectionEvent::Progress {
                    processed: *done,
                    total,
                });
            });
        });

        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(records.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    /// Decision for one compressed file, or `None` after reporting why not.
    fn decide(&self, ctx: &RunContext<'_>, file: &str) -> Option<DecisionRecord> {
        match self.try_decide(ctx, file) {
            Ok(record) => {
                self.diagnostics.on_decision(file, &record);
                Some(record)
            }
            Err(reason) => {
                self.diagnostics.on_file_skipped(file, &reason);
                None
            }
        }
    }

    fn try_decide(&self, ctx: &RunContext<'_>, file: &str) -> Result<DecisionRecord, SkipReason> {
        let key = ScanIdentityKey::from_file_name(file).map_err(SkipReason::BadKey)?;

        let counterparts = ctx
            .index
            .get(&key)
            .ok_or_else(|| SkipReason::NoCounterpart(key.clone()))?;

        let gray_pct = gray::compute_gray_percentage(&ctx.compressed_dir.join(file))
            .map_err(SkipReason::Unreadable)?;

        let selected_format = ctx.thresholds.classify(gray_pct);
        Ok(DecisionRecord::new(
            &key,
            file,
            counterparts,
            gray_pct,
            selected_format,
        ))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
