use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE: &str = "./logs/processing_debug.log";
const KEPT_LOG_FILES: usize = 3;

/// `<time> - <LEVEL> - <message>` lines for the log file.
pub struct PlainLine<T> {
    timer: T,
}

impl<T: FormatTime> PlainLine<T> {
    pub fn new(timer: T) -> Self {
        Self { timer }
    }
}

impl<S, N, T> FormatEvent<S, N> for PlainLine<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Directory and file stem of the configured log path. The appender adds the
/// rotation date and `.log` itself.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scansift")
        .to_string();
    (dir, stem)
}

fn file_appender(path: &Path) -> RollingFileAppender {
    let (dir, stem) = split_log_path(path);
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(stem.as_str())
        .filename_suffix("log")
        .max_log_files(KEPT_LOG_FILES)
        .build(&dir)
        .unwrap_or_else(|err| {
            eprintln!(
                "Cannot rotate logs in '{}' ({}); writing to a single file.",
                dir.display(),
                err
            );
            rolling::never(&dir, format!("{}.log", stem))
        })
}

pub fn init_logger() -> WorkerGuard {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let log_file_path =
        env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(Path::new(
        &log_file_path,
    )));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(PlainLine::new(SystemTime))
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(filter_layer)
        .init();

    info!(
        "Logging to stdout and '{}' (daily, last {} files kept).",
        log_file_path, KEPT_LOG_FILES
    );

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_line_layout() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(PlainLine::new(SystemTime))
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            info!("Found {} valid JPG files", 2);
            tracing::warn!("Could not extract key from TIFF '10ab.tif'");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - Found 2 valid JPG files"));
        assert!(lines[1].ends_with(" - WARN - Could not extract key from TIFF '10ab.tif'"));
        // timestamp comes first
        assert!(lines[0].chars().next().unwrap().is_ascii_digit());
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("./logs/processing_debug.log")),
            (PathBuf::from("./logs"), "processing_debug".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("run.log")),
            (PathBuf::from("."), "run".to_string())
        );
    }
}
