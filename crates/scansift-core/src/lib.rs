pub mod config;
pub mod decision;
pub mod deliver;
pub mod engine;
pub mod error;
pub mod export;
pub mod gray;
pub mod identity;
pub mod progress;
pub mod resolve;
pub mod scanner;

pub use config::AppConfig;
pub use decision::{DecisionRecord, SelectedFormat, SortKey, Thresholds};
pub use engine::{RunStats, SelectionEngine};
pub use error::Error;
pub use identity::ScanIdentityKey;
pub use progress::{
    Diagnostics, EventSink, SelectionEvent, SilentSink, SkipReason, TracingDiagnostics,
};
pub use scanner::{CounterpartIndex, FileFamily};
