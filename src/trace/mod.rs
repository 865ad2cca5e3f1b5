pub mod logger;
#[allow(clippy::module_inception)]
pub mod trace;

pub use logger::{EventSink, NoopSink, TraceLogger};
pub use trace::{Stage, StageStatus, TraceEvent};
