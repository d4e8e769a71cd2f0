pub mod logger;
#[allow(clippy::module_inception)]
pub mod trace;

pub use logger::TraceLogger;
pub use trace::{TraceEvent, TraceKind};
