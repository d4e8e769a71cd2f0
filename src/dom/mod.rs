pub mod document;
pub mod events;
pub mod snapshot;

pub use document::{Document, NodeId};
pub use events::{DomEvent, EventKind};
pub use snapshot::{PageSnapshot, SnapshotNode};
