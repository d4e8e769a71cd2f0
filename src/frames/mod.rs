pub mod bus;
pub mod coordinator;
pub mod identity;
pub mod message;
pub mod state;
pub mod tree;

pub use bus::{Envelope, MessageBus};
pub use coordinator::{CoordinationReport, Coordinator, FrameReport};
pub use message::{FrameMessage, parse_message, parse_message_str};
pub use state::AutofillState;
pub use tree::{Frame, FrameId, FrameKind, FrameStatus, FrameTree};
