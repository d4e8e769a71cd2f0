pub mod clock;
pub mod ready;
pub mod speed;
pub mod writer;

pub use clock::{Clock, ManualClock, SystemClock, Timings};
pub use ready::{ReadyOutcome, wait_for_page_ready, wait_until_quiet};
pub use speed::AnimationSpeed;
pub use writer::{WriteContext, WriteOutcome, WriteStatus, apply_instruction, apply_instructions};
