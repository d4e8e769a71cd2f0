pub mod handlers;
pub mod instruction;
pub mod persist;
pub mod profile;
pub mod store;

pub use handlers::resolve;
pub use instruction::{Action, AutofillInstruction, FILE_UPLOAD_SENTINEL, InstructionValue};
pub use persist::{SaveOutcome, persist};
pub use profile::{LocationProfile, NameProfile, PhoneProfile, SponsorshipProfile, UserPreferenceProfile};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};
