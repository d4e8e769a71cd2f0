pub mod clean;
pub mod label;
pub mod question;

pub use label::extract_label;
pub use question::extract_group_question;
