pub mod category;
pub mod classifier;
pub mod patterns;
pub mod predicates;

pub use category::Category;
pub use classifier::{CategorizedField, PRIORITY, classify, classify_all};
