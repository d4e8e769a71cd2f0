pub mod descriptor;
pub mod reference;
pub mod scanner;
pub mod schema;

pub use descriptor::{FieldDescriptor, FieldType, MinifiedField, build_descriptor};
pub use reference::{REFERENCE_ATTR, ensure_reference_id, find_by_reference};
pub use scanner::{scan_controls, scan_fields};
