pub mod builtin;
pub mod types;
pub mod validation;

pub use builtin::sledai_descriptors;
pub use types::{Checklist, SymptomDescriptor};
pub use validation::validate_checklist;
