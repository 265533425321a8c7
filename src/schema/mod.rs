mod field;
mod json_schema;
mod naming;
mod record;
mod validate;

pub use field::{Constraints, FieldDescriptor, FieldType, Presence};
pub use naming::{collection_name, collection_override, COLLECTION_OVERRIDES};
pub use record::{Document, RecordSchema};
pub use validate::{
    check_email, CoercionMode, UnknownFieldPolicy, ValidationError, ValidationErrors,
    ValidationOptions, ViolationKind,
};
