pub mod entity;
pub mod projection;
pub mod record;
pub mod record_set;
pub mod traversal;

pub use entity::{AUTHOR_REF_COLUMN, EntityKind, FieldKind, FieldSpec};
pub use projection::{FieldValue, Projection, ProjectionError, project, project_fields};
pub use record::{RawRecord, RecordKind};
pub use record_set::RecordSet;
pub use traversal::TraversalMode;
