pub mod catalog;
pub mod error;
pub mod issue;
pub mod record;

pub use catalog::{
    Building, Catalog, Complex, Diagnostic, FloorsTotalSource, IMPLICIT_NODE_LABEL, NodeLocation,
    Unit, node_path,
};
pub use error::{ModelError, Result};
pub use issue::{FieldError, IssueKind, IssueScope, Severity, SourceRef, ValidationIssue};
pub use record::{DEFAULT_CURRENCY, Price, UnitRecord};
