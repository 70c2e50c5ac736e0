//! Validation of the realty catalog tree.
//!
//! Rules run per scope (complex, building, unit). Every finding is given a
//! severity by a [`SeverityPolicy`]; errors block feed generation, warnings
//! are attached to their node as diagnostics.

mod checks;
pub mod policy;
pub mod report;
pub mod validator;

pub use policy::SeverityPolicy;
pub use report::ValidationReport;
pub use validator::validate;
