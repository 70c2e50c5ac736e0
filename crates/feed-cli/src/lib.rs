//! Library side of the realty feed CLI: pipeline orchestration and logging.

pub mod logging;
pub mod pipeline;
pub mod types;
