pub mod builder;

pub use builder::{BuildOutput, build};
