//! Realty feed output: XML generation, digests and sinks.

pub mod common;
pub mod digest;
pub mod error;
pub mod feed_xml;
pub mod sink;

pub use common::{
    DEFAULT_AREA_UNIT, DEFAULT_COUNTRY, DEFAULT_DEAL_TYPE, REALTY_FEED_NS, format_decimal,
};
pub use digest::feed_digest;
pub use error::{FeedError, Result, SinkError};
pub use feed_xml::{FeedOptions, generate};
pub use sink::{FeedLocation, FeedSink, FileSink, MemorySink};
