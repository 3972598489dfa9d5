//! Collaborator interfaces and their in-memory implementations.

mod memory;
mod sink;
mod traits;

pub use memory::{IndicatorRegistry, InteractionGraph};
pub use sink::{JsonLinesSink, MemorySink};
pub use traits::{BaselineSource, GraphSource, ResultSink, SourceError};
