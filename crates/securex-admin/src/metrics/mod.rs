pub mod mock;
pub mod service;
pub mod source;

pub use service::{MetricsService, Snapshot, SnapshotOrigin};
pub use source::{InMemorySource, MetricsSource};
