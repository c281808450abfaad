//! Topology data models, snapshot validation and errors.

pub mod error;
pub mod snapshot;
pub mod types;
pub mod validity;

// Re-exports for convenience
pub use error::{Result, TopologyError, ValidationError, ValidationReason};
pub use snapshot::Snapshot;
pub use types::{
    CodeOrdinal, Line, LineKind, LineSegment, LineStyle, SegmentKey, Station, StationCode, StationStatus,
};
pub use validity::Validity;
