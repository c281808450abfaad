//! Error types for the topology core.

use chrono::NaiveDate;

use crate::identifiers::*;

/// Why a snapshot failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// A segment endpoint is not in the snapshot's station set
    DanglingEndpoint,
    /// A segment or code refers to a line the snapshot does not declare
    UnknownLine,
    /// A station holds a code for a line with no segments in the snapshot
    OrphanCode,
    /// A line's segments do not form one connected graph, or a code-bearing
    /// station is not touched by any segment of that line
    DisconnectedLine,
    /// A station position lies outside the canvas bounds
    OutOfBounds,
    /// Two stations on the same line share a code ordinal
    DuplicateOrdinal,
}

/// The first invariant violation found in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason:?} (line: {line:?}, station: {station:?})")]
pub struct ValidationError {
    pub reason: ValidationReason,
    pub station: Option<StationId>,
    pub line: Option<LineId>,
}

impl ValidationError {
    pub fn new(reason: ValidationReason) -> Self {
        Self {
            reason,
            station: None,
            line: None,
        }
    }

    pub fn at_station(mut self, station: &StationId) -> Self {
        self.station = Some(station.clone());
        self
    }

    pub fn on_line(mut self, line: &LineId) -> Self {
        self.line = Some(line.clone());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Duplicate id with conflicting metadata: {0}")]
    DuplicateId(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid station code: {0:?}")]
    InvalidCode(String),

    #[error("Snapshot validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snapshot store is empty")]
    EmptyStore,

    #[error("Malformed snapshot store: {date} does not follow {previous}")]
    MalformedStore { previous: NaiveDate, date: NaiveDate },

    #[error("Snapshot effective {date} is invalid: {source}")]
    InvalidSnapshot {
        date: NaiveDate,
        #[source]
        source: ValidationError,
    },

    #[error("Corpus error: {0}")]
    Corpus(String),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
