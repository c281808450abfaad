//! Human-readable narration of a delta, for the network history view.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::diff::SnapshotDelta;
use crate::identifiers::*;
use crate::models::{Snapshot, StationCode, StationStatus};

/// One narrated change
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    StationAdded { station: StationId, name: Arc<str> },
    StationRemoved { station: StationId, name: Arc<str> },
    StationRenamed { station: StationId, from: Arc<str>, to: Arc<str> },
    CodeAdded { station: StationId, name: Arc<str>, code: StationCode },
    CodeRemoved { station: StationId, name: Arc<str>, code: StationCode },
    SegmentAdded { line: LineId, line_name: Arc<str>, from: Arc<str>, to: Arc<str> },
    SegmentRemoved { line: LineId, line_name: Arc<str>, from: Arc<str>, to: Arc<str> },
    StatusChanged { station: StationId, name: Arc<str>, from: StationStatus, to: StationStatus },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StationAdded { name, .. } => write!(f, "{name} station added"),
            Self::StationRemoved { name, .. } => write!(f, "{name} station removed"),
            Self::StationRenamed { from, to, .. } => write!(f, "{from} renamed to {to}"),
            Self::CodeAdded { name, code, .. } => write!(f, "{name} gains code {code}"),
            Self::CodeRemoved { name, code, .. } => write!(f, "{name} loses code {code}"),
            Self::SegmentAdded { line_name, from, to, .. } => {
                write!(f, "{line_name}: {from} to {to} added")
            }
            Self::SegmentRemoved { line_name, from, to, .. } => {
                write!(f, "{line_name}: {from} to {to} removed")
            }
            Self::StatusChanged { name, from, to, .. } => {
                write!(f, "{name} changes from {from:?} to {to:?}")
            }
        }
    }
}

impl SnapshotDelta {
    /// Narrate the delta using names from the snapshots it was computed from.
    ///
    /// Removed entities are named from `older`, everything else from `newer`.
    /// Ids missing from both fall back to the id itself.
    pub fn summary(&self, older: &Snapshot, newer: &Snapshot) -> Vec<Change> {
        let name_of = |id: &StationId| -> Arc<str> {
            newer
                .station(id)
                .or_else(|| older.station(id))
                .map(|station| station.name.clone())
                .unwrap_or_else(|| id.as_str().into())
        };
        let line_name = |id: &LineId| -> Arc<str> {
            newer
                .line(id)
                .or_else(|| older.line(id))
                .map(|line| line.name.clone())
                .unwrap_or_else(|| id.as_str().into())
        };

        let mut changes = Vec::new();

        for id in &self.stations_added {
            changes.push(Change::StationAdded { station: id.clone(), name: name_of(id) });
        }
        for id in &self.stations_removed {
            changes.push(Change::StationRemoved { station: id.clone(), name: name_of(id) });
        }
        for (id, rename) in &self.stations_renamed {
            changes.push(Change::StationRenamed {
                station: id.clone(),
                from: rename.from.clone(),
                to: rename.to.clone(),
            });
        }
        for (id, codes) in &self.codes_added {
            for code in codes {
                changes.push(Change::CodeAdded { station: id.clone(), name: name_of(id), code: code.clone() });
            }
        }
        for (id, codes) in &self.codes_removed {
            for code in codes {
                changes.push(Change::CodeRemoved { station: id.clone(), name: name_of(id), code: code.clone() });
            }
        }
        for segment in &self.segments_added {
            changes.push(Change::SegmentAdded {
                line: segment.line.clone(),
                line_name: line_name(&segment.line),
                from: name_of(&segment.from),
                to: name_of(&segment.to),
            });
        }
        for segment in &self.segments_removed {
            changes.push(Change::SegmentRemoved {
                line: segment.line.clone(),
                line_name: line_name(&segment.line),
                from: name_of(&segment.from),
                to: name_of(&segment.to),
            });
        }
        for (id, status) in &self.status_changed {
            changes.push(Change::StatusChanged {
                station: id.clone(),
                name: name_of(id),
                from: status.from,
                to: status.to,
            });
        }

        changes
    }
}
