//! Structural delta between two snapshots.
//!
//! Only topology is compared. A segment whose path is redrawn between the
//! same two stations is not a change, and a station that moved on the canvas
//! is not a change either.

pub mod summary;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::identifiers::*;
use crate::models::*;

pub use summary::Change;

/// An (old, new) pair for an attribute of a station present in both snapshots
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: Clone> Transition<T> {
    fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SnapshotDelta {
    pub stations_added: BTreeSet<StationId>,
    pub stations_removed: BTreeSet<StationId>,
    /// Only for stations present in both snapshots
    pub codes_added: BTreeMap<StationId, BTreeSet<StationCode>>,
    pub codes_removed: BTreeMap<StationId, BTreeSet<StationCode>>,
    pub segments_added: Vec<LineSegment>,
    pub segments_removed: Vec<LineSegment>,
    pub stations_renamed: BTreeMap<StationId, Transition<Arc<str>>>,
    pub status_changed: BTreeMap<StationId, Transition<StationStatus>>,
}

impl SnapshotDelta {
    pub fn is_empty(&self) -> bool {
        self.stations_added.is_empty()
            && self.stations_removed.is_empty()
            && self.codes_added.is_empty()
            && self.codes_removed.is_empty()
            && self.segments_added.is_empty()
            && self.segments_removed.is_empty()
            && self.stations_renamed.is_empty()
            && self.status_changed.is_empty()
    }

    /// The delta of the same two snapshots taken in the other order
    pub fn inverse(&self) -> Self {
        Self {
            stations_added: self.stations_removed.clone(),
            stations_removed: self.stations_added.clone(),
            codes_added: self.codes_removed.clone(),
            codes_removed: self.codes_added.clone(),
            segments_added: self.segments_removed.clone(),
            segments_removed: self.segments_added.clone(),
            stations_renamed: self
                .stations_renamed
                .iter()
                .map(|(id, t)| (id.clone(), t.reversed()))
                .collect(),
            status_changed: self
                .status_changed
                .iter()
                .map(|(id, t)| (id.clone(), t.reversed()))
                .collect(),
        }
    }
}

/// Compute what changed from `older` to `newer`.
///
/// Both snapshots must validate; a delta is never computed over broken data.
pub fn diff(older: &Snapshot, newer: &Snapshot) -> Result<SnapshotDelta> {
    for snapshot in [older, newer] {
        snapshot.validate().map_err(|source| TopologyError::InvalidSnapshot {
            date: snapshot.effective_date,
            source,
        })?;
    }

    let mut delta = SnapshotDelta::default();

    for (id, station) in &newer.stations {
        let Some(before) = older.stations.get(id) else {
            delta.stations_added.insert(id.clone());
            continue;
        };

        let gained: BTreeSet<StationCode> = station.codes.difference(&before.codes).cloned().collect();
        if !gained.is_empty() {
            delta.codes_added.insert(id.clone(), gained);
        }

        let lost: BTreeSet<StationCode> = before.codes.difference(&station.codes).cloned().collect();
        if !lost.is_empty() {
            delta.codes_removed.insert(id.clone(), lost);
        }

        if before.name != station.name {
            delta.stations_renamed.insert(
                id.clone(),
                Transition {
                    from: before.name.clone(),
                    to: station.name.clone(),
                },
            );
        }

        if before.status != station.status {
            delta.status_changed.insert(
                id.clone(),
                Transition {
                    from: before.status,
                    to: station.status,
                },
            );
        }
    }

    delta.stations_removed = older
        .stations
        .keys()
        .filter(|id| !newer.stations.contains_key(*id))
        .cloned()
        .collect();

    delta.segments_added = segment_difference(newer, older);
    delta.segments_removed = segment_difference(older, newer);

    Ok(delta)
}

/// Segments of `left` whose key is absent from `right`, in `left`'s order
fn segment_difference(left: &Snapshot, right: &Snapshot) -> Vec<LineSegment> {
    let right_keys: HashSet<SegmentKey> = right.segments.iter().map(LineSegment::key).collect();
    let mut emitted = HashSet::new();

    left.segments
        .iter()
        .filter(|segment| {
            let key = segment.key();
            !right_keys.contains(&key) && emitted.insert(key)
        })
        .cloned()
        .collect()
}
