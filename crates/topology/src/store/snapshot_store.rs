//! In-memory snapshot store built once from the full corpus.
//!
//! The store is immutable after construction and cheap to clone, so it can be
//! shared across request handlers without locking.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};

use crate::diff::{diff, SnapshotDelta};
use crate::models::{Result, Snapshot, TopologyError, Validity};
use crate::registry::EntityRegistry;

/// Singapore has been on UTC+8 for the whole history of the network
pub const REFERENCE_UTC_OFFSET_HOURS: i32 = 8;

/// The current calendar date in the network's reference timezone
pub fn today() -> NaiveDate {
    let now = Utc::now();
    match FixedOffset::east_opt(REFERENCE_UTC_OFFSET_HOURS * 3600) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// Snapshots in ascending effective-date order, plus the registry built
/// from them.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Arc<Snapshot>>,
    registry: Arc<EntityRegistry>,
}

impl SnapshotStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from an already ordered corpus.
    ///
    /// Out-of-order or repeated effective dates are rejected rather than
    /// sorted. Every snapshot must pass `validate()` before it is admitted.
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Result<Self> {
        for pair in snapshots.windows(2) {
            if pair[1].effective_date <= pair[0].effective_date {
                return Err(TopologyError::MalformedStore {
                    previous: pair[0].effective_date,
                    date: pair[1].effective_date,
                });
            }
        }

        for snapshot in &snapshots {
            snapshot.validate().map_err(|source| TopologyError::InvalidSnapshot {
                date: snapshot.effective_date,
                source,
            })?;
        }

        let registry = EntityRegistry::from_snapshots(&snapshots)?;
        let snapshots: Vec<Arc<Snapshot>> = snapshots.into_iter().map(Arc::new).collect();

        tracing::info!(
            snapshots = snapshots.len(),
            first = ?snapshots.first().map(|s| s.effective_date),
            latest = ?snapshots.last().map(|s| s.effective_date),
            "snapshot store built"
        );

        Ok(Self {
            snapshots,
            registry: Arc::new(registry),
        })
    }

    /// Index of the snapshot in effect on `query`.
    ///
    /// Binary search for the rightmost effective date `<= query`. A date
    /// before the first snapshot resolves to the first snapshot.
    pub fn resolve_index(&self, query: NaiveDate) -> Result<usize> {
        if self.snapshots.is_empty() {
            return Err(TopologyError::EmptyStore);
        }

        let after = self.snapshots.partition_point(|s| s.effective_date <= query);
        Ok(after.saturating_sub(1))
    }

    pub fn resolve(&self, query: NaiveDate) -> Result<&Arc<Snapshot>> {
        let index = self.resolve_index(query)?;
        Ok(&self.snapshots[index])
    }

    /// The snapshot in effect today
    pub fn latest(&self) -> Result<&Arc<Snapshot>> {
        self.resolve(today())
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Snapshot>> {
        self.snapshots.get(index)
    }

    /// The window of dates the snapshot at `index` is in effect
    pub fn validity(&self, index: usize) -> Option<Validity> {
        let snapshot = self.snapshots.get(index)?;
        let until = self.snapshots.get(index + 1).map(|next| next.effective_date);
        Some(Validity::new(snapshot.effective_date, until))
    }

    /// Delta of the snapshot at `index` against its predecessor.
    ///
    /// `None` for the first snapshot or an index past the end.
    pub fn changes_at(&self, index: usize) -> Option<Result<SnapshotDelta>> {
        let previous = self.snapshots.get(index.checked_sub(1)?)?;
        let current = self.snapshots.get(index)?;
        Some(diff(previous, current))
    }

    /// Every published change, as `(effective_date, delta against the
    /// previous snapshot)`
    pub fn history(&self) -> Result<Vec<(NaiveDate, SnapshotDelta)>> {
        self.snapshots
            .windows(2)
            .map(|pair| Ok((pair[1].effective_date, diff(&pair[0], &pair[1])?)))
            .collect()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Snapshot>> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::identifiers::StationId;
    use crate::models::{LineSegment, ValidationReason};

    fn store_ab() -> SnapshotStore {
        SnapshotStore::from_snapshots(vec![snapshot_a(), snapshot_b()]).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::new();
        assert!(store.is_empty());
        assert!(matches!(store.resolve(date(2020, 1, 1)), Err(TopologyError::EmptyStore)));
        assert!(matches!(store.latest(), Err(TopologyError::EmptyStore)));
    }

    #[test]
    fn test_resolve_between_snapshots() {
        let store = store_ab();
        assert_eq!(store.resolve(date(2015, 6, 1)).unwrap().effective_date, date(2012, 1, 1));
        assert_eq!(store.resolve(date(2020, 1, 1)).unwrap().effective_date, date(2017, 11, 1));
    }

    #[test]
    fn test_resolve_on_boundaries() {
        let store = store_ab();
        assert_eq!(store.resolve_index(date(2012, 1, 1)).unwrap(), 0);
        assert_eq!(store.resolve_index(date(2017, 10, 31)).unwrap(), 0);
        assert_eq!(store.resolve_index(date(2017, 11, 1)).unwrap(), 1);
    }

    #[test]
    fn test_floor_before_start() {
        let store = SnapshotStore::from_snapshots(vec![snapshot_a()]).unwrap();
        assert_eq!(store.resolve(date(1990, 1, 1)).unwrap().effective_date, date(2012, 1, 1));
    }

    #[test]
    fn test_resolution_monotonicity() {
        let mut snapshots = Vec::new();
        for year in [1988, 1990, 1996, 2003, 2009, 2017] {
            let mut snapshot = snapshot_a();
            snapshot.effective_date = date(year, 1, 1);
            snapshots.push(snapshot);
        }
        let store = SnapshotStore::from_snapshots(snapshots).unwrap();

        let mut day = date(1985, 1, 1);
        while day < date(2020, 1, 1) {
            let i = store.resolve_index(day).unwrap();
            let validity = store.validity(i).unwrap();
            if i == 0 {
                assert!(day < validity.until.unwrap());
            } else {
                assert!(validity.contains(day), "{day} resolved to {i}");
            }
            day = day + chrono::Duration::days(97);
        }
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = SnapshotStore::from_snapshots(vec![snapshot_b(), snapshot_a()]).unwrap_err();
        assert!(matches!(err, TopologyError::MalformedStore { .. }));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let mut b = snapshot_b();
        b.effective_date = date(2012, 1, 1);
        let err = SnapshotStore::from_snapshots(vec![snapshot_a(), b]).unwrap_err();
        assert!(matches!(err, TopologyError::MalformedStore { .. }));
    }

    #[test]
    fn test_invalid_snapshot_not_admitted() {
        let b = snapshot_b().with_segment(LineSegment::new("dtl", "csw", "hvw"));
        match SnapshotStore::from_snapshots(vec![snapshot_a(), b]) {
            Err(TopologyError::InvalidSnapshot { date: d, source }) => {
                assert_eq!(d, date(2017, 11, 1));
                assert_eq!(source.reason, ValidationReason::DanglingEndpoint);
                assert_eq!(source.station, Some(StationId::new("hvw")));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validity_windows() {
        let store = store_ab();
        assert_eq!(store.validity(0).unwrap().until, Some(date(2017, 11, 1)));
        assert!(store.validity(1).unwrap().is_open_ended());
        assert!(store.validity(2).is_none());
    }

    #[test]
    fn test_history() {
        let store = store_ab();
        let history = store.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].0, date(2017, 11, 1));
        assert!(history[0].1.stations_added.contains(&StationId::new("csw")));

        assert!(store.changes_at(0).is_none());
        assert!(store.changes_at(1).unwrap().is_ok());
    }

    #[test]
    fn test_registry_follows_store() {
        let store = store_ab();
        assert!(store.registry().resolve_station(&StationId::new("csw")).is_ok());
    }
}
