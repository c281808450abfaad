//! Canonical, time-invariant identity for stations and lines.
//!
//! The registry only grows: a station id stays registered after the station
//! closes so older snapshots keep resolving.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::identifiers::*;
use crate::models::{Line, LineKind, Result, Snapshot, TopologyError};

/// What is known about a station independent of any one snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationMetadata {
    pub id: StationId,
    /// Display name when first published; later renames do not change it
    pub first_name: Arc<str>,
    pub introduced: NaiveDate,
}

/// The styling that identifies a line across every snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineMetadata {
    pub id: LineId,
    pub name: Arc<str>,
    pub color: Arc<str>,
    pub kind: LineKind,
}

impl From<&Line> for LineMetadata {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            color: line.color.clone(),
            kind: line.kind,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    stations: BTreeMap<StationId, StationMetadata>,
    lines: BTreeMap<LineId, LineMetadata>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every station and line of an ordered corpus.
    ///
    /// Stations keep the metadata of their first appearance. A line whose
    /// name, colour or kind differs between snapshots is a conflict.
    pub fn from_snapshots<'a>(snapshots: impl IntoIterator<Item = &'a Snapshot>) -> Result<Self> {
        let mut registry = Self::new();

        for snapshot in snapshots {
            for line in snapshot.lines.values() {
                registry.register_line(LineMetadata::from(line))?;
            }

            for station in snapshot.stations.values() {
                if !registry.stations.contains_key(&station.id) {
                    registry.register_station(StationMetadata {
                        id: station.id.clone(),
                        first_name: station.name.clone(),
                        introduced: snapshot.effective_date,
                    })?;
                }
            }
        }

        tracing::debug!(
            stations = registry.stations.len(),
            lines = registry.lines.len(),
            "entity registry built"
        );

        Ok(registry)
    }

    /// Registering identical metadata twice is a no-op
    pub fn register_station(&mut self, metadata: StationMetadata) -> Result<()> {
        match self.stations.get(&metadata.id) {
            Some(existing) if existing == &metadata => Ok(()),
            Some(existing) => Err(TopologyError::DuplicateId(format!(
                "station {} already registered as {:?} (introduced {})",
                existing.id, existing.first_name, existing.introduced
            ))),
            None => {
                self.stations.insert(metadata.id.clone(), metadata);
                Ok(())
            }
        }
    }

    pub fn register_line(&mut self, metadata: LineMetadata) -> Result<()> {
        match self.lines.get(&metadata.id) {
            Some(existing) if existing == &metadata => Ok(()),
            Some(existing) => Err(TopologyError::DuplicateId(format!(
                "line {} already registered as {:?} {} {:?}, got {:?} {} {:?}",
                existing.id,
                existing.name,
                existing.color,
                existing.kind,
                metadata.name,
                metadata.color,
                metadata.kind
            ))),
            None => {
                self.lines.insert(metadata.id.clone(), metadata);
                Ok(())
            }
        }
    }

    pub fn resolve_station(&self, id: &StationId) -> Result<&StationMetadata> {
        self.stations
            .get(id)
            .ok_or_else(|| TopologyError::NotFound(format!("station {id}")))
    }

    pub fn resolve_line(&self, id: &LineId) -> Result<&LineMetadata> {
        self.lines
            .get(id)
            .ok_or_else(|| TopologyError::NotFound(format!("line {id}")))
    }

    pub fn stations(&self) -> impl Iterator<Item = &StationMetadata> {
        self.stations.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineMetadata> {
        self.lines.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_build_from_corpus() {
        let (a, b) = (snapshot_a(), snapshot_b());
        let registry = EntityRegistry::from_snapshots([&a, &b]).unwrap();

        let bkp = registry.resolve_station(&StationId::new("bkp")).unwrap();
        assert_eq!(bkp.introduced, date(2012, 1, 1));

        let csw = registry.resolve_station(&StationId::new("csw")).unwrap();
        assert_eq!(csw.introduced, date(2017, 11, 1));

        assert_eq!(registry.resolve_line(&LineId::new("dtl")).unwrap().kind, LineKind::Metro);
        assert_eq!(registry.stations().count(), 5);
    }

    #[test]
    fn test_station_keeps_first_name_after_rename() {
        let a = snapshot_a();
        let mut b = snapshot_b();
        b.stations.get_mut(&StationId::new("pnx")).unwrap().name = "Phoenix (renamed)".into();

        let registry = EntityRegistry::from_snapshots([&a, &b]).unwrap();
        assert_eq!(&*registry.resolve_station(&StationId::new("pnx")).unwrap().first_name, "Phoenix");
    }

    #[test]
    fn test_conflicting_line_metadata() {
        let a = snapshot_a();
        let mut b = snapshot_b();
        b.lines.get_mut(&LineId::new("bplrt")).unwrap().color = "#FF0000".into();

        let err = EntityRegistry::from_snapshots([&a, &b]).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateId(_)));
    }

    #[test]
    fn test_register_station_idempotent_then_conflict() {
        let mut registry = EntityRegistry::new();
        let meta = StationMetadata {
            id: StationId::new("cth"),
            first_name: "City Hall".into(),
            introduced: date(1987, 12, 12),
        };

        registry.register_station(meta.clone()).unwrap();
        registry.register_station(meta.clone()).unwrap();

        let conflicting = StationMetadata {
            introduced: date(1990, 1, 1),
            ..meta
        };
        assert!(matches!(
            registry.register_station(conflicting),
            Err(TopologyError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_unknown_entity() {
        let registry = EntityRegistry::new();
        assert!(matches!(
            registry.resolve_station(&StationId::new("nope")),
            Err(TopologyError::NotFound(_))
        ));
        assert!(matches!(
            registry.resolve_line(&LineId::new("nope")),
            Err(TopologyError::NotFound(_))
        ));
    }
}
