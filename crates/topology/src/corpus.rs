//! Loader for the persisted snapshot corpus.
//!
//! One JSON document per effective date. Every document is validated before
//! it is admitted, and the store is built from the documents in file-name
//! order so a misnamed file surfaces as a malformed store instead of being
//! silently re-sorted.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::models::*;
use crate::store::SnapshotStore;

/// Incremented when the document layout changes
pub const CORPUS_FORMAT_VERSION: u32 = 1;

/// On-disk layout of one snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub format_version: u32,
    pub effective_date: NaiveDate,
    pub label: String,
    pub canvas: Rect,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub segments: Vec<LineSegment>,
}

impl SnapshotDocument {
    pub fn into_snapshot(self) -> Result<Snapshot> {
        if self.format_version != CORPUS_FORMAT_VERSION {
            return Err(TopologyError::Corpus(format!(
                "snapshot {} has format_version {}, expected {}",
                self.effective_date, self.format_version, CORPUS_FORMAT_VERSION
            )));
        }

        // Rect::new orders the corners, which deserialising does not
        let canvas = Rect::new(self.canvas.min(), self.canvas.max());

        Snapshot::from_parts(
            self.effective_date,
            &self.label,
            canvas,
            self.lines,
            self.stations,
            self.segments,
        )
    }
}

impl From<&Snapshot> for SnapshotDocument {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            format_version: CORPUS_FORMAT_VERSION,
            effective_date: snapshot.effective_date,
            label: snapshot.label.to_string(),
            canvas: snapshot.canvas,
            lines: snapshot.lines.values().cloned().collect(),
            stations: snapshot.stations.values().cloned().collect(),
            segments: snapshot.segments.clone(),
        }
    }
}

/// Parse and validate one document
pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    let document: SnapshotDocument =
        serde_json::from_str(json).map_err(|e| TopologyError::Corpus(e.to_string()))?;
    let snapshot = document.into_snapshot()?;

    snapshot.validate().map_err(|source| TopologyError::InvalidSnapshot {
        date: snapshot.effective_date,
        source,
    })?;

    Ok(snapshot)
}

pub fn to_json(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(&SnapshotDocument::from(snapshot))
        .map_err(|e| TopologyError::Corpus(e.to_string()))
}

/// `*.json` files in `dir`, sorted by file name
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| TopologyError::Corpus(format!("{}: {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| TopologyError::Corpus(format!("{}: {e}", dir.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn load_file(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| TopologyError::Corpus(format!("{}: {e}", path.display())))?;
    let snapshot = parse_snapshot(&json)?;

    tracing::debug!(
        path = %path.display(),
        effective_date = %snapshot.effective_date,
        stations = snapshot.stations.len(),
        "snapshot admitted"
    );

    Ok(snapshot)
}

/// Load every document in `dir` and build the store
pub fn load_dir(dir: &Path) -> Result<SnapshotStore> {
    let snapshots = corpus_files(dir)?
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>>>()?;

    SnapshotStore::from_snapshots(snapshots)
}
