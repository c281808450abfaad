//! # mrt-topology
//!
//! Temporal topology model of a rail network whose stations, lines and
//! interchanges change over time.
//!
//! ## Features
//!
//! - **Snapshots**: one validated graph of the network per effective date
//! - **Entity registry**: stable station and line identity across snapshots
//! - **Temporal resolution**: O(log n) lookup of the snapshot in effect on a date
//! - **Diff engine**: stations, codes and segments gained or lost between snapshots
//! - **Corpus loader**: versioned JSON documents, validated before admission
//!
//! ## Example
//!
//! ```
//! use mrt_topology::prelude::*;
//! use chrono::NaiveDate;
//! use geo::{coord, Point, Rect};
//!
//! let canvas = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 100.0 });
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//!
//! let bplrt = Line {
//!     id: LineId::new("bplrt"),
//!     name: "Bukit Panjang LRT".into(),
//!     color: "#748477".into(),
//!     kind: LineKind::LightRail,
//!     style: LineStyle::Solid,
//! };
//!
//! let a = Snapshot::new(date(2012, 1, 1), "BPLRT", canvas)
//!     .with_line(bplrt)
//!     .with_station(Station::new("bkp", "Bukit Panjang", Point::new(30.0, 20.0))
//!         .with_code(StationCode::parse("bplrt", "BP6").unwrap()))
//!     .with_station(Station::new("pnx", "Phoenix", Point::new(20.0, 15.0))
//!         .with_code(StationCode::parse("bplrt", "BP5").unwrap()))
//!     .with_segment(LineSegment::new("bplrt", "pnx", "bkp"));
//!
//! let store = SnapshotStore::from_snapshots(vec![a]).unwrap();
//!
//! // Dates before the first snapshot resolve to the first snapshot
//! let snapshot = store.resolve(date(1990, 1, 1)).unwrap();
//! assert_eq!(snapshot.effective_date, date(2012, 1, 1));
//! ```

pub mod corpus;
pub mod diff;
pub mod identifiers;
pub mod models;
pub mod registry;
pub mod render;
pub mod status;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenience
pub mod prelude {
    pub use crate::diff::{diff, Change, SnapshotDelta, Transition};
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::registry::{EntityRegistry, LineMetadata, StationMetadata};
    pub use crate::render::{RenderLine, RenderSegment, RenderStation, RenderView};
    pub use crate::status::{LineStatus, NetworkStatus, StaticStatus, StatusSource};
    pub use crate::store::SnapshotStore;
}

pub use prelude::*;

// Geometry types appear in the public API
pub use geo;
