//! Ordered snapshot storage and temporal resolution.

pub mod snapshot_store;

pub use snapshot_store::{today, SnapshotStore, REFERENCE_UTC_OFFSET_HOURS};
