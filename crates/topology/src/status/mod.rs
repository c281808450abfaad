//! Status overlay contract.
//!
//! Operational status comes from an external source. The core only defines
//! the shapes it is handed in; it never computes or stores status.

pub mod traits;

pub use traits::{LineStatus, NetworkStatus, StaticStatus, StatusSource};
