//! HTTP surface over the snapshot store: the network as it was in a given
//! month, and what changed when that snapshot was published.

pub mod config;
pub mod error;
pub mod locale;
pub mod routes;

pub use config::Config;
pub use routes::{AppState, create_router};
