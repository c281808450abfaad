//! Pluggable status source.
//!
//! External crates implement [`StatusSource`] over whatever uptime feed they
//! consume.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identifiers::*;

/// Operational state of one line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    #[default]
    Operational,
    Disrupted,
    UnderMaintenance,
}

/// Network-wide headline state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    AllOperational,
    SomeLinesDisrupted,
    SomeLinesUnderMaintenance,
}

impl NetworkStatus {
    /// Fold per-line states; any disruption outranks maintenance
    pub fn aggregate(states: impl IntoIterator<Item = LineStatus>) -> Self {
        let mut status = Self::AllOperational;
        for state in states {
            match state {
                LineStatus::Disrupted => return Self::SomeLinesDisrupted,
                LineStatus::UnderMaintenance => status = Self::SomeLinesUnderMaintenance,
                LineStatus::Operational => {}
            }
        }
        status
    }
}

/// Supplies operational state per line or station
pub trait StatusSource: Send + Sync {
    fn line_status(&self, line: &LineId) -> Option<LineStatus>;

    /// Stations default to unknown; most feeds only report lines
    fn station_status(&self, _station: &StationId) -> Option<LineStatus> {
        None
    }

    /// Headline state over `lines`; lines the source does not know count as
    /// operational
    fn network_status<'a>(&self, lines: impl IntoIterator<Item = &'a LineId>) -> NetworkStatus
    where
        Self: Sized,
    {
        NetworkStatus::aggregate(
            lines
                .into_iter()
                .map(|line| self.line_status(line).unwrap_or_default()),
        )
    }
}

/// Fixed map of line states, for tests and offline previews
#[derive(Clone, Debug, Default)]
pub struct StaticStatus {
    lines: HashMap<LineId, LineStatus>,
}

impl StaticStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: impl Into<LineId>, status: LineStatus) -> Self {
        self.lines.insert(line.into(), status);
        self
    }
}

impl StatusSource for StaticStatus {
    fn line_status(&self, line: &LineId) -> Option<LineStatus> {
        self.lines.get(line).copied()
    }
}
