//! Core data types and enums for the network topology.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::identifiers::*;
use crate::models::error::{Result, TopologyError};

// ============================================================================
// Enums
// ============================================================================

/// Class of rail service, which fixes the stroke weight of a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Metro,
    LightRail,
}

impl LineKind {
    pub fn stroke_width(self) -> f32 {
        match self {
            Self::Metro => 6.0,
            Self::LightRail => 3.0,
        }
    }
}

/// How a line is stroked in one snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    /// Under construction
    Dashed,
}

/// Lifecycle state of a station within one snapshot.
///
/// Set explicitly by the corpus author. Never derived from how the station
/// happens to be drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    #[default]
    Operational,
    UnderConstruction,
    Planned,
    Closed,
}

// ============================================================================
// Lines
// ============================================================================

/// A rail line as drawn in one snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: Arc<str>,
    /// Hex RGB, e.g. "#D42E12"
    pub color: Arc<str>,
    pub kind: LineKind,
    #[serde(default)]
    pub style: LineStyle,
}

// ============================================================================
// Station codes
// ============================================================================

/// Sort key of a station code within its line.
///
/// Label-only codes (e.g. the `STC` hub of a light-rail loop) sort before
/// numbered ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodeOrdinal {
    Label(Arc<str>),
    Number { number: u32, suffix: Option<char> },
}

impl fmt::Display for CodeOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}"),
            Self::Number { number, suffix: Some(c) } => write!(f, "{number}{c}"),
            Self::Number { number, suffix: None } => write!(f, "{number}"),
        }
    }
}

/// A line-scoped label such as `NS 17` or `DT1`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStationCode", into = "RawStationCode")]
pub struct StationCode {
    line: LineId,
    label: Arc<str>,
    ordinal: CodeOrdinal,
}

impl StationCode {
    /// Parse a code label for `line`.
    ///
    /// Accepts an alphabetic prefix, an optional space, digits and at most one
    /// trailing letter (`TE22A`). Anything else is kept as a plain label.
    pub fn parse(line: impl Into<LineId>, label: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TopologyError::InvalidCode(label.to_string()));
        }

        let ordinal = parse_ordinal(label).unwrap_or_else(|| CodeOrdinal::Label(label.into()));

        Ok(Self {
            line: line.into(),
            label: label.into(),
            ordinal,
        })
    }

    pub fn line(&self) -> &LineId {
        &self.line
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ordinal(&self) -> &CodeOrdinal {
        &self.ordinal
    }
}

fn parse_ordinal(label: &str) -> Option<CodeOrdinal> {
    let rest = label.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim_start();
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let number = rest[..digits_end].parse().ok()?;
    let mut tail = rest[digits_end..].chars();
    let suffix = match (tail.next(), tail.next()) {
        (None, _) => None,
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => return None,
    };

    Some(CodeOrdinal::Number { number, suffix })
}

impl PartialOrd for StationCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StationCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.ordinal.cmp(&other.ordinal))
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct RawStationCode {
    line: LineId,
    code: String,
}

impl TryFrom<RawStationCode> for StationCode {
    type Error = TopologyError;

    fn try_from(raw: RawStationCode) -> Result<Self> {
        Self::parse(raw.line, &raw.code)
    }
}

impl From<StationCode> for RawStationCode {
    fn from(code: StationCode) -> Self {
        Self {
            line: code.line,
            code: code.label.to_string(),
        }
    }
}

// ============================================================================
// Stations and segments
// ============================================================================

/// A station as it appears in one snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: Arc<str>,
    /// Diagram space, not geographic
    pub position: Point,
    #[serde(default)]
    pub codes: BTreeSet<StationCode>,
    #[serde(default)]
    pub label_offset: Coord,
    #[serde(default)]
    pub status: StationStatus,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: &str, position: Point) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            codes: BTreeSet::new(),
            label_offset: Coord { x: 0.0, y: 0.0 },
            status: StationStatus::Operational,
        }
    }

    pub fn with_code(mut self, code: StationCode) -> Self {
        self.codes.insert(code);
        self
    }

    pub fn with_status(mut self, status: StationStatus) -> Self {
        self.status = status;
        self
    }

    /// First code held on `line`; a branch station can hold more than one
    pub fn code_for(&self, line: &LineId) -> Option<&StationCode> {
        self.codes.iter().find(|code| code.line() == line)
    }

    /// Holds codes for more than one line
    pub fn is_interchange(&self) -> bool {
        let mut lines = self.codes.iter().map(StationCode::line);
        match lines.next() {
            Some(first) => lines.any(|line| line != first),
            None => false,
        }
    }
}

/// A track segment between two adjacent stations of one line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub line: LineId,
    pub from: StationId,
    pub to: StationId,
    /// Opaque display path (SVG path data); never interpreted by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Arc<str>>,
    /// Planned or under construction
    #[serde(default)]
    pub planned: bool,
}

impl LineSegment {
    pub fn new(line: impl Into<LineId>, from: impl Into<StationId>, to: impl Into<StationId>) -> Self {
        Self {
            line: line.into(),
            from: from.into(),
            to: to.into(),
            path: None,
            planned: false,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn planned(mut self) -> Self {
        self.planned = true;
        self
    }

    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(&self.line, &self.from, &self.to)
    }

    pub fn touches(&self, station: &StationId) -> bool {
        &self.from == station || &self.to == station
    }
}

/// Topological identity of a segment.
///
/// Track is undirected, so the endpoints are stored in sorted order and a
/// segment redrawn in the opposite direction keeps its key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    pub line: LineId,
    pub a: StationId,
    pub b: StationId,
}

impl SegmentKey {
    pub fn new(line: &LineId, from: &StationId, to: &StationId) -> Self {
        let (a, b) = if from <= to { (from, to) } else { (to, from) };
        Self {
            line: line.clone(),
            a: a.clone(),
            b: b.clone(),
        }
    }
}
