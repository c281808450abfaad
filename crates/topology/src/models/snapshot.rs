//! One dated, self-validating graph of the network.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::NaiveDate;
use geo::{Point, Rect};

use crate::identifiers::*;
use crate::models::error::{Result, TopologyError, ValidationError, ValidationReason};
use crate::models::types::*;

/// The network as of one effective date.
///
/// Stations and lines are keyed by id so iteration (and therefore the first
/// reported validation failure) is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub effective_date: NaiveDate,
    pub label: Arc<str>,
    pub canvas: Rect,
    pub lines: BTreeMap<LineId, Line>,
    pub stations: BTreeMap<StationId, Station>,
    pub segments: Vec<LineSegment>,
}

impl Snapshot {
    pub fn new(effective_date: NaiveDate, label: &str, canvas: Rect) -> Self {
        Self {
            effective_date,
            label: label.into(),
            canvas,
            lines: BTreeMap::new(),
            stations: BTreeMap::new(),
            segments: Vec::new(),
        }
    }

    /// Build from flat lists, rejecting repeated station or line ids
    pub fn from_parts(
        effective_date: NaiveDate,
        label: &str,
        canvas: Rect,
        lines: Vec<Line>,
        stations: Vec<Station>,
        segments: Vec<LineSegment>,
    ) -> Result<Self> {
        let mut snapshot = Self::new(effective_date, label, canvas);

        for line in lines {
            if snapshot.lines.contains_key(&line.id) {
                return Err(TopologyError::DuplicateId(format!(
                    "line {} declared twice in snapshot {}",
                    line.id, effective_date
                )));
            }
            snapshot.lines.insert(line.id.clone(), line);
        }

        for station in stations {
            if snapshot.stations.contains_key(&station.id) {
                return Err(TopologyError::DuplicateId(format!(
                    "station {} declared twice in snapshot {}",
                    station.id, effective_date
                )));
            }
            snapshot.stations.insert(station.id.clone(), station);
        }

        snapshot.segments = segments;
        Ok(snapshot)
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.insert(line.id.clone(), line);
        self
    }

    pub fn with_station(mut self, station: Station) -> Self {
        self.stations.insert(station.id.clone(), station);
        self
    }

    pub fn with_segment(mut self, segment: LineSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn segments_of<'a>(&'a self, line: &'a LineId) -> impl Iterator<Item = &'a LineSegment> + 'a {
        self.segments.iter().filter(move |segment| &segment.line == line)
    }

    pub fn interchanges(&self) -> impl Iterator<Item = &Station> {
        self.stations.values().filter(|station| station.is_interchange())
    }

    /// Check every invariant and return the first violation.
    ///
    /// Checks run in a fixed order: segment endpoints, line references,
    /// line connectivity, canvas bounds, code ordinals.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.check_endpoints()?;
        self.check_line_references()?;
        self.check_connectivity()?;
        self.check_bounds()?;
        self.check_ordinals()
    }

    /// Stations carrying a code for `line`, in travel order.
    ///
    /// Ordered by code ordinal, not declaration order. A station holding two
    /// codes on the line appears once per code. Two codes sharing an ordinal
    /// is an error.
    pub fn stations_with_code(&self, line: &LineId) -> std::result::Result<Vec<&Station>, ValidationError> {
        Ok(self.codes_in_order(line)?.into_iter().map(|(_, station)| station).collect())
    }

    /// Every code on `line` with its station, sorted by ordinal
    pub fn codes_in_order(
        &self,
        line: &LineId,
    ) -> std::result::Result<Vec<(&StationCode, &Station)>, ValidationError> {
        let mut coded: Vec<(&StationCode, &Station)> = self
            .stations
            .values()
            .flat_map(|station| {
                station
                    .codes
                    .iter()
                    .filter(move |code| code.line() == line)
                    .map(move |code| (code, station))
            })
            .collect();
        coded.sort_by(|a, b| a.0.ordinal().cmp(b.0.ordinal()));

        if let Some(pair) = coded.windows(2).find(|pair| pair[0].0.ordinal() == pair[1].0.ordinal()) {
            return Err(ValidationError::new(ValidationReason::DuplicateOrdinal)
                .on_line(line)
                .at_station(&pair[1].1.id));
        }

        Ok(coded)
    }

    fn check_endpoints(&self) -> std::result::Result<(), ValidationError> {
        for segment in &self.segments {
            for endpoint in [&segment.from, &segment.to] {
                if !self.stations.contains_key(endpoint) {
                    return Err(ValidationError::new(ValidationReason::DanglingEndpoint)
                        .on_line(&segment.line)
                        .at_station(endpoint));
                }
            }
        }
        Ok(())
    }

    fn check_line_references(&self) -> std::result::Result<(), ValidationError> {
        for segment in &self.segments {
            if !self.lines.contains_key(&segment.line) {
                return Err(ValidationError::new(ValidationReason::UnknownLine)
                    .on_line(&segment.line)
                    .at_station(&segment.from));
            }
        }

        let drawn: HashSet<&LineId> = self.segments.iter().map(|segment| &segment.line).collect();

        for station in self.stations.values() {
            for code in &station.codes {
                if !self.lines.contains_key(code.line()) {
                    return Err(ValidationError::new(ValidationReason::UnknownLine)
                        .on_line(code.line())
                        .at_station(&station.id));
                }
                if !drawn.contains(code.line()) {
                    return Err(ValidationError::new(ValidationReason::OrphanCode)
                        .on_line(code.line())
                        .at_station(&station.id));
                }
            }
        }
        Ok(())
    }

    fn check_connectivity(&self) -> std::result::Result<(), ValidationError> {
        for line in self.lines.keys() {
            let mut adjacency: HashMap<&StationId, Vec<&StationId>> = HashMap::new();
            for segment in self.segments_of(line) {
                adjacency.entry(&segment.from).or_default().push(&segment.to);
                adjacency.entry(&segment.to).or_default().push(&segment.from);
            }

            let Some(start) = self.segments_of(line).next().map(|segment| &segment.from) else {
                continue;
            };

            let mut seen: HashSet<&StationId> = HashSet::from([start]);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for next in adjacency.get(current).into_iter().flatten() {
                    if seen.insert(*next) {
                        queue.push_back(*next);
                    }
                }
            }

            let mut unreached: Vec<&&StationId> = adjacency.keys().filter(|id| !seen.contains(*id)).collect();
            unreached.sort();
            if let Some(station) = unreached.first() {
                return Err(ValidationError::new(ValidationReason::DisconnectedLine)
                    .on_line(line)
                    .at_station(station));
            }

            for station in self.stations.values() {
                if station.code_for(line).is_some() && !adjacency.contains_key(&station.id) {
                    return Err(ValidationError::new(ValidationReason::DisconnectedLine)
                        .on_line(line)
                        .at_station(&station.id));
                }
            }
        }
        Ok(())
    }

    fn check_bounds(&self) -> std::result::Result<(), ValidationError> {
        for station in self.stations.values() {
            if !within(&self.canvas, station.position) {
                return Err(ValidationError::new(ValidationReason::OutOfBounds).at_station(&station.id));
            }
        }
        Ok(())
    }

    fn check_ordinals(&self) -> std::result::Result<(), ValidationError> {
        for line in self.lines.keys() {
            self.stations_with_code(line)?;
        }
        Ok(())
    }
}

/// Inclusive of the canvas edge; NaN coordinates are never within.
fn within(canvas: &Rect, position: Point) -> bool {
    let (min, max) = (canvas.min(), canvas.max());
    position.x() >= min.x && position.x() <= max.x && position.y() >= min.y && position.y() <= max.y
}
