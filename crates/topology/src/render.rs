//! Plain serializable view of a snapshot for the diagram renderer.
//!
//! Everything the renderer needs for stroke colour, width and dashing is
//! resolved here so it never has to look back into the topology model.

use std::sync::Arc;

use chrono::NaiveDate;
use geo::{Coord, Point, Rect};
use serde::Serialize;

use crate::identifiers::*;
use crate::models::*;

/// SVG dash array for anything planned or under construction
pub const PLANNED_DASH: &str = "6 4";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderView {
    pub effective_date: NaiveDate,
    pub label: Arc<str>,
    pub canvas: Rect,
    pub lines: Vec<RenderLine>,
    pub stations: Vec<RenderStation>,
    pub segments: Vec<RenderSegment>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderLine {
    pub id: LineId,
    pub name: Arc<str>,
    pub color: Arc<str>,
    pub stroke_width: f32,
    pub dash: Option<&'static str>,
    /// Stations in travel order
    pub stations: Vec<StationId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderStation {
    pub id: StationId,
    pub name: Arc<str>,
    pub position: Point,
    pub label_offset: Coord,
    pub codes: Vec<String>,
    pub status: StationStatus,
    pub interchange: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSegment {
    pub line: LineId,
    pub from: StationId,
    pub to: StationId,
    pub path: Option<Arc<str>>,
    pub color: Arc<str>,
    pub stroke_width: f32,
    pub dash: Option<&'static str>,
}

impl Snapshot {
    pub fn render_view(&self) -> RenderView {
        let lines = self
            .lines
            .values()
            .map(|line| RenderLine {
                id: line.id.clone(),
                name: line.name.clone(),
                color: line.color.clone(),
                stroke_width: line.kind.stroke_width(),
                dash: dash_for(line.style == LineStyle::Dashed),
                stations: self
                    .stations_with_code(&line.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|station| station.id.clone())
                    .collect(),
            })
            .collect();

        let stations = self
            .stations
            .values()
            .map(|station| RenderStation {
                id: station.id.clone(),
                name: station.name.clone(),
                position: station.position,
                label_offset: station.label_offset,
                codes: station.codes.iter().map(ToString::to_string).collect(),
                status: station.status,
                interchange: station.is_interchange(),
            })
            .collect();

        let segments = self
            .segments
            .iter()
            .filter_map(|segment| {
                let line = self.lines.get(&segment.line)?;
                Some(RenderSegment {
                    line: segment.line.clone(),
                    from: segment.from.clone(),
                    to: segment.to.clone(),
                    path: segment.path.clone(),
                    color: line.color.clone(),
                    stroke_width: line.kind.stroke_width(),
                    dash: dash_for(segment.planned || line.style == LineStyle::Dashed),
                })
            })
            .collect();

        RenderView {
            effective_date: self.effective_date,
            label: self.label.clone(),
            canvas: self.canvas,
            lines,
            stations,
            segments,
        }
    }
}

fn dash_for(planned: bool) -> Option<&'static str> {
    planned.then_some(PLANNED_DASH)
}
