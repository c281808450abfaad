//! Small hand-built snapshots shared by the unit tests.
//!
//! Snapshot A is the Bukit Panjang LRT alone; snapshot B adds the first
//! Downtown Line stretch with `bkp` becoming an interchange.

use chrono::NaiveDate;
use geo::{Point, Rect, coord};

use crate::prelude::*;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn canvas() -> Rect {
    Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 100.0 })
}

pub fn code(line: &str, label: &str) -> StationCode {
    StationCode::parse(line, label).unwrap()
}

pub fn station(id: &str, name: &str, x: f64, y: f64) -> Station {
    Station::new(id, name, Point::new(x, y))
}

pub fn line(id: &str, name: &str, color: &str, kind: LineKind) -> Line {
    Line {
        id: id.into(),
        name: name.into(),
        color: color.into(),
        kind,
        style: LineStyle::Solid,
    }
}

pub fn snapshot_a() -> Snapshot {
    Snapshot::new(date(2012, 1, 1), "Bukit Panjang LRT", canvas())
        .with_line(line("bplrt", "Bukit Panjang LRT", "#748477", LineKind::LightRail))
        .with_station(station("bkp", "Bukit Panjang", 30.0, 20.0).with_code(code("bplrt", "BP6")))
        .with_station(station("cck", "Choa Chu Kang", 10.0, 10.0).with_code(code("bplrt", "BP1")))
        .with_station(station("pnx", "Phoenix", 20.0, 15.0).with_code(code("bplrt", "BP5")))
        .with_station(station("snj", "Senja", 40.0, 25.0).with_code(code("bplrt", "BP13")))
        .with_segment(LineSegment::new("bplrt", "cck", "pnx"))
        .with_segment(LineSegment::new("bplrt", "pnx", "bkp"))
        .with_segment(LineSegment::new("bplrt", "bkp", "snj"))
}

pub fn snapshot_b() -> Snapshot {
    let mut snapshot = snapshot_a()
        .with_line(line("dtl", "Downtown Line", "#005EC4", LineKind::Metro))
        .with_station(station("csw", "Cashew", 40.0, 35.0).with_code(code("dtl", "DT2")))
        .with_segment(LineSegment::new("dtl", "bkp", "csw").with_path("M 30 20 L 40 35"));
    snapshot.effective_date = date(2017, 11, 1);
    snapshot.label = "Downtown Line stage 2".into();
    if let Some(bkp) = snapshot.stations.get_mut(&StationId::new("bkp")) {
        bkp.codes.insert(code("dtl", "DT1"));
    }
    snapshot
}
