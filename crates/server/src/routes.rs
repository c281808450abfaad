use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::get;
use axum::Router;
use chrono::{Datelike, NaiveDate};
use mrt_topology::store::today;
use mrt_topology::{Change, RenderView, SnapshotStore};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::locale::Lang;

pub struct AppState {
    pub store: SnapshotStore,
    pub default_lang: Lang,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/history", get(current_month_default_lang))
        .route("/history/{year}/{month}", get(month_default_lang))
        .route("/{lang}/history", get(current_month))
        .route("/{lang}/history/{year}/{month}", get(history_page))
        .route("/{lang}/history/{year}/{month}/changes", get(changes_page))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub lang: Lang,
    pub query_date: NaiveDate,
    /// First day the snapshot after this one applies; absent for the latest
    pub valid_until: Option<NaiveDate>,
    pub snapshot: RenderView,
}

#[derive(Debug, Serialize)]
pub struct ChangeEntry {
    pub text: String,
    #[serde(flatten)]
    pub change: Change,
}

#[derive(Debug, Serialize)]
pub struct ChangesPage {
    pub lang: Lang,
    pub query_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub previous: Option<NaiveDate>,
    pub changes: Vec<ChangeEntry>,
}

fn month_path(lang: Lang, date: NaiveDate) -> String {
    format!("/{lang}/history/{}/{}", date.year(), date.month())
}

fn parse_lang(lang: &str) -> Result<Lang, ApiError> {
    lang.parse().map_err(|_| ApiError::UnsupportedLang(lang.to_string()))
}

/// First of the requested month
fn query_date(year: i32, month: u32) -> Result<NaiveDate, ApiError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ApiError::InvalidMonth { year, month })
}

async fn current_month_default_lang(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&month_path(state.default_lang, today()))
}

async fn month_default_lang(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Redirect, ApiError> {
    let date = query_date(year, month)?;
    Ok(Redirect::temporary(&month_path(state.default_lang, date)))
}

async fn current_month(Path(lang): Path<String>) -> Result<Redirect, ApiError> {
    let lang = parse_lang(&lang)?;
    Ok(Redirect::temporary(&month_path(lang, today())))
}

async fn history_page(
    State(state): State<Arc<AppState>>,
    Path((lang, year, month)): Path<(String, i32, u32)>,
) -> Result<Response, ApiError> {
    let lang = parse_lang(&lang)?;
    let query_date = query_date(year, month)?;

    let index = state.store.resolve_index(query_date)?;
    let snapshot = state.store.resolve(query_date)?;
    let valid_until = state.store.validity(index).and_then(|validity| validity.until);

    Ok(Json(HistoryPage {
        lang,
        query_date,
        valid_until,
        snapshot: snapshot.render_view(),
    })
    .into_response())
}

async fn changes_page(
    State(state): State<Arc<AppState>>,
    Path((lang, year, month)): Path<(String, i32, u32)>,
) -> Result<Response, ApiError> {
    let lang = parse_lang(&lang)?;
    let query_date = query_date(year, month)?;

    let index = state.store.resolve_index(query_date)?;
    let current = state.store.resolve(query_date)?;
    let previous = index.checked_sub(1).and_then(|i| state.store.get(i));

    let changes = match (previous, state.store.changes_at(index)) {
        (Some(previous), Some(delta)) => delta?
            .summary(previous, current)
            .into_iter()
            .map(|change| ChangeEntry {
                text: change.to_string(),
                change,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(Json(ChangesPage {
        lang,
        query_date,
        effective_date: current.effective_date,
        previous: previous.map(|snapshot| snapshot.effective_date),
        changes,
    })
    .into_response())
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use mrt_topology::geo::{Point, Rect, coord};
    use mrt_topology::prelude::*;
    use serde_json::Value;
    use tower::ServiceExt;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn snapshot_a() -> Snapshot {
        let canvas = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 100.0 });
        Snapshot::new(date(2012, 1, 1), "Bukit Panjang LRT", canvas)
            .with_line(Line {
                id: LineId::new("bplrt"),
                name: "Bukit Panjang LRT".into(),
                color: "#748477".into(),
                kind: LineKind::LightRail,
                style: LineStyle::Solid,
            })
            .with_station(
                Station::new("bkp", "Bukit Panjang", Point::new(30.0, 20.0))
                    .with_code(StationCode::parse("bplrt", "BP6").unwrap()),
            )
            .with_station(
                Station::new("pnx", "Phoenix", Point::new(20.0, 15.0))
                    .with_code(StationCode::parse("bplrt", "BP5").unwrap()),
            )
            .with_segment(LineSegment::new("bplrt", "pnx", "bkp"))
    }

    fn snapshot_b() -> Snapshot {
        let mut snapshot = snapshot_a()
            .with_line(Line {
                id: LineId::new("dtl"),
                name: "Downtown Line".into(),
                color: "#005EC4".into(),
                kind: LineKind::Metro,
                style: LineStyle::Solid,
            })
            .with_station(
                Station::new("csw", "Cashew", Point::new(40.0, 35.0))
                    .with_code(StationCode::parse("dtl", "DT2").unwrap()),
            )
            .with_segment(LineSegment::new("dtl", "bkp", "csw"));
        snapshot.effective_date = date(2017, 11, 1);
        if let Some(bkp) = snapshot.stations.get_mut(&StationId::new("bkp")) {
            bkp.codes.insert(StationCode::parse("dtl", "DT1").unwrap());
        }
        snapshot
    }

    fn app() -> Router {
        create_router(AppState {
            store: SnapshotStore::from_snapshots(vec![snapshot_a(), snapshot_b()]).unwrap(),
            default_lang: Lang::En,
        })
    }

    async fn get(uri: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(get("/health").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_history_page_resolves_floor() {
        let response = get("/en/history/2015/6").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["query_date"], "2015-06-01");
        assert_eq!(body["valid_until"], "2017-11-01");
        assert_eq!(body["snapshot"]["effective_date"], "2012-01-01");
    }

    #[tokio::test]
    async fn test_history_page_latest_is_open_ended() {
        let body = json(get("/zh/history/2020/1").await).await;
        assert_eq!(body["lang"], "zh");
        assert_eq!(body["snapshot"]["effective_date"], "2017-11-01");
        assert!(body["valid_until"].is_null());
    }

    #[tokio::test]
    async fn test_before_first_snapshot() {
        let body = json(get("/en/history/1990/1").await).await;
        assert_eq!(body["snapshot"]["effective_date"], "2012-01-01");
    }

    #[tokio::test]
    async fn test_invalid_month() {
        assert_eq!(get("/en/history/2015/13").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get("/en/history/2015/june").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_lang() {
        assert_eq!(get("/fr/history/2015/6").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_lang_redirects() {
        let response = get("/history/2015/6").await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/en/history/2015/6");
    }

    #[tokio::test]
    async fn test_bare_history_redirects_to_current_month() {
        let now = today();
        let expected = format!("/en/history/{}/{}", now.year(), now.month());

        let response = get("/history").await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), expected);

        let response = get("/ms/history").await;
        assert_eq!(location(&response), format!("/ms/history/{}/{}", now.year(), now.month()));
    }

    #[tokio::test]
    async fn test_changes_page() {
        let body = json(get("/en/history/2018/3/changes").await).await;
        assert_eq!(body["effective_date"], "2017-11-01");
        assert_eq!(body["previous"], "2012-01-01");

        let texts: Vec<&str> = body["changes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["text"].as_str().unwrap())
            .collect();
        assert_eq!(
            texts,
            [
                "Cashew station added",
                "Bukit Panjang gains code DT1",
                "Downtown Line: Bukit Panjang to Cashew added",
            ]
        );
        assert_eq!(body["changes"][0]["kind"], "station_added");
    }

    #[tokio::test]
    async fn test_changes_page_for_first_snapshot_is_empty() {
        let body = json(get("/en/history/2012/1/changes").await).await;
        assert!(body["previous"].is_null());
        assert_eq!(body["changes"].as_array().unwrap().len(), 0);
    }
}
