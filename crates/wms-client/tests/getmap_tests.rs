//! GetMap fetches against an in-process stand-in for the map server.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use flood_common::{TimeStep, UiState, ViewMode};
use test_utils::{base_url, config_for, serve};
use wms_client::{http_client, resolve, ClientError, GetMapRequest, ResolverConfig};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Answers with an image only when TIME is present, mimicking a time-enabled
/// mosaic; otherwise an XML exception with 200 OK.
async fn wms(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("REQUEST").map(String::as_str) != Some("GetMap") {
        return (StatusCode::BAD_REQUEST, [(CONTENT_TYPE, "text/plain")], Vec::new());
    }
    match params.get("TIME") {
        Some(_) => (StatusCode::OK, [(CONTENT_TYPE, "image/png")], PNG_MAGIC.to_vec()),
        None => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/vnd.ogc.se_xml")],
            b"<ServiceExceptionReport/>".to_vec(),
        ),
    }
}

fn request(base: &str, mode: ViewMode) -> GetMapRequest {
    let config = config_for(base);
    let state = UiState::with_mode(mode, TimeStep::new(3).unwrap());
    let overlay = resolve(&state, &ResolverConfig::from(&config));
    GetMapRequest::from_overlay(&overlay, &config.wms_url(), config.viewport)
}

#[tokio::test]
async fn test_fetch_image() {
    let addr = serve(Router::new().route("/geoserver/anuga/wms", get(wms))).await;
    let config = config_for(&base_url(addr));

    let req = request(&base_url(addr), ViewMode::TimeSeries);
    let body = req.fetch(&http_client().unwrap(), &config.credentials).await.unwrap();
    assert_eq!(&body[..], PNG_MAGIC);
}

#[tokio::test]
async fn test_fetch_rejects_exception_report() {
    let addr = serve(Router::new().route("/geoserver/anuga/wms", get(wms))).await;
    let config = config_for(&base_url(addr));

    let req = request(&base_url(addr), ViewMode::MaxDepth);
    let err = req
        .fetch(&http_client().unwrap(), &config.credentials)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotAnImage { .. }), "{}", err);
}

#[tokio::test]
async fn test_fetch_reports_status() {
    let addr = serve(Router::new()).await;
    let config = config_for(&base_url(addr));

    let req = request(&base_url(addr), ViewMode::TimeSeries);
    let err = req
        .fetch(&http_client().unwrap(), &config.credentials)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }), "{}", err);
}
