//! Router-level tests; none of these reach a remote service

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use geo_data_master::api::{create_router, AppState};
use geo_data_master::Config;

fn app() -> Router {
    create_router(AppState::new(&Config::default()).unwrap())
}

async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_aoi_rectangle() {
    let (status, _, body) = get("/api/aoi?latitude=27.9881&longitude=86.9250&name=Everest").await;
    assert_eq!(status, StatusCode::OK);

    let value = json(&body);
    assert_eq!(value["label"], "10x10km");
    assert_eq!(value["shape"], "rectangle");
    assert_eq!(value["polygon"].as_array().unwrap().len(), 5);
    assert_eq!(value["geojson_file_name"], "Everest_10x10km_WGS84.geojson");
    assert_eq!(value["crosses_antimeridian"], false);

    let bbox: Vec<f64> = serde_json::from_value(value["bbox"].clone()).unwrap();
    assert!(bbox[0] < bbox[2] && bbox[1] < bbox[3]);
}

#[tokio::test]
async fn test_aoi_circle() {
    let (status, _, body) =
        get("/api/aoi?latitude=34.4871&longitude=110.0847&shape=circle&radius_km=5").await;
    assert_eq!(status, StatusCode::OK);

    let value = json(&body);
    assert_eq!(value["label"], "R5km");
    assert_eq!(value["polygon"].as_array().unwrap().len(), 73);
}

#[tokio::test]
async fn test_aoi_validation() {
    let (status, _, body) = get("/api/aoi?latitude=91&longitude=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("latitude"));

    let (status, _, _) = get("/api/aoi?latitude=0&longitude=0&width_km=-3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get("/api/aoi?latitude=0&longitude=0&shape=hexagon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geojson_download() {
    let (status, headers, body) =
        get("/api/aoi/geojson?latitude=46.5&longitude=7.9&width_km=20&height_km=5&name=Jungfrau").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/geo+json");

    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("Jungfrau_20x5km_WGS84.geojson"));

    let value = json(&body);
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][0]["properties"]["desc"], "20x5km");
}

#[tokio::test]
async fn test_datasets() {
    let (status, _, body) = get("/api/datasets").await;
    assert_eq!(status, StatusCode::OK);

    let value = json(&body);
    let codes: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["code"].as_str())
        .collect();
    assert_eq!(codes.len(), 9);
    assert_eq!(codes[0], "COP30");
    assert!(codes.contains(&"USGS1m"));
}

#[tokio::test]
async fn test_health_reports_cache() {
    let (status, _, body) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);

    let value = json(&body);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["api_key_configured"], false);
    assert_eq!(value["dem_cache"]["entry_count"], 0);
    assert_eq!(value["dem_cache"]["total_bytes"], 0);
    assert_eq!(value["dem_cache"]["max_entries"], 32);
}

#[tokio::test]
async fn test_dem_requires_key() {
    let (status, _, body) = get("/api/dem?latitude=27.9881&longitude=86.9250").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json(&body)["remedy"].is_string());

    let (status, _, _) = get("/api/dem?latitude=27.9881&longitude=86.9250&dataset=GTOPO").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_upload() {
    let boundary = "XBOUNDARYX";
    let csv = "latitude,longitude,shape,radius_km,name\n27.9881,86.9250,circle,5,Everest\n100,0,,,\n";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"csv\"; filename=\"aois.csv\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = csv
    );

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/batch")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = json(&bytes);
    assert_eq!(value["total_rows"], 2);
    assert_eq!(value["successful"], 1);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["failures"][0]["row"], 2);
    assert_eq!(
        value["feature_collection"]["features"][0]["properties"]["name"],
        "Everest"
    );
}

#[tokio::test]
async fn test_batch_without_csv_field() {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/batch")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
