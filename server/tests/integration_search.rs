use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use temubalik_server::build_app;
use tower::ServiceExt;

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn write_corpus(dir: &std::path::Path) {
    fs::write(dir.join("satu.txt"), "Kucing makan ikan.").unwrap();
    fs::write(dir.join("dua.txt"), "Anjing menggonggong keras!").unwrap();
    fs::write(dir.join("tiga.txt"), "Kucing dan anjing bermain.").unwrap();
}

#[tokio::test]
async fn upload_then_search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app();

    let (status, body) = post(
        app.clone(),
        "/api/upload",
        json!({ "folderPath": dir.path().to_string_lossy() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDocuments"], 3);

    let (status, body) = post(
        app.clone(),
        "/api/search",
        json!({ "query": "kucing makan", "topK": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queryProcessed"], "kucing makan");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["documentId"], "satu.txt");
    assert_eq!(results[0]["rank"], 1);
    let last = &results[2];
    assert_eq!(last["documentId"], "dua.txt");
    assert_eq!(last["similarity"], 0.0);

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["indexed"], true);
    assert_eq!(body["totalDocuments"], 3);
}

#[tokio::test]
async fn search_before_upload_is_rejected() {
    let app = build_app();
    let (status, _) = post(app, "/api/search", json!({ "query": "kucing" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app();
    post(
        app.clone(),
        "/api/upload",
        json!({ "folderPath": dir.path().to_string_lossy() }),
    )
    .await;
    let (status, _) = post(app, "/api/search", json!({ "query": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_missing_folder_is_not_found() {
    let app = build_app();
    let (status, _) = post(
        app,
        "/api/upload",
        json!({ "folderPath": "/definitely/not/here" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preprocess_exposes_every_stage() {
    let app = build_app();
    let (status, body) = post(
        app,
        "/api/preprocess",
        json!({ "text": "Kucing-kucing itu makan ikan." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "original",
        "caseFolding",
        "tokenizing",
        "filtering",
        "stopwordRemoval",
        "stemming",
    ] {
        assert!(body.get(key).is_some(), "missing stage {key}");
    }
    assert_eq!(body["stemming"], "kucing kucing makan ikan");
}

#[tokio::test]
async fn document_detail_and_matrix_follow_the_index() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app();
    post(
        app.clone(),
        "/api/upload",
        json!({ "folderPath": dir.path().to_string_lossy() }),
    )
    .await;

    let (status, body) = get(app.clone(), "/api/document/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documentId"], "dua.txt");
    assert!(body["preprocessingSteps"]["stemming"].is_string());

    let (status, _) = get(app.clone(), "/api/document/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(app, "/api/matrix").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numDocuments"], 3);
    let docs = body["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 3);
    assert!(!docs[0]["topTerms"].as_array().unwrap().is_empty());
}
