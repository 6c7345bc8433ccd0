//! HTTP transport over the retrieval engine. Pure plumbing: every route
//! delegates to `temubalik_core::SearchEngine` and shapes the response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use temubalik_core::{
    normalize_stages, EngineError, IndexError, PipelineStages, SearchEngine, TermWeight,
};
use temubalik_loader::load_directory;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const PREVIEW_CHARS: usize = 200;
const DETAIL_STAGE_CHARS: usize = 500;
const MATRIX_TERM_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

pub fn build_app() -> Router {
    build_app_with_engine(Arc::new(SearchEngine::new()))
}

pub fn build_app_with_engine(engine: Arc<SearchEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(health_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/search", post(search_handler))
        .route("/api/documents", get(documents_handler))
        .route("/api/document/:doc_id", get(document_handler))
        .route("/api/preprocess", post(preprocess_handler))
        .route("/api/matrix", get(matrix_handler))
        .with_state(AppState { engine })
        .layer(cors)
}

// --- request/response shapes ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub folder_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    10
}

#[derive(Deserialize)]
pub struct PreprocessRequest {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub indexed: bool,
    pub total_documents: usize,
    pub vocabulary_size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: usize,
    pub document_id: String,
    pub original_text_preview: String,
    pub processed_text_preview: String,
    pub word_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: String,
    pub total_documents: usize,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEntry {
    pub rank: usize,
    pub doc_index: usize,
    pub document_id: String,
    pub similarity: f32,
    pub original_text: String,
    pub processed_text: String,
    pub word_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub status: &'static str,
    pub query_original: String,
    pub query_processed: String,
    pub query_tokens: Vec<String>,
    pub total_results: usize,
    pub showing: usize,
    pub results: Vec<SearchResultEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResponse {
    pub status: &'static str,
    pub total: usize,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub id: usize,
    pub document_id: String,
    pub original_text: String,
    pub processed_text: String,
    pub word_count: usize,
    pub preprocessing_steps: PipelineStages,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMatrixEntry {
    pub doc_index: usize,
    pub document_id: String,
    pub top_terms: Vec<TermWeight>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub status: &'static str,
    pub num_documents: usize,
    pub num_terms: usize,
    pub documents: Vec<DocumentMatrixEntry>,
}

// --- handlers ---

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "active",
        indexed: state.engine.is_indexed(),
        total_documents: state.engine.document_count(),
        vocabulary_size: state.engine.vocabulary_size(),
    })
}

async fn upload_handler(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let documents = load_directory(std::path::Path::new(&req.folder_path))
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    if documents.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "no readable text documents found in folder".into(),
        ));
    }
    let total = state.engine.build_index(documents).map_err(map_engine_error)?;
    let snapshot = state
        .engine
        .snapshot()
        .ok_or_else(|| internal("generation missing right after build"))?;
    Ok(Json(UploadResponse {
        status: "success",
        message: format!("indexed {total} documents"),
        total_documents: total,
        documents: summaries(&snapshot),
    }))
}

async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    if req.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must not be blank".into()));
    }
    // One generation snapshot per request: the ranking and the document
    // details below are guaranteed to come from the same build.
    let snapshot = state
        .engine
        .snapshot()
        .ok_or_else(|| map_engine_error(EngineError::NotIndexed))?;
    let outcome = snapshot
        .search(&req.query, req.top_k)
        .map_err(|e| map_engine_error(e.into()))?;
    let results = outcome
        .hits
        .iter()
        .map(|hit| {
            let doc = &snapshot.documents()[hit.doc_index];
            SearchResultEntry {
                rank: hit.rank,
                doc_index: hit.doc_index,
                document_id: hit.document_id.clone(),
                similarity: hit.score,
                original_text: preview(&doc.text, PREVIEW_CHARS),
                processed_text: preview(&doc.normalized_text, PREVIEW_CHARS),
                word_count: doc.token_count,
            }
        })
        .collect();
    Ok(Json(SearchResponse {
        status: "success",
        query_original: req.query,
        query_processed: outcome.query.text,
        query_tokens: outcome.query.tokens,
        total_results: outcome.total,
        showing: outcome.hits.len(),
        results,
    }))
}

async fn documents_handler(State(state): State<AppState>) -> Json<DocumentsResponse> {
    match state.engine.snapshot() {
        Some(snapshot) => Json(DocumentsResponse {
            status: "success",
            total: snapshot.documents().len(),
            documents: summaries(&snapshot),
        }),
        None => Json(DocumentsResponse {
            status: "success",
            total: 0,
            documents: Vec::new(),
        }),
    }
}

async fn document_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<usize>,
) -> Result<Json<DocumentDetail>, (StatusCode, String)> {
    let snapshot = state
        .engine
        .snapshot()
        .ok_or((StatusCode::NOT_FOUND, "no documents indexed".to_string()))?;
    let doc = snapshot
        .document(doc_id)
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    let stage_input: String = doc.text.chars().take(DETAIL_STAGE_CHARS).collect();
    Ok(Json(DocumentDetail {
        id: doc_id,
        document_id: doc.id.clone(),
        original_text: doc.text.clone(),
        processed_text: doc.normalized_text.clone(),
        word_count: doc.token_count,
        preprocessing_steps: normalize_stages(&stage_input),
    }))
}

async fn preprocess_handler(Json(req): Json<PreprocessRequest>) -> Json<PipelineStages> {
    Json(normalize_stages(&req.text))
}

async fn matrix_handler(
    State(state): State<AppState>,
) -> Result<Json<MatrixResponse>, (StatusCode, String)> {
    let snapshot = state.engine.snapshot().ok_or((
        StatusCode::BAD_REQUEST,
        "no documents have been indexed yet".to_string(),
    ))?;
    let mut documents = Vec::with_capacity(snapshot.documents().len());
    for (doc_index, doc) in snapshot.documents().iter().enumerate() {
        let top_terms = snapshot
            .top_terms(doc_index, MATRIX_TERM_LIMIT)
            .map_err(|e| internal(&e.to_string()))?;
        documents.push(DocumentMatrixEntry {
            doc_index,
            document_id: doc.id.clone(),
            top_terms,
        });
    }
    Ok(Json(MatrixResponse {
        status: "success",
        num_documents: snapshot.index().num_docs(),
        num_terms: snapshot.index().vocabulary_size(),
        documents,
    }))
}

// --- helpers ---

fn summaries(snapshot: &temubalik_core::Generation) -> Vec<DocumentSummary> {
    snapshot
        .documents()
        .iter()
        .enumerate()
        .map(|(id, doc)| DocumentSummary {
            id,
            document_id: doc.id.clone(),
            original_text_preview: preview(&doc.text, PREVIEW_CHARS),
            processed_text_preview: preview(&doc.normalized_text, PREVIEW_CHARS),
            word_count: doc.token_count,
        })
        .collect()
}

fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(limit).collect();
        s.push_str("...");
        s
    }
}

fn map_engine_error(err: EngineError) -> (StatusCode, String) {
    match err {
        EngineError::NotIndexed => (
            StatusCode::BAD_REQUEST,
            "no documents have been indexed yet; upload a folder first".into(),
        ),
        EngineError::Index(IndexError::EmptyCorpus) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn internal(detail: &str) -> (StatusCode, String) {
    tracing::error!(detail, "internal invariant violation");
    (StatusCode::INTERNAL_SERVER_ERROR, detail.to_string())
}
