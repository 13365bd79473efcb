//! HTTP request handlers for the triage service.
//!
//! Implements email processing, duplicate detection and health check
//! endpoints using axum.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use mailsift_domain::{EmailReport, LlmProvider};
use mailsift_triage::{Triage, TriageError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Multipart field carrying the `.eml` upload
pub const EMAIL_FILE_FIELD: &str = "email_file";

/// Shared application state
pub struct AppState<L> {
    /// Triage pipeline
    pub triage: Arc<Triage<L>>,
    /// Backend name reported by `/health`
    pub provider: String,
}

impl<L> AppState<L> {
    /// Wrap a pipeline for sharing across requests
    pub fn new(triage: Triage<L>, provider: impl Into<String>) -> Self {
        Self {
            triage: Arc::new(triage),
            provider: provider.into(),
        }
    }
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            triage: Arc::clone(&self.triage),
            provider: self.provider.clone(),
        }
    }
}

/// Triage result for one uploaded email
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessEmailResponse {
    /// Rendered `From` header
    pub sender: Option<String>,
    /// `Subject` header
    pub subject: Option<String>,
    /// Raw classification text
    pub classification: String,
    /// Configured request type named by the classification
    pub request_type: Option<String>,
    /// Primary intent, if detected
    pub primary_intent: Option<String>,
    /// Extracted fields, if available
    pub extracted_data: Option<String>,
    /// Body plus attachment text
    pub email_text: String,
}

impl From<EmailReport> for ProcessEmailResponse {
    fn from(report: EmailReport) -> Self {
        Self {
            sender: report.sender,
            subject: report.subject,
            classification: report.classification,
            request_type: report.request_type,
            primary_intent: report.primary_intent,
            extracted_data: report.extracted_data,
            email_text: report.email_text,
        }
    }
}

/// Duplicate detection request
#[derive(Debug, Deserialize)]
pub struct DetectDuplicatesRequest {
    /// Texts to compare
    #[serde(default)]
    pub email_texts: Option<Vec<String>>,
}

/// One flagged pair
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicatePair {
    /// Index of the earlier text
    pub email1_index: usize,
    /// Index of the later text
    pub email2_index: usize,
    /// Why the pair was flagged
    pub reason: String,
}

/// Duplicate detection response
#[derive(Debug, Serialize, Deserialize)]
pub struct DetectDuplicatesResponse {
    /// Whether any pair was flagged
    pub duplicate_emails_detected: bool,
    /// Flagged pairs in row-major order
    pub duplicates: Vec<DuplicatePair>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// LLM backend name
    pub provider: String,
    /// LLM model name
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Client sent an unusable request
    BadRequest(String),
    /// Upload could not be read
    Upload(MultipartError),
    /// Triage of an uploaded email failed
    Processing(TriageError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upload(e) => (e.status(), e.body_text()),
            AppError::Processing(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Email processing failed: {}", e),
            ),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<TriageError> for AppError {
    fn from(e: TriageError) -> Self {
        AppError::Processing(e)
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Upload(e)
    }
}

/// POST /process_email - Triage an uploaded `.eml` file
///
/// The upload and its attachments live in a temporary directory removed
/// when the request finishes.
async fn process_email<L>(
    State(state): State<AppState<L>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessEmailResponse>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display + Send,
{
    let no_file = || AppError::BadRequest("No email file provided".to_string());
    let mut multipart = multipart.map_err(|_| no_file())?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(EMAIL_FILE_FIELD) {
            upload = Some(field.bytes().await?);
            break;
        }
    }
    let upload = upload.ok_or_else(no_file)?;
    info!("Received {} byte email upload", upload.len());

    let workdir = tempfile::tempdir()
        .map_err(|e| AppError::InternalError(format!("Failed to create temp dir: {}", e)))?;
    let email_path = workdir.path().join("upload.eml");
    tokio::fs::write(&email_path, &upload)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {}", e)))?;

    let report = state
        .triage
        .process_email(&email_path, workdir.path().join("attachments"))
        .await
        .inspect_err(|e| error!("Error processing email: {}", e))?;

    Ok(Json(report.into()))
}

/// POST /detect_duplicates - Flag near-duplicate texts
///
/// Always runs at the default threshold; `[triage] duplicate_threshold`
/// only applies to batches.
async fn detect_duplicates(
    body: Result<Json<DetectDuplicatesRequest>, JsonRejection>,
) -> Result<Json<DetectDuplicatesResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let texts = request
        .email_texts
        .filter(|texts| !texts.is_empty())
        .ok_or_else(|| AppError::BadRequest("No email texts provided".to_string()))?;

    let pairs = tokio::task::spawn_blocking(move || mailsift_dedup::detect_duplicates(&texts))
        .await
        .map_err(|e| AppError::InternalError(format!("Error detecting duplicates: {}", e)))?;

    let duplicates: Vec<DuplicatePair> = pairs
        .into_iter()
        .map(|pair| DuplicatePair {
            email1_index: pair.first,
            email2_index: pair.second,
            reason: pair.reason,
        })
        .collect();

    Ok(Json(DetectDuplicatesResponse {
        duplicate_emails_detected: !duplicates.is_empty(),
        duplicates,
    }))
}

/// GET /health - Liveness and backend info
async fn health_check<L>(State(state): State<AppState<L>>) -> Json<HealthCheckResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        provider: state.provider.clone(),
        model: state.triage.model_name().to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>, max_upload_bytes: usize) -> AxumRouter
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display + Send,
{
    AxumRouter::new()
        .route("/process_email", post(process_email::<L>))
        .route("/detect_duplicates", post(detect_duplicates))
        .route("/health", get(health_check::<L>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
