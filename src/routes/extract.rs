//! Document extraction routes
//!
//! - POST /extract-bill-data - Bill-of-Entry field extraction
//! - POST /extract-selective-fields - caller-chosen field extraction
//!
//! This is a separate failure domain from document rendering: upstream
//! errors (PDF scraping, the language model) are reported with the
//! upstream message in a route-local envelope.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extract::{extract_pdf_text, ExtractedDocument};
use crate::state::AppState;

/// Create the extract router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/extract-bill-data", post(extract_bill_data))
        .route("/extract-selective-fields", post(extract_selective_fields))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillExtractionRequest {
    /// Base64-encoded PDF bytes
    pub pdf_data: Option<String>,
    /// Per-field label overrides for the extraction prompt
    #[serde(default)]
    pub field_labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectiveExtractionRequest {
    pub pdf_data: Option<String>,
    pub fields_to_extract: Vec<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BillExtractionResponse {
    success: bool,
    extracted_data: Map<String, Value>,
    metadata: BillMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BillMetadata {
    pages: usize,
    text_length: usize,
    extracted_fields: usize,
    used_custom_labels: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectiveExtractionResponse {
    success: bool,
    extracted_data: Map<String, Value>,
    fields_found: usize,
    fields_requested: usize,
    metadata: SelectiveMetadata,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectiveMetadata {
    pages: usize,
    text_length: usize,
    document_type: Option<String>,
}

/// Route-local failure envelope carrying the upstream message
#[derive(Serialize)]
struct ExtractFailure {
    success: bool,
    message: String,
}

type Failure = (StatusCode, Json<ExtractFailure>);

fn failure(status: StatusCode, message: impl Into<String>) -> Failure {
    (
        status,
        Json(ExtractFailure {
            success: false,
            message: message.into(),
        }),
    )
}

/// Decode the uploaded PDF and scrape its text off the async runtime.
async fn scrape_pdf(pdf_data: Option<String>) -> Result<ExtractedDocument, Failure> {
    let encoded = pdf_data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Missing pdfData parameter"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "pdfData is not valid base64"))?;
    tracing::debug!("Extraction request with {} PDF bytes", bytes.len());

    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// POST /extract-bill-data
async fn extract_bill_data(
    State(state): State<AppState>,
    Json(request): Json<BillExtractionRequest>,
) -> Result<Json<BillExtractionResponse>, Failure> {
    let used_custom_labels = !request.field_labels.is_empty();
    let document = scrape_pdf(request.pdf_data).await?;

    let extracted = state
        .extractor()
        .extract_bill_fields(&document.text, &request.field_labels)
        .await
        .map_err(|e| failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!("Extracted {} bill fields", extracted.len());
    Ok(Json(BillExtractionResponse {
        success: true,
        metadata: BillMetadata {
            pages: document.pages,
            text_length: document.text.len(),
            extracted_fields: extracted.len(),
            used_custom_labels,
        },
        extracted_data: extracted,
    }))
}

/// POST /extract-selective-fields
async fn extract_selective_fields(
    State(state): State<AppState>,
    Json(request): Json<SelectiveExtractionRequest>,
) -> Result<Json<SelectiveExtractionResponse>, Failure> {
    if request.fields_to_extract.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "fieldsToExtract must be a non-empty array",
        ));
    }

    let document = scrape_pdf(request.pdf_data).await?;

    let extracted = state
        .extractor()
        .extract_selective_fields(
            &document.text,
            &request.fields_to_extract,
            request.document_type.as_deref(),
        )
        .await
        .map_err(|e| failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let fields_found = extracted.len();
    let fields_requested = request.fields_to_extract.len();
    tracing::info!("Extracted {}/{} requested fields", fields_found, fields_requested);

    Ok(Json(SelectiveExtractionResponse {
        success: true,
        extracted_data: extracted,
        fields_found,
        fields_requested,
        metadata: SelectiveMetadata {
            pages: document.pages,
            text_length: document.text.len(),
            document_type: request.document_type,
        },
        message: format!(
            "Successfully extracted {} out of {} requested fields",
            fields_found, fields_requested
        ),
    }))
}
