//! Rendering routes
//!
//! - POST /render - single-flow HTML preview
//! - POST /render.pdf - paginated PDF via the external engine
//!
//! Both validate, hydrate, and compose from the same code; the PDF path
//! additionally hands the overlay fragments and page geometry to the
//! engine and derives a content-disposition filename.

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::assets;
use crate::engine::PrintOptions;
use crate::error::{AppError, Result};
use crate::render::compositor::{html_shell, render_body, render_head, PRINT_HIDE_OVERLAYS_CSS};
use crate::render::overlay;
use crate::render::tokens::DesignTokens;
use crate::report::{validate, Report};
use crate::state::AppState;

/// Inbound document size cap
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Create the render router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/render", post(render_preview))
        .route("/render.pdf", post(render_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Validate and hydrate one inbound document.
async fn prepare(state: &AppState, payload: Value) -> Result<Report> {
    let mut report = validate::parse_report(payload).map_err(AppError::Validation)?;
    assets::hydrate(state.assets(), &mut report).await;
    Ok(report)
}

/// POST /render
async fn render_preview(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response> {
    let report = prepare(&state, payload).await?;
    let tokens = DesignTokens::resolve(&report);
    let html = html_shell(&render_head(&tokens), &render_body(&report, &tokens));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(html))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /render.pdf
async fn render_pdf(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response> {
    let report = prepare(&state, payload).await?;
    let tokens = DesignTokens::resolve(&report);

    // The engine repeats its own overlays on every page, so the in-flow
    // fixed header/footer are hidden for print.
    let head = format!("{}\n{}", render_head(&tokens), PRINT_HIDE_OVERLAYS_CSS);
    let html = html_shell(&head, &render_body(&report, &tokens));
    let header_html = overlay::header_template(&report, &tokens);
    let footer_html = overlay::footer_template(&report, &tokens);
    let options = PrintOptions {
        size: report.configs.page.size,
        orientation: report.configs.page.orientation,
    };

    let pdf = state
        .engine()
        .render(html, header_html, footer_html, options)
        .await?;

    let filename = format!("{}.pdf", overlay::pdf_filename(&report.report_name));
    tracing::info!("Rendered {} ({} bytes)", filename, pdf.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .header(header::CONTENT_LENGTH, pdf.len())
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.to_string()))
}
