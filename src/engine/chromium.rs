//! Chromium engine implementation
//!
//! Stages the composed document in a temp file, points a headless Chromium
//! at it over the DevTools protocol, and prints with the overlay templates
//! installed. The whole interaction is synchronous, so it runs inside
//! `spawn_blocking`; the browser process and the staged file are both
//! dropped on every exit path, including failures.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};

use super::{EngineError, PdfEngine, PrintOptions};

/// Chromium-backed paginated renderer
pub struct ChromiumEngine {
    chrome_path: Option<PathBuf>,
}

impl ChromiumEngine {
    /// `chrome_path` overrides binary discovery; `None` lets the launcher
    /// find a system Chrome/Chromium.
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    async fn render(
        &self,
        html: String,
        header_html: String,
        footer_html: String,
        options: PrintOptions,
    ) -> Result<Vec<u8>, EngineError> {
        let chrome_path = self.chrome_path.clone();
        tokio::task::spawn_blocking(move || {
            print_with_chromium(chrome_path, html, header_html, footer_html, options)
        })
        .await
        .map_err(|e| EngineError::Task(e.to_string()))?
    }
}

fn print_with_chromium(
    chrome_path: Option<PathBuf>,
    html: String,
    header_html: String,
    footer_html: String,
    options: PrintOptions,
) -> Result<Vec<u8>, EngineError> {
    let mut staged = tempfile::Builder::new()
        .prefix("informe-")
        .suffix(".html")
        .tempfile()?;
    staged.write_all(html.as_bytes())?;
    staged.flush()?;
    let url = format!("file://{}", staged.path().display());

    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .window_size(Some((1280, 720)));
    if let Some(path) = chrome_path {
        builder.path(Some(path));
    }
    let launch_options = builder
        .build()
        .map_err(|e| EngineError::Launch(e.to_string()))?;

    let browser = Browser::new(launch_options).map_err(|e| EngineError::Launch(e.to_string()))?;
    let tab = browser.new_tab()?;

    tab.navigate_to(&url)?;
    tab.wait_until_navigated()?;

    let (paper_width, paper_height) = options.paper_size();
    let pdf = tab.print_to_pdf(Some(PrintToPdfOptions {
        landscape: Some(options.landscape()),
        display_header_footer: Some(true),
        print_background: Some(true),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        header_template: Some(header_html),
        footer_template: Some(footer_html),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }))?;

    tracing::debug!("Engine produced {} PDF bytes", pdf.len());
    Ok(pdf)
}
