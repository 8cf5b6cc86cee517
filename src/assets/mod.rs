//! Asset hydration
//!
//! Resolves every image reference in a report (the four asset slots plus
//! all inline image components) into a self-contained `data:` URI before
//! any renderer runs. Each reference resolves independently and
//! fault-tolerantly: a failed fetch or read degrades to absence with a
//! logged warning and can never fail the request.

use std::path::{Path, PathBuf};

use base64::Engine;
use futures::future::join_all;
use reqwest::header;

use crate::report::{image_ref, ComponentKind, Report};

/// Content type lookup for local files; anything unrecognized embeds as a
/// generic binary payload.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Resolves image references against the network and the configured asset
/// root.
#[derive(Clone)]
pub struct AssetResolver {
    http: reqwest::Client,
    asset_root: PathBuf,
}

impl AssetResolver {
    /// The asset root is an explicit configuration value resolved once at
    /// process start; relative path references are read beneath it.
    pub fn new(http: reqwest::Client, asset_root: PathBuf) -> Self {
        Self { http, asset_root }
    }

    /// Convert one image reference to an embedded `data:` URI.
    ///
    /// Already-embedded references pass through unchanged. Every failure
    /// mode settles to `None` with a warning; this function never errors.
    pub async fn to_data_uri(&self, href: &str) -> Option<String> {
        if image_ref::is_embedded(href) {
            return Some(href.to_string());
        }

        if image_ref::is_remote(href) {
            return match self.fetch_remote(href).await {
                Ok(uri) => Some(uri),
                Err(e) => {
                    tracing::warn!("Asset fetch failed for {}: {}", href, e);
                    None
                }
            };
        }

        match self.read_local(href).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                tracing::warn!("Asset read failed for {}: {}", href, e);
                None
            }
        }
    }

    async fn fetch_remote(&self, href: &str) -> Result<String, String> {
        let response = self
            .http
            .get(href)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(encode_data_uri(&content_type, &bytes))
    }

    async fn read_local(&self, href: &str) -> Result<String, String> {
        let path = Path::new(href);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        };
        let bytes = tokio::fs::read(&absolute).await.map_err(|e| e.to_string())?;
        Ok(encode_data_uri(content_type_for(&absolute), &bytes))
    }
}

fn encode_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Where one resolved reference gets written back.
enum Target {
    Logo,
    HeaderImage,
    FooterImage,
    BackgroundImage,
    ComponentUrl(usize),
}

/// Hydrate every image reference in the report, in place.
///
/// All references resolve concurrently and settle independently; the
/// report is only touched once every job has finished, so renderers always
/// see a fully-settled tree. A slot whose reference fails becomes `None`;
/// an inline image component keeps its submitted URL, which the preview
/// path can still resolve in the browser.
pub async fn hydrate(resolver: &AssetResolver, report: &mut Report) {
    let mut jobs: Vec<(Target, String)> = Vec::new();

    let slots = [
        (Target::Logo, report.assets.logo.as_ref()),
        (Target::HeaderImage, report.assets.header_image.as_ref()),
        (Target::FooterImage, report.assets.footer_image.as_ref()),
        (Target::BackgroundImage, report.assets.background_image.as_ref()),
    ];
    for (target, slot) in slots {
        if let Some(href) = slot {
            jobs.push((target, href.clone()));
        }
    }
    for (index, component) in report.components.iter().enumerate() {
        if let ComponentKind::Image { props } = &component.kind {
            jobs.push((Target::ComponentUrl(index), props.url.clone()));
        }
    }

    let resolved = join_all(jobs.iter().map(|(_, href)| resolver.to_data_uri(href))).await;

    for ((target, _), value) in jobs.into_iter().zip(resolved) {
        match target {
            Target::Logo => report.assets.logo = value,
            Target::HeaderImage => report.assets.header_image = value,
            Target::FooterImage => report.assets.footer_image = value,
            Target::BackgroundImage => report.assets.background_image = value,
            Target::ComponentUrl(index) => {
                if let Some(uri) = value {
                    if let ComponentKind::Image { props } = &mut report.components[index].kind {
                        props.url = uri;
                    }
                }
            }
        }
    }
}
