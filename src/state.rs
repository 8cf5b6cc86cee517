//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::assets::AssetResolver;
use crate::config::Config;
use crate::engine::{ChromiumEngine, PdfEngine};
use crate::error::StorageError;
use crate::extract::FieldExtractor;
use crate::storage::S3Client;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize storage client: {0}")]
    StorageInit(#[from] StorageError),

    #[error("Failed to build HTTP client: {0}")]
    HttpInit(#[from] reqwest::Error),
}

/// Shared application state
///
/// Everything in here is immutable per-process; each request owns its own
/// report tree, so no cross-request locking is needed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    assets: AssetResolver,
    storage: S3Client,
    extractor: FieldExtractor,
    engine: Arc<dyn PdfEngine>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: Config) -> Result<Self, StateError> {
        // One shared client bounds every outbound fetch; hydration has no
        // timeout semantics of its own beyond the transport's.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let assets = AssetResolver::new(http.clone(), config.assets.root.clone());
        let storage = S3Client::new(&config.storage).await?;
        let extractor = FieldExtractor::new(
            http,
            config.extractor.api_key.clone(),
            config.extractor.model.clone(),
        );
        let engine: Arc<dyn PdfEngine> =
            Arc::new(ChromiumEngine::new(config.engine.chrome_path.clone()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                assets,
                storage,
                extractor,
                engine,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the asset resolver
    pub fn assets(&self) -> &AssetResolver {
        &self.inner.assets
    }

    /// Get the storage client
    pub fn storage(&self) -> &S3Client {
        &self.inner.storage
    }

    /// Get the field extractor
    pub fn extractor(&self) -> &FieldExtractor {
        &self.inner.extractor
    }

    /// Get the rendering engine
    pub fn engine(&self) -> &Arc<dyn PdfEngine> {
        &self.inner.engine
    }
}
