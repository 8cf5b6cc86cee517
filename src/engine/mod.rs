//! Paginated rendering engine
//!
//! The core never paginates anything itself: it hands final HTML plus the
//! two standalone overlay fragments to a headless engine and gets a byte
//! stream back. The trait keeps the engine swappable and mockable; the
//! production implementation drives Chromium over the DevTools protocol.

mod chromium;

pub use chromium::ChromiumEngine;

use async_trait::async_trait;
use thiserror::Error;

use crate::report::{Orientation, PageSize};

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process could not be started
    #[error("Engine launch failed: {0}")]
    Launch(String),

    /// The engine errored mid-render
    #[error("Engine render failed: {0}")]
    Render(#[from] anyhow::Error),

    /// Staging the document for the engine failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Task(String),
}

/// Page geometry for one print run. Margins are always zero: the document's
/// own body-wrap padding reserves the overlay space.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    pub size: PageSize,
    pub orientation: Orientation,
}

impl PrintOptions {
    /// Paper dimensions in inches, portrait-major; the engine applies the
    /// landscape flag itself.
    pub fn paper_size(&self) -> (f64, f64) {
        match self.size {
            PageSize::A4 => (8.27, 11.69),
            PageSize::Letter => (8.5, 11.0),
        }
    }

    pub fn landscape(&self) -> bool {
        self.orientation == Orientation::Landscape
    }
}

/// Headless paginated-rendering engine
#[async_trait]
pub trait PdfEngine: Send + Sync {
    /// Render the document to PDF bytes. One blocking external call per
    /// request; every engine resource is released on all exit paths.
    async fn render(
        &self,
        html: String,
        header_html: String,
        footer_html: String,
        options: PrintOptions,
    ) -> Result<Vec<u8>, EngineError>;
}

/// Mock engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub response: Vec<u8>,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl PdfEngine for MockEngine {
    async fn render(
        &self,
        _html: String,
        _header_html: String,
        _footer_html: String,
        _options: PrintOptions,
    ) -> Result<Vec<u8>, EngineError> {
        if self.fail {
            Err(EngineError::Render(anyhow::anyhow!("mock failure")))
        } else {
            Ok(self.response.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes_match_the_engine_contract() {
        let a4 = PrintOptions {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
        };
        assert_eq!(a4.paper_size(), (8.27, 11.69));
        assert!(!a4.landscape());

        let letter = PrintOptions {
            size: PageSize::Letter,
            orientation: Orientation::Landscape,
        };
        assert_eq!(letter.paper_size(), (8.5, 11.0));
        assert!(letter.landscape());
    }

    #[tokio::test]
    async fn mock_engine_round_trips_through_the_trait_object() {
        let engine: std::sync::Arc<dyn PdfEngine> = std::sync::Arc::new(MockEngine {
            response: b"%PDF-mock".to_vec(),
            fail: false,
        });
        let options = PrintOptions {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
        };
        let bytes = engine
            .render(String::new(), String::new(), String::new(), options)
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-mock");
    }

    #[tokio::test]
    async fn mock_engine_surfaces_render_failures() {
        let engine = MockEngine {
            response: Vec::new(),
            fail: true,
        };
        let options = PrintOptions {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
        };
        let result = engine
            .render(String::new(), String::new(), String::new(), options)
            .await;
        assert!(matches!(result, Err(EngineError::Render(_))));
    }
}
