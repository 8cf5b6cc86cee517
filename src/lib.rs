//! Informe Server Library
//!
//! Declarative report compositor: one validated document description in,
//! two reconciled presentations out (a single-flow HTML preview and a
//! Chromium-paginated PDF).
//!
//! # Modules
//!
//! - `report`: document model and payload validation
//! - `assets`: concurrent image-reference hydration
//! - `render`: design tokens, component renderers, compositor, overlays
//! - `engine`: headless paginated-rendering engine
//! - `extract`: PDF text scraping + LLM field extraction (separate path)
//! - `storage`: S3-compatible upload target

pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod render;
pub mod report;
pub mod routes;
pub mod state;
pub mod storage;
