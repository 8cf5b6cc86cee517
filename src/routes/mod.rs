//! Route modules for Informe Server

pub mod extract;
pub mod render;
pub mod upload;
