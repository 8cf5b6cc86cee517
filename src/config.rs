//! Configuration management for Informe Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetConfig,
    pub storage: StorageConfig,
    pub extractor: ExtractorConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Asset resolution configuration. The root is injected here once at
/// process start; nothing ever derives it from file layout.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Custom endpoint for MinIO/R2; unset means AWS proper.
    pub endpoint: Option<String>,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Chromium binary override; unset lets the launcher discover one.
    pub chrome_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            assets: AssetConfig {
                root: PathBuf::from("."),
            },
            storage: StorageConfig {
                endpoint: None,
                bucket: "informes".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                region: Some("us-east-1".to_string()),
            },
            extractor: ExtractorConfig {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
            },
            engine: EngineConfig { chrome_path: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .or_else(|_| env::var("PORT"))
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
            },
            assets: AssetConfig {
                root: env::var("ASSET_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
            },
            storage: StorageConfig {
                endpoint: env::var("S3_ENDPOINT").ok(),
                bucket: env::var("S3_BUCKET")?,
                access_key: env::var("S3_ACCESS_KEY")?,
                secret_key: env::var("S3_SECRET_KEY")?,
                region: env::var("S3_REGION").ok(),
            },
            extractor: ExtractorConfig {
                api_key: env::var("GEMINI_API_KEY").ok(),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            },
            engine: EngineConfig {
                chrome_path: env::var("CHROME_PATH").map(PathBuf::from).ok(),
            },
        })
    }
}
