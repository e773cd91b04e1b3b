// ABOUTME: Environment-derived configuration for the Offerkit server
// ABOUTME: Credentials are read once here and passed into constructors

use std::env;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "offerkit.db";
const DEFAULT_PORT: u16 = 4310;

/// Server configuration, assembled once at startup.
///
/// Components never read the environment themselves; everything they need is
/// handed to their constructors from this struct.
#[derive(Debug, Clone)]
pub struct Config {
    /// Required for proposal generation to function at all.
    pub primary_api_key: Option<String>,
    /// Optional; enables the quota fallback attempt.
    pub fallback_api_key: Option<String>,
    /// Optional; enables publishing document exports.
    pub blob_token: Option<String>,
    pub db_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            primary_api_key: non_empty_var("OPENAI_API_KEY"),
            fallback_api_key: non_empty_var("OPENAI_FALLBACK_KEY"),
            blob_token: non_empty_var("BLOB_READ_WRITE_TOKEN"),
            db_path: non_empty_var("OFFERKIT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            port: non_empty_var("OFFERKIT_PORT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
