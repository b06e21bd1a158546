use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{FessMcpError, Result};

/// Environment variable overriding the content truncation limit.
pub const CONTENT_MAX_LENGTH_ENV: &str = "FESS_MCP_CONTENT_MAX_LENGTH";

/// Configuration for the MCP server.
///
/// Controls paging defaults for search invocations, content truncation,
/// and the location of the backing Fess instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// Base URL of the Fess server exposing the JSON search API.
    pub base_url: String,
    /// Default start position when a request supplies none.
    pub default_start: u64,
    /// Default page size when a request supplies none.
    pub default_page_size: u32,
    /// Maximum page size; out-of-range requests are clamped to this.
    pub max_page_size: u32,
    /// Maximum character length of document content before truncation.
    pub content_max_length: usize,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            default_start: 0,
            default_page_size: 20,
            max_page_size: 100,
            content_max_length: 10_000,
        }
    }
}

/// Loads the configuration from a JSON file.
///
/// If the file does not exist, returns the default configuration. The
/// content truncation limit can be overridden through the
/// `FESS_MCP_CONTENT_MAX_LENGTH` environment variable in either case.
pub fn load_config(config_path: &Path) -> Result<McpConfig> {
    let mut config = if config_path.exists() {
        let contents = fs::read_to_string(config_path).map_err(|e| FessMcpError::Config {
            message: format!(
                "failed to read config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;
        serde_json::from_str(&contents).map_err(|e| FessMcpError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?
    } else {
        McpConfig::default()
    };

    if let Ok(value) = std::env::var(CONTENT_MAX_LENGTH_ENV) {
        match value.parse::<usize>() {
            Ok(max) => config.content_max_length = max,
            Err(_) => {
                tracing::warn!(value = %value, "ignoring unparsable {}", CONTENT_MAX_LENGTH_ENV);
            }
        }
    }

    Ok(config)
}
