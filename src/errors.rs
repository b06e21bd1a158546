use thiserror::Error;

/// Errors that can occur outside the JSON-RPC protocol layer.
#[derive(Error, Debug)]
pub enum FessMcpError {
    #[error("search error: {message} (query: {query})")]
    Search { message: String, query: String },

    #[error("stats error: {message}")]
    Stats { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `FessMcpError`.
pub type Result<T> = std::result::Result<T, FessMcpError>;
