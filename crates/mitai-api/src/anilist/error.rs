use thiserror::Error;

/// Errors from the AniList catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("parse error: {0}")]
    Parse(String),
}
