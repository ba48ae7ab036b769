//! Error types for the drive_lister crate.

use thiserror::Error;

/// Errors that can occur when listing or fetching files from Google Drive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Required configuration is missing or blank.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A folder name matched nothing, or a file id is unknown to the caller's credential.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A folder name matched more than one folder.
    #[error("Multiple folders ({matches}) found with name: {name}")]
    AmbiguousName { name: String, matches: usize },

    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),
}

impl DriveError {
    /// Whether the error came from the network or authentication layer
    /// rather than from configuration or folder resolution.
    pub fn is_transport_fault(&self) -> bool {
        matches!(
            self,
            DriveError::HttpError(_)
                | DriveError::ApiError { .. }
                | DriveError::JwtError(_)
                | DriveError::TokenRefreshError(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DriveError::NotFound(_))
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
