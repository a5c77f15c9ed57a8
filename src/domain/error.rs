use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Configuration storage error: {0}")]
    Storage(String),

    #[error("Username and password are not set. Please update your settings.")]
    CredentialsMissing,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Failed to download data: {0}")]
    Download(String),

    #[error("Failed to save file: {0}")]
    Persistence(String),
}
