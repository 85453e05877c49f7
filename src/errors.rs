use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid categories selected")]
    InvalidCategories,

    #[error("Invalid query parameter: {0}")]
    InvalidParameter(String),

    #[error("Restaurant not found: {0}")]
    NoSuchRestaurant(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl DirectoryError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCategories | Self::InvalidParameter(_) | Self::NoSuchRestaurant(_)
        )
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<toml::de::Error> for DirectoryError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for DirectoryError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::StoreError(format!("store task failed: {e}"))
    }
}
