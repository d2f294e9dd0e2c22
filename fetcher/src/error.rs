use payloads::{ClientError, requests::ValidationError};

/// Why a single fetch attempt failed. The display text is what ends up in
/// [`crate::FetchState::error`] and in notifications.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Authorization(#[from] AuthError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The external authorization flow failed (denied, refresh failed, ...).
    #[error("{0}")]
    Failed(String),
    #[error("Invalid accessToken")]
    InvalidAccessToken,
}
