/// Failures that prevent the map surface from initialising. The host is
/// expected to show these to the user instead of an empty map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// Cluster or style configuration is unusable.
    #[error("invalid map configuration: {0}")]
    InvalidConfig(String),

    /// The access token supplied through configuration is malformed.
    #[error("invalid access token: {0}")]
    InvalidCredential(String),
}

/// Failure to write to a [`crate::KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
