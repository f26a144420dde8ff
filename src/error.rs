use thiserror::Error;

/// Failure to load settings or a level pack
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level pack contains no levels")]
    EmptyPack,
    #[error("level {index} has no rows")]
    EmptyLevel { index: usize },
}
