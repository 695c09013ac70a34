//! Error types surfaced to the host of an editing session

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a session or an export attempt
///
/// Gesture-level problems (degenerate shapes, undo past the first state,
/// deleting without a selection) are not errors and never appear here.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to load base image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("base image {} has no pixels", path.display())]
    EmptyImage { path: PathBuf },

    #[error("failed to encode composite image: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to hand off the composite image: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("editing session has already ended")]
    SessionEnded,
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
