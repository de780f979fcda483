use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("content root {} does not exist", .0.to_string_lossy())]
    MissingRoot(PathBuf),

    #[error("mix {0} not found")]
    MixNotFound(String),

    #[error(
        "slug '{slug}' is used by both {} and {}",
        .first.to_string_lossy(),
        .second.to_string_lossy()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
