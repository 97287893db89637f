use kitinit_release::FetchError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a wizard request could not be answered.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Missing or malformed input in the URL or the submitted form.
    #[error("{0}")]
    BadRequest(String),

    #[error("no page at {0}")]
    NotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
