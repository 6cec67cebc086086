use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the loader and the interactive session. The tree itself cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("error opening file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid number: {input}")]
    InvalidNumber { input: String },
}

pub type Result<T> = std::result::Result<T, Error>;
