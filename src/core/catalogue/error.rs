use std::{io, path::PathBuf};

use thiserror::Error;

use crate::core::parsers::FormatError;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Existing catalogue content is corrupt. Never treated as empty, since
    /// rewriting the file would discard its translations.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("message id \"{id}\" is shared by two different messages: {first:?} and {second:?}")]
    IdCollision {
        id: String,
        first: String,
        second: String,
    },
}
