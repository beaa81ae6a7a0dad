//! Error types for scene loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A scene asset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An asset file is missing or unreadable.
    #[error("failed to read scene asset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
