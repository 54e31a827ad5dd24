//! Load errors surfaced to the user

use std::path::PathBuf;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a project could not be opened
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Nothing exists at the given path
    #[error("Path \"{}\" is not a valid GameMaker 2 project file.", .0.display())]
    NotFound(PathBuf),

    /// The path exists but is not a `.yyp` manifest
    #[error("Not a GameMaker Studio 2 Project file (.yyp)")]
    NotAProject(PathBuf),

    /// Anything that went wrong while reading the project
    #[error("Error reading GameMaker Studio 2 Project information. Not a valid project?")]
    Invalid(#[source] Cause),
}

impl LoadError {
    pub(crate) fn invalid(err: anyhow::Error) -> Self {
        Self::Invalid(err.into())
    }
}
