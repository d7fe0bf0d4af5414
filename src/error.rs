//! Error types for commitlens modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from invoking the git binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable '{0}' not found. Install git or set COMMITLENS_GIT to its path")]
    NotInstalled(String),

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

impl GitError {
    /// Whether this failure means no git read can succeed at all.
    ///
    /// A non-zero exit affects only the one read that produced it; a missing
    /// binary or a spawn failure affects every read.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GitError::NonZeroExit { .. })
    }
}

/// Errors from change analysis and commit message generation.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error(transparent)]
    Git(#[from] GitError),
}
