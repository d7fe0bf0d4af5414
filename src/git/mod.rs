//! Git access for change analysis.

pub mod executor;

#[cfg(test)]
pub use executor::MockGitExecutor;
pub use executor::{
    DiffFormat, DiffSide, GIT_BIN_ENV_VAR, GitExecutor, SystemGit, is_git_repository,
};
