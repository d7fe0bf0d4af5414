//! Read-only git invocations for change analysis.
//!
//! All reads use `std::process::Command` to shell out to the system `git`
//! binary, so the user's git config (rename detection, pathspecs, attributes)
//! applies unchanged.

use std::env;
use std::fmt;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::GitError;

/// Default git executable name.
const DEFAULT_GIT_BIN: &str = "git";

/// Environment variable to override the git executable.
pub const GIT_BIN_ENV_VAR: &str = "COMMITLENS_GIT";

/// Which side of the index a diff is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// Index vs HEAD (`git diff --cached`).
    Staged,
    /// Working tree vs index (`git diff`).
    Unstaged,
}

impl fmt::Display for DiffSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffSide::Staged => write!(f, "staged"),
            DiffSide::Unstaged => write!(f, "unstaged"),
        }
    }
}

/// Output shape requested from `git diff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffFormat {
    NameStatus,
    Numstat,
}

impl DiffFormat {
    fn flag(self) -> &'static str {
        match self {
            DiffFormat::NameStatus => "--name-status",
            DiffFormat::Numstat => "--numstat",
        }
    }
}

/// Trait for reading diff output from a repository.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GitExecutor {
    /// Return the raw stdout of one diff read.
    fn diff(&self, repo: &Path, side: DiffSide, format: DiffFormat) -> Result<String, GitError>;
}

/// Executor that runs the real git binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
}

impl SystemGit {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build an executor honoring the `COMMITLENS_GIT` override.
    ///
    /// Logs a warning if the variable is set but empty.
    pub fn from_env() -> Self {
        match env::var(GIT_BIN_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => Self::new(v.trim()),
            Ok(_) => {
                warn!(
                    "Empty {} value, using default '{}'",
                    GIT_BIN_ENV_VAR, DEFAULT_GIT_BIN
                );
                Self::new(DEFAULT_GIT_BIN)
            }
            Err(_) => Self::new(DEFAULT_GIT_BIN),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the configured git binary can be found.
    pub fn ensure_installed(&self) -> Result<(), GitError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| GitError::NotInstalled(self.program.clone()))
    }

    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        debug!("Running {} {} in {}", self.program, args.join(" "), repo.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(repo)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => GitError::NotInstalled(self.program.clone()),
                _ => GitError::SpawnFailed(e),
            })?;

        if !output.status.success() {
            return Err(GitError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_BIN)
    }
}

impl GitExecutor for SystemGit {
    fn diff(&self, repo: &Path, side: DiffSide, format: DiffFormat) -> Result<String, GitError> {
        // Unquoted paths keep non-ASCII names intact for the line parsers.
        let mut args = vec!["-c", "core.quotepath=off", "diff", "--no-color", "-M"];
        if side == DiffSide::Staged {
            args.push("--cached");
        }
        args.push(format.flag());
        self.run(repo, &args)
    }
}

/// Whether `path` is the root of a git working tree.
///
/// Only checks for `.git` at the root; a `.git` file (worktrees, submodules)
/// counts as well as a directory. No git process is started.
pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").exists()
}
