//! commitlens - working-tree change analysis and conventional commit messages.
//!
//! # Overview
//!
//! commitlens reads the staged and unstaged diff of a git working tree,
//! classifies every changed file, suggests a conventional commit message for
//! it, and scores arbitrary commit messages against conventional commit
//! practice.

pub mod api;
pub mod changes;
pub mod commit;
pub mod error;
pub mod git;

// Re-export commonly used types
pub use api::ToolResponse;
pub use changes::{AnalysisResult, ChangeAnalyzer, ChangeSet, FileChange, FileStatus};
pub use commit::{CommitMessage, CommitType, QualityReport};
pub use error::{AnalysisError, GitError};
pub use git::{GitExecutor, SystemGit};
