//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use commitlens::SystemGit;
use git2::{Oid, Repository, Signature};

/// Whether a git binary is available; scenario tests skip without one.
pub fn git_available() -> bool {
    SystemGit::new("git").ensure_installed().is_ok()
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write `content` to `rel` inside the working tree, creating directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Delete `rel` from the working tree.
    pub fn remove(&self, rel: &str) -> &Self {
        std::fs::remove_file(self.path().join(rel)).expect("Failed to remove file");
        self
    }

    /// Stage `rel`: added or modified files are added, missing files removed.
    pub fn stage(&self, rel: &str) -> &Self {
        let mut index = self.repo.index().expect("Failed to get index");
        if self.path().join(rel).exists() {
            index.add_path(Path::new(rel)).expect("Failed to add file");
        } else {
            index.remove_path(Path::new(rel)).expect("Failed to remove file");
        }
        index.write().expect("Failed to write index");
        self
    }

    /// Commit the current index with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write, stage, and commit one file.
    pub fn commit_file(&self, rel: &str, content: &str, message: &str) -> Oid {
        self.write(rel, content).stage(rel);
        self.commit(message)
    }
}
