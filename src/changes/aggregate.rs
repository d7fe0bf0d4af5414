//! Staged/unstaged change aggregation for a working tree.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classify::{ChangeCategories, categorize_files};
use super::parser::{FileChange, parse_changes};
use super::stats::{ChangeStats, calculate_stats, suggest_commit_type};
use crate::error::{AnalysisError, GitError};
use crate::git::{DiffFormat, DiffSide, GitExecutor, is_git_repository};

/// Files of one side (staged or unstaged) with derived stats and categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub files: Vec<FileChange>,
    pub stats: ChangeStats,
    pub categories: ChangeCategories,
}

impl ChangeSet {
    pub fn from_files(files: Vec<FileChange>) -> Self {
        let stats = calculate_stats(&files);
        let categories = categorize_files(files.iter().map(|f| f.path.as_str()));
        Self {
            files,
            stats,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sorted, de-duplicated packages touched by this set.
    pub fn packages(&self) -> Vec<String> {
        self.files
            .iter()
            .filter_map(|f| f.package.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Totals across both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_lines_added: usize,
    pub total_lines_deleted: usize,
    pub affected_packages: Vec<String>,
    pub suggested_type: String,
}

/// Full analysis of a working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub staged: ChangeSet,
    pub unstaged: ChangeSet,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    pub fn from_sides(staged: ChangeSet, unstaged: ChangeSet) -> Self {
        let affected_packages = staged
            .packages()
            .into_iter()
            .chain(unstaged.packages())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // The suggestion describes what would be committed: staged first.
        let primary = if staged.is_empty() { &unstaged } else { &staged };
        let suggested_type = suggest_commit_type(&primary.categories, &primary.stats);

        let summary = AnalysisSummary {
            total_files: staged.stats.total_files + unstaged.stats.total_files,
            total_lines_added: staged.stats.total_lines_added + unstaged.stats.total_lines_added,
            total_lines_deleted: staged.stats.total_lines_deleted
                + unstaged.stats.total_lines_deleted,
            affected_packages,
            suggested_type: suggested_type.to_string(),
        };

        Self {
            staged,
            unstaged,
            summary,
        }
    }

    /// The set a commit message should describe: staged, or unstaged if nothing is staged.
    pub fn commit_candidates(&self) -> &ChangeSet {
        if self.staged.is_empty() {
            &self.unstaged
        } else {
            &self.staged
        }
    }
}

/// Runs the diff reads for a repository and assembles an [`AnalysisResult`].
pub struct ChangeAnalyzer<E> {
    executor: E,
}

impl<E: GitExecutor> ChangeAnalyzer<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Analyze staged and unstaged changes of the working tree at `repo`.
    ///
    /// Fails fast with [`AnalysisError::NotARepository`] before any git call.
    /// A failed read (e.g. nothing to diff) counts as zero changes for that side.
    pub fn analyze(&self, repo: &Path) -> Result<AnalysisResult, AnalysisError> {
        if !is_git_repository(repo) {
            return Err(AnalysisError::NotARepository(repo.to_path_buf()));
        }

        let staged = self.read_side(repo, DiffSide::Staged)?;
        let unstaged = self.read_side(repo, DiffSide::Unstaged)?;

        debug!(
            "Analyzed {}: {} staged, {} unstaged files",
            repo.display(),
            staged.files.len(),
            unstaged.files.len()
        );

        Ok(AnalysisResult::from_sides(staged, unstaged))
    }

    fn read_side(&self, repo: &Path, side: DiffSide) -> Result<ChangeSet, AnalysisError> {
        let name_status = self.read(repo, side, DiffFormat::NameStatus)?;
        let numstat = self.read(repo, side, DiffFormat::Numstat)?;
        Ok(ChangeSet::from_files(parse_changes(&name_status, &numstat)))
    }

    fn read(&self, repo: &Path, side: DiffSide, format: DiffFormat) -> Result<String, GitError> {
        match self.executor.diff(repo, side, format) {
            Ok(output) => Ok(output),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Could not read {} changes ({:?}): {}", side, format, e);
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::changes::FileStatus;
    use crate::git::MockGitExecutor;

    fn repo_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    fn expect_read(
        mock: &mut MockGitExecutor,
        side: DiffSide,
        format: DiffFormat,
        output: Result<&'static str, i32>,
    ) {
        mock.expect_diff()
            .withf(move |_, s, f| *s == side && *f == format)
            .times(1)
            .returning(move |_, _, _| match output {
                Ok(text) => Ok(text.to_string()),
                Err(code) => Err(GitError::NonZeroExit {
                    code,
                    stderr: "fatal: bad revision 'HEAD'".to_string(),
                }),
            });
    }

    #[test]
    fn test_not_a_repository_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockGitExecutor::new();
        mock.expect_diff().never();

        let result = ChangeAnalyzer::new(mock).analyze(dir.path());
        assert!(matches!(result, Err(AnalysisError::NotARepository(_))));
    }

    #[test]
    fn test_analyze_combines_both_sides() {
        let dir = repo_dir();
        let mut mock = MockGitExecutor::new();
        expect_read(
            &mut mock,
            DiffSide::Staged,
            DiffFormat::NameStatus,
            Ok("A\tpackages/core/src/feature.ts\nA\tpackages/core/README.md\n"),
        );
        expect_read(
            &mut mock,
            DiffSide::Staged,
            DiffFormat::Numstat,
            Ok("20\t0\tpackages/core/src/feature.ts\n2\t1\tpackages/core/README.md\n"),
        );
        expect_read(
            &mut mock,
            DiffSide::Unstaged,
            DiffFormat::NameStatus,
            Ok("M\tservices/api/main.py\n"),
        );
        expect_read(
            &mut mock,
            DiffSide::Unstaged,
            DiffFormat::Numstat,
            Ok("5\t5\tservices/api/main.py\n"),
        );

        let result = ChangeAnalyzer::new(mock).analyze(dir.path()).unwrap();

        assert_eq!(result.staged.files.len(), 2);
        assert_eq!(result.unstaged.files.len(), 1);
        assert_eq!(result.staged.categories.code, vec!["packages/core/src/feature.ts"]);
        assert_eq!(result.staged.categories.docs, vec!["packages/core/README.md"]);
        assert_eq!(result.summary.total_files, 3);
        assert_eq!(result.summary.total_lines_added, 27);
        assert_eq!(result.summary.total_lines_deleted, 6);
        assert_eq!(result.summary.affected_packages, vec!["core", "services/api"]);
        assert_eq!(result.summary.suggested_type, "feat");
    }

    #[test]
    fn test_failed_staged_read_counts_as_no_changes() {
        let dir = repo_dir();
        let mut mock = MockGitExecutor::new();
        expect_read(&mut mock, DiffSide::Staged, DiffFormat::NameStatus, Err(128));
        expect_read(&mut mock, DiffSide::Staged, DiffFormat::Numstat, Err(128));
        expect_read(
            &mut mock,
            DiffSide::Unstaged,
            DiffFormat::NameStatus,
            Ok("D\tsrc/old.ts\n"),
        );
        expect_read(
            &mut mock,
            DiffSide::Unstaged,
            DiffFormat::Numstat,
            Ok("0\t12\tsrc/old.ts\n"),
        );

        let result = ChangeAnalyzer::new(mock).analyze(dir.path()).unwrap();

        assert!(result.staged.is_empty());
        assert_eq!(result.unstaged.files[0].status(), FileStatus::Deleted);
        assert_eq!(result.commit_candidates().files.len(), 1);
        assert_eq!(result.summary.suggested_type, "refactor");
    }

    #[test]
    fn test_missing_binary_is_terminal() {
        let dir = repo_dir();
        let mut mock = MockGitExecutor::new();
        mock.expect_diff()
            .with(mockall::predicate::always(), eq(DiffSide::Staged), eq(DiffFormat::NameStatus))
            .times(1)
            .returning(|_, _, _| Err(GitError::NotInstalled("git".to_string())));

        let result = ChangeAnalyzer::new(mock).analyze(dir.path());
        assert!(matches!(
            result,
            Err(AnalysisError::Git(GitError::NotInstalled(_)))
        ));
    }

    #[test]
    fn test_clean_tree_has_zero_counts() {
        let dir = repo_dir();
        let mut mock = MockGitExecutor::new();
        mock.expect_diff().times(4).returning(|_, _, _| Ok(String::new()));

        let result = ChangeAnalyzer::new(mock).analyze(dir.path()).unwrap();
        assert_eq!(result.summary.total_files, 0);
        assert!(result.summary.affected_packages.is_empty());
        assert!(result.commit_candidates().is_empty());
    }
}
