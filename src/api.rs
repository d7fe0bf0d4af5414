//! Entry points that wrap every outcome in a uniform response envelope.
//!
//! These never return `Err`: failures become `success: false` with the error
//! message, so callers always get a result object.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::changes::{AnalysisResult, ChangeAnalyzer};
use crate::commit::{self, CommitMessage, QualityReport};
use crate::error::AnalysisError;
use crate::git::{SystemGit, is_git_repository};

/// `{success, data?, error?, logs?}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
}

impl<T> ToolResponse<T> {
    pub fn ok(data: T, logs: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            logs,
        }
    }

    pub fn failure(error: impl ToString, logs: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            logs,
        }
    }

    fn from_result(result: Result<T, AnalysisError>, logs: Vec<String>) -> Self {
        match result {
            Ok(data) => Self::ok(data, logs),
            Err(e) => Self::failure(e, logs),
        }
    }
}

/// Analyzer on the configured git binary, checked once before any read.
fn analyzer(repo: &Path) -> Result<ChangeAnalyzer<SystemGit>, AnalysisError> {
    if !is_git_repository(repo) {
        return Err(AnalysisError::NotARepository(repo.to_path_buf()));
    }
    let git = SystemGit::from_env();
    git.ensure_installed()?;
    Ok(ChangeAnalyzer::new(git))
}

/// Analyze staged and unstaged changes of the working tree at `repo`.
pub fn analyze_changes(repo: &Path) -> ToolResponse<AnalysisResult> {
    let mut logs = vec![format!("Analyzing changes in {}", repo.display())];
    let result = analyzer(repo).and_then(|analyzer| analyzer.analyze(repo));

    if let Ok(analysis) = &result {
        logs.push(format!("staged: {} files", analysis.staged.files.len()));
        logs.push(format!("unstaged: {} files", analysis.unstaged.files.len()));
    }

    ToolResponse::from_result(result, logs)
}

/// Generate a conventional commit message for the working tree at `repo`.
pub fn generate_commit_message(repo: &Path) -> ToolResponse<CommitMessage> {
    let mut logs = vec![format!("Generating commit message for {}", repo.display())];
    let result =
        analyzer(repo).and_then(|analyzer| commit::generate_commit_message(&analyzer, repo));

    if let Ok(message) = &result {
        logs.push(format!("confidence: {:.2}", message.confidence));
    }

    ToolResponse::from_result(result, logs)
}

/// Score a candidate commit message.
pub fn analyze_commit_message_quality(message: &str) -> ToolResponse<QualityReport> {
    let report = commit::analyze_commit_message_quality(message);
    let logs = vec![format!("score: {}", report.score)];
    ToolResponse::ok(report, logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GIT_BIN_ENV_VAR;

    #[test]
    fn test_not_a_repository_is_a_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let response = analyze_changes(dir.path());

        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.unwrap().contains("Not a git repository"));
    }

    #[test]
    fn test_message_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let response = generate_commit_message(dir.path());
        assert!(!response.success);
        assert!(!response.logs.is_empty());
    }

    #[test]
    fn test_missing_git_binary_is_a_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        temp_env::with_var(GIT_BIN_ENV_VAR, Some("commitlens-no-such-git"), || {
            let response = analyze_changes(dir.path());
            assert!(!response.success);
            assert!(response.error.unwrap().contains("commitlens-no-such-git"));

            let response = generate_commit_message(dir.path());
            assert!(!response.success);
            assert!(response.data.is_none());
        });
    }

    #[test]
    fn test_quality_always_succeeds() {
        let response = analyze_commit_message_quality("");
        assert!(response.success);
        let report = response.data.unwrap();
        assert_eq!(report.score, 0);
        assert!(!report.compliant);
    }

    #[test]
    fn test_envelope_serialization_skips_empty_fields() {
        let response: ToolResponse<u32> = ToolResponse::ok(7, Vec::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));

        let response: ToolResponse<u32> = ToolResponse::failure("boom", vec!["step".into()]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["logs"][0], "step");
        assert!(json.get("data").is_none());
    }
}
