//! Conventional commit message generation from analyzed changes.

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::describe::{basename, calculate_confidence, generate_body, generate_description};
use super::kind::CommitType;
use super::rules::{breaking_change_reason, infer_commit_type, infer_scope};
use crate::changes::{ChangeAnalyzer, ChangeSet, suggest_commit_type};
use crate::error::AnalysisError;
use crate::git::GitExecutor;

/// `type(scope)!: description`, scope and `!` optional.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\(([^)]+)\))?(!)?\s*:\s*(.*)$").expect("valid header pattern")
});

const NO_CHANGES: &str = "no changes";

/// A generated conventional commit message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMessage {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub full_message: String,
    pub confidence: f64,
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub breaking: bool,
}

impl CommitMessage {
    /// The first line: `type(scope)!: description`.
    pub fn header(&self) -> String {
        format_header(
            self.commit_type,
            self.scope.as_deref(),
            self.breaking,
            &self.description,
        )
    }

    /// Format the full message for git.
    ///
    /// ```text
    /// type(scope)!: description
    ///
    /// - path/one
    /// - path/two
    ///
    /// BREAKING CHANGE: reason
    /// ```
    pub fn format(&self) -> String {
        let mut parts = vec![self.header()];

        for section in [&self.body, &self.footer].into_iter().flatten() {
            let section = section.trim();
            if !section.is_empty() {
                parts.push(String::new());
                parts.push(section.to_string());
            }
        }

        parts.join("\n")
    }
}

fn format_header(
    commit_type: CommitType,
    scope: Option<&str>,
    breaking: bool,
    description: &str,
) -> String {
    let scope = scope.map(|s| format!("({s})")).unwrap_or_default();
    let bang = if breaking { "!" } else { "" };
    format!("{commit_type}{scope}{bang}: {description}")
}

/// Build a message describing `set`.
pub fn build_commit_message(set: &ChangeSet) -> CommitMessage {
    if set.is_empty() {
        let mut message = CommitMessage {
            commit_type: CommitType::Chore,
            scope: None,
            description: NO_CHANGES.to_string(),
            body: None,
            footer: None,
            full_message: String::new(),
            confidence: calculate_confidence(0, 0),
            alternatives: Vec::new(),
            breaking: false,
        };
        message.full_message = message.format();
        return message;
    }

    let commit_type = infer_commit_type(set);
    let packages = set.packages();
    let scope = infer_scope(&packages);
    let description = generate_description(&set.files);
    let reason = breaking_change_reason(set);

    let mut message = CommitMessage {
        commit_type,
        scope,
        description,
        body: generate_body(&set.files),
        footer: reason.as_ref().map(|r| format!("BREAKING CHANGE: {r}")),
        full_message: String::new(),
        confidence: calculate_confidence(set.files.len(), packages.len()),
        alternatives: Vec::new(),
        breaking: reason.is_some(),
    };
    message.alternatives = alternatives(&message, set);
    message.full_message = message.format();

    debug!(
        "Generated '{}' for {} files (confidence {:.2})",
        message.header(),
        set.files.len(),
        message.confidence
    );

    message
}

/// Alternative headers, de-duplicated and never equal to the primary header.
fn alternatives(message: &CommitMessage, set: &ChangeSet) -> Vec<String> {
    let primary = message.header();
    let mut candidates = Vec::new();

    if message.scope.is_some() {
        candidates.push(format_header(
            message.commit_type,
            None,
            message.breaking,
            &message.description,
        ));
    }

    if let [single] = set.files.as_slice() {
        candidates.push(format_header(
            message.commit_type,
            message.scope.as_deref(),
            false,
            &format!("{} {}", single.status().verb(), basename(&single.path)),
        ));
    }

    let fallback = suggest_commit_type(&set.categories, &set.stats);
    if fallback != message.commit_type {
        candidates.push(format_header(
            fallback,
            message.scope.as_deref(),
            message.breaking,
            &message.description,
        ));
    }

    let mut seen = vec![primary];
    candidates.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
    candidates
}

/// Analyze `repo` and generate a message for what would be committed.
///
/// Describes the staged changes, or the unstaged ones when nothing is staged.
pub fn generate_commit_message<E: GitExecutor>(
    analyzer: &ChangeAnalyzer<E>,
    repo: &Path,
) -> Result<CommitMessage, AnalysisError> {
    let analysis = analyzer.analyze(repo)?;
    let candidates = analysis.commit_candidates();
    if analysis.staged.is_empty() && !candidates.is_empty() {
        debug!("Nothing staged, describing unstaged changes");
    }
    Ok(build_commit_message(candidates))
}

/// Parsed first line of a conventional commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalHeader {
    /// The type as written; may not be a recognized [`CommitType`].
    pub commit_type: String,
    pub scope: Option<String>,
    pub breaking: bool,
    pub description: String,
}

impl ConventionalHeader {
    pub fn known_type(&self) -> Option<CommitType> {
        self.commit_type.parse().ok()
    }
}

/// Parse the header of `message`, or `None` if it is not conventional.
///
/// A `BREAKING CHANGE:` or `BREAKING-CHANGE:` footer also sets `breaking`.
pub fn parse_header(message: &str) -> Option<ConventionalHeader> {
    let first_line = message.lines().next().unwrap_or("").trim();
    let caps = HEADER_RE.captures(first_line)?;

    let breaking_in_footer =
        message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:");

    Some(ConventionalHeader {
        commit_type: caps[1].to_string(),
        scope: caps.get(2).map(|m| m.as_str().trim().to_string()),
        breaking: caps.get(3).is_some() || breaking_in_footer,
        description: caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    })
}
