//! Scoring of arbitrary commit messages against conventional commit practice.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::message::parse_header;

/// First lines at or below this length are too short.
pub const SUBJECT_MIN: usize = 10;
/// Hard limit for the first line.
pub const SUBJECT_MAX: usize = 72;
/// Recommended limit for the first line and for the description.
pub const SUBJECT_SOFT_MAX: usize = 50;
/// Shortest meaningful description.
pub const DESCRIPTION_MIN: usize = 3;
/// Minimum score for a conventional message to count as compliant.
pub const COMPLIANCE_THRESHOLD: i32 = 60;

const IMPERATIVE_VERBS: &[&str] = &[
    "add", "adjust", "allow", "avoid", "bump", "change", "clean", "configure", "convert",
    "correct", "create", "delete", "deprecate", "disable", "document", "downgrade", "drop",
    "enable", "ensure", "expose", "extract", "fix", "format", "handle", "implement", "improve",
    "include", "initialize", "integrate", "introduce", "make", "merge", "migrate", "move",
    "optimize", "prevent", "reduce", "refactor", "release", "remove", "rename", "replace",
    "restore", "revert", "rewrite", "set", "simplify", "split", "support", "switch", "test",
    "update", "upgrade", "use",
];

const WIP_PREFIXES: &[&str] = &["wip", "work in progress"];
const UNPROFESSIONAL_MARKERS: &[&str] = &["??", "oops", "fix typo"];

static ISSUE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(#\d+|\b(closes|fixes|resolves|refs)\b)").expect("valid issue pattern")
});

/// Outcome of scoring one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: u8,
    pub compliant: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Accumulates deductions against a starting score of 100.
struct Scorer {
    score: i32,
    issues: Vec<String>,
    suggestions: Vec<String>,
}

impl Scorer {
    fn new() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn deduct(&mut self, points: i32, issue: impl Into<String>) {
        self.score -= points;
        self.issues.push(issue.into());
    }

    fn suggest(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }

    fn finish(self, grammar_matched: bool) -> QualityReport {
        let score = self.score.clamp(0, 100);
        QualityReport {
            score: score as u8,
            compliant: grammar_matched && score >= COMPLIANCE_THRESHOLD,
            issues: self.issues,
            suggestions: self.suggestions,
        }
    }
}

/// Score `message` from 0 to 100 and list what is wrong with it.
pub fn analyze_commit_message_quality(message: &str) -> QualityReport {
    if message.trim().is_empty() {
        return QualityReport {
            score: 0,
            compliant: false,
            issues: vec!["Commit message is empty".to_string()],
            suggestions: vec!["Write a message in the form type(scope): description".to_string()],
        };
    }

    let mut scorer = Scorer::new();
    let lines: Vec<&str> = message.trim_end().lines().collect();
    let first_line = lines.first().copied().unwrap_or("").trim();
    let subject_len = first_line.chars().count();

    if subject_len <= SUBJECT_MIN {
        scorer.deduct(30, format!("First line is too short ({subject_len} characters)"));
    } else if subject_len > SUBJECT_MAX {
        scorer.deduct(
            10,
            format!("First line exceeds {SUBJECT_MAX} characters ({subject_len})"),
        );
    } else if subject_len > SUBJECT_SOFT_MAX {
        scorer.deduct(
            5,
            format!("First line is longer than {SUBJECT_SOFT_MAX} characters ({subject_len})"),
        );
    }

    let header = parse_header(message);
    match &header {
        None => {
            scorer.deduct(40, "Does not follow the type(scope): description format");
            scorer.suggest("Start with a type such as feat, fix, or docs followed by a colon");
        }
        Some(header) => {
            if header.known_type().is_none() {
                scorer.deduct(20, format!("Unknown commit type '{}'", header.commit_type));
                scorer.suggest(
                    "Use one of feat, fix, docs, style, refactor, perf, test, chore, ci, build",
                );
            }
            score_description(&mut scorer, &header.description);
        }
    }

    let lower = first_line.to_lowercase();
    if WIP_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        scorer.deduct(20, "Work-in-progress commit");
        scorer.suggest("Squash work-in-progress commits before merging");
    }
    if UNPROFESSIONAL_MARKERS.iter().any(|m| lower.contains(m)) {
        scorer.deduct(15, "Contains unprofessional wording");
    }

    if lines.len() == 1 && subject_len < SUBJECT_SOFT_MAX {
        scorer.suggest("Consider adding a body that explains why the change was made");
    }
    if lines.len() > 1 {
        if !lines[1].trim().is_empty() {
            scorer.suggest("Separate the body from the first line with a blank line");
        }
        if !ISSUE_REF_RE.is_match(message) {
            scorer.suggest("Reference related issues in a footer (e.g. Closes #123)");
        }
    }

    scorer.finish(header.is_some())
}

fn score_description(scorer: &mut Scorer, description: &str) {
    let len = description.chars().count();
    if len < DESCRIPTION_MIN {
        scorer.deduct(30, "Description is missing or too short");
        return;
    }
    if len > SUBJECT_SOFT_MAX {
        scorer.deduct(
            10,
            format!("Description is longer than {SUBJECT_SOFT_MAX} characters ({len})"),
        );
    }

    let first_word = description
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    if !IMPERATIVE_VERBS.contains(&first_word.as_str()) {
        scorer.deduct(5, "Description does not start with an imperative verb");
        scorer.suggest("Start the description with a verb like add, fix, or update");
    }

    if description.starts_with(|c: char| c.is_uppercase()) {
        scorer.suggest("Start the description with a lowercase letter");
    }
    if description.ends_with('.') {
        scorer.suggest("Drop the trailing period from the description");
    }
}
