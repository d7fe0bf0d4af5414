//! Ordered type rules, scope inference, and the breaking-change predicate.
//!
//! Type inference is a list of `(predicate, type)` rules evaluated top to
//! bottom; the first match wins and the category/status suggestion is the
//! fallback when nothing matches.

use crate::changes::{ChangeSet, suggest_commit_type};

use super::kind::CommitType;

/// Dependency manifests. Also a breaking-change trigger.
pub const DEPENDENCY_MANIFESTS: &[&str] = &[
    "package.json",
    "cargo.toml",
    "pyproject.toml",
    "requirements.txt",
    "go.mod",
    "composer.json",
    "pom.xml",
];

/// Lockfiles. Imply a dependency bump but not a breaking change.
pub const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "cargo.lock",
    "poetry.lock",
    "uv.lock",
    "go.sum",
    "gemfile.lock",
    "composer.lock",
];

pub const CI_MARKERS: &[&str] = &[
    ".github/workflows",
    ".gitlab-ci",
    ".circleci",
    ".travis.yml",
    "azure-pipelines",
    ".buildkite",
    "jenkinsfile",
];

pub const BUILD_MARKERS: &[&str] = &[
    "webpack.config",
    "vite.config",
    "rollup.config",
    "babel.config",
    ".babelrc",
    "tsconfig",
    "esbuild",
    "makefile",
    "dockerfile",
    "build.gradle",
];

/// Path fragments that point at a public interface.
const API_MARKERS: &[&str] = &["api", "interface"];

/// Monorepo root prefixes stripped from scopes.
const SCOPE_PREFIXES: &[&str] = &["packages/", "services/"];

/// Shortest common package prefix that still makes a useful scope.
const MIN_SHARED_SCOPE_LEN: usize = 4;

/// One precedence rule for commit type inference.
#[derive(Clone, Copy)]
pub struct TypeRule {
    pub name: &'static str,
    pub matches: fn(&ChangeSet) -> bool,
    pub commit_type: CommitType,
}

impl std::fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRule")
            .field("name", &self.name)
            .field("commit_type", &self.commit_type)
            .finish()
    }
}

/// Type rules in precedence order.
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        name: "tests without code",
        matches: tests_without_code,
        commit_type: CommitType::Test,
    },
    TypeRule {
        name: "docs without code",
        matches: docs_without_code,
        commit_type: CommitType::Docs,
    },
    TypeRule {
        name: "dependency manifest or lockfile",
        matches: touches_dependencies,
        commit_type: CommitType::Chore,
    },
    TypeRule {
        name: "ci configuration",
        matches: touches_ci,
        commit_type: CommitType::Ci,
    },
    TypeRule {
        name: "build tooling",
        matches: touches_build_tooling,
        commit_type: CommitType::Build,
    },
];

fn tests_without_code(set: &ChangeSet) -> bool {
    !set.categories.tests.is_empty() && set.categories.code.is_empty()
}

fn docs_without_code(set: &ChangeSet) -> bool {
    !set.categories.docs.is_empty() && set.categories.code.is_empty()
}

fn touches_dependencies(set: &ChangeSet) -> bool {
    any_path_contains(set, DEPENDENCY_MANIFESTS) || any_path_contains(set, LOCKFILES)
}

fn touches_ci(set: &ChangeSet) -> bool {
    any_path_contains(set, CI_MARKERS)
}

fn touches_build_tooling(set: &ChangeSet) -> bool {
    any_path_contains(set, BUILD_MARKERS)
}

fn any_path_contains(set: &ChangeSet, markers: &[&str]) -> bool {
    set.files.iter().any(|f| first_marker(&f.path, markers).is_some())
}

fn first_marker<'m>(path: &str, markers: &[&'m str]) -> Option<&'m str> {
    let lower = path.to_lowercase();
    markers.iter().copied().find(|m| lower.contains(m))
}

/// The first rule that applies to `set`, if any.
pub fn matching_rule(set: &ChangeSet) -> Option<&'static TypeRule> {
    TYPE_RULES.iter().find(|rule| (rule.matches)(set))
}

/// Infer the commit type for a change set.
pub fn infer_commit_type(set: &ChangeSet) -> CommitType {
    matching_rule(set)
        .map(|rule| rule.commit_type)
        .unwrap_or_else(|| suggest_commit_type(&set.categories, &set.stats))
}

/// Derive a scope from the affected packages.
///
/// One package gives its name without monorepo prefixes; several give their
/// longest common prefix when it is at least 4 characters long.
pub fn infer_scope(packages: &[String]) -> Option<String> {
    match packages {
        [] => None,
        [single] => Some(strip_scope_prefix(single).to_string()).filter(|s| !s.is_empty()),
        [first, rest @ ..] => {
            let shared = rest
                .iter()
                .fold(first.as_str(), |acc, p| common_prefix(acc, p));
            if shared.chars().count() < MIN_SHARED_SCOPE_LEN {
                return None;
            }
            let scope = strip_scope_prefix(shared).trim_end_matches(['/', '-', '_', '.']);
            Some(scope.to_string()).filter(|s| !s.is_empty())
        }
    }
}

fn strip_scope_prefix(name: &str) -> &str {
    SCOPE_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

/// Why a change set is considered breaking, if it is.
///
/// Triggers: a dependency manifest changed, a path looks like a public
/// interface, or more than half as many lines were deleted as added.
pub fn breaking_change_reason(set: &ChangeSet) -> Option<String> {
    if set.files.is_empty() {
        return None;
    }

    for file in &set.files {
        if let Some(marker) = first_marker(&file.path, DEPENDENCY_MANIFESTS) {
            return Some(format!("dependency manifest changed ({marker})"));
        }
    }

    for file in &set.files {
        if first_marker(&file.path, API_MARKERS).is_some() {
            return Some(format!("public interface changed ({})", file.path));
        }
    }

    let added = set.stats.total_lines_added;
    let deleted = set.stats.total_lines_deleted;
    if deleted * 2 > added {
        return Some(format!(
            "removes {deleted} lines against {added} added; existing behavior may be gone"
        ));
    }

    None
}

pub fn is_breaking_change(set: &ChangeSet) -> bool {
    breaking_change_reason(set).is_some()
}
