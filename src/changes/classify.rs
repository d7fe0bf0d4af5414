//! Path-based classification: file type, monorepo package, and category.

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Source extensions that count as code.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".py", ".rs"];

const DOC_EXTENSIONS: &[&str] = &[".md", ".txt"];
const CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml", ".toml"];

/// Package prefix rules, checked in order. The template is expanded
/// against the match (`$1` is the first path segment after the prefix).
static PACKAGE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"^packages/([^/]+)/", "$1"),
        (r"^backend/", "backend"),
        (r"^services/([^/]+)/", "services/$1"),
        (r"^examples/([^/]+)/", "examples/$1"),
    ]
    .into_iter()
    .map(|(pattern, template)| (Regex::new(pattern).expect("valid package pattern"), template))
    .collect()
});

/// Lower-cased final extension of `path`, or `"unknown"`.
pub fn file_type(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Monorepo package a path belongs to, if any.
pub fn detect_package(path: &str) -> Option<String> {
    PACKAGE_RULES.iter().find_map(|(re, template)| {
        re.captures(path).map(|caps| {
            let mut name = String::new();
            caps.expand(template, &mut name);
            name
        })
    })
}

/// Bucket a changed file falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Tests,
    Docs,
    Config,
    Code,
    Other,
}

/// Categorize one path. Checks run tests, docs, config, code; first match wins.
pub fn categorize_path(path: &str) -> FileCategory {
    let lower = path.to_lowercase();

    if lower.contains("test") || lower.contains("spec") || lower.contains("__tests__") {
        FileCategory::Tests
    } else if ends_with_any(&lower, DOC_EXTENSIONS)
        || lower.contains("docs/")
        || lower.contains("documentation")
    {
        FileCategory::Docs
    } else if ends_with_any(&lower, CONFIG_EXTENSIONS) || lower.contains("config") {
        FileCategory::Config
    } else if ends_with_any(&lower, SOURCE_EXTENSIONS) {
        FileCategory::Code
    } else {
        FileCategory::Other
    }
}

fn ends_with_any(path: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| path.ends_with(s))
}

/// Paths of a change set partitioned into five buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCategories {
    pub code: Vec<String>,
    pub tests: Vec<String>,
    pub docs: Vec<String>,
    pub config: Vec<String>,
    pub other: Vec<String>,
}

impl ChangeCategories {
    pub fn bucket(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Tests => &self.tests,
            FileCategory::Docs => &self.docs,
            FileCategory::Config => &self.config,
            FileCategory::Code => &self.code,
            FileCategory::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, category: FileCategory) -> &mut Vec<String> {
        match category {
            FileCategory::Tests => &mut self.tests,
            FileCategory::Docs => &mut self.docs,
            FileCategory::Config => &mut self.config,
            FileCategory::Code => &mut self.code,
            FileCategory::Other => &mut self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.code.len() + self.tests.len() + self.docs.len() + self.config.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition paths into categories; every path lands in exactly one bucket.
pub fn categorize_files<'a, I>(paths: I) -> ChangeCategories
where
    I: IntoIterator<Item = &'a str>,
{
    let mut categories = ChangeCategories::default();
    for path in paths {
        categories
            .bucket_mut(categorize_path(path))
            .push(path.to_string());
    }
    categories
}
