//! Description, body, and confidence heuristics for generated messages.

use std::path::Path;

use crate::changes::classify::SOURCE_EXTENSIONS;
use crate::changes::{ChangeCategories, FileChange, FileStatus, categorize_files};

/// Files listed in a body before truncating.
pub const MAX_BODY_FILES: usize = 5;

/// File counts that get a body: one file says it all, ten or more is noise.
pub const BODY_FILE_RANGE: std::ops::Range<usize> = 2..10;

const BASE_CONFIDENCE: f64 = 0.7;
const SINGLE_FILE_CONFIDENCE: f64 = 0.9;
const LARGE_CHANGE_CONFIDENCE: f64 = 0.5;
const LARGE_CHANGE_FILES: usize = 20;
const SINGLE_PACKAGE_BONUS: f64 = 0.1;

/// Final path component.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Basename with a recognized source extension removed.
fn source_stem(path: &str) -> &str {
    let name = basename(path);
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && SOURCE_EXTENSIONS
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Subject of a test file: `parser.test.ts` and `test_parser.py` both give `parser`.
fn test_subject(path: &str) -> String {
    let stem = Path::new(basename(path))
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| basename(path).to_string());
    let stem = [".test", ".spec", "_test", "_spec"]
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(&stem);
    let stem = stem.strip_prefix("test_").unwrap_or(stem);
    stem.to_string()
}

/// Describe a set of file changes in a short imperative phrase.
pub fn generate_description(files: &[FileChange]) -> String {
    if files.is_empty() {
        return "no changes".to_string();
    }

    let count = files.len();
    let all = |status: FileStatus| files.iter().all(|f| f.status() == status);

    if all(FileStatus::Renamed) {
        return match files {
            [single] => format!("rename {}", basename(&single.path)),
            _ => format!("rename {count} files"),
        };
    }

    if all(FileStatus::Deleted) {
        return match files {
            [single] => format!("remove {}", basename(&single.path)),
            _ => format!("remove {count} files"),
        };
    }

    let categories = categorize_files(files.iter().map(|f| f.path.as_str()));

    if all(FileStatus::Added) {
        return describe_additions(files, &categories);
    }

    if let Some(description) = describe_by_category(files, &categories) {
        return description;
    }

    match files {
        [single] => format!("{} {}", single.status().verb(), basename(&single.path)),
        _ => describe_status_counts(files),
    }
}

fn describe_additions(files: &[FileChange], categories: &ChangeCategories) -> String {
    match categories.code.as_slice() {
        [single] => return format!("add {}", source_stem(single)),
        [] => {}
        code => return format!("add {} source files", code.len()),
    }

    match categories.tests.as_slice() {
        [single] => return format!("add tests for {}", test_subject(single)),
        [] => {}
        tests => return format!("add {} test files", tests.len()),
    }

    match files {
        [single] => format!("add {}", basename(&single.path)),
        _ => format!("add {} files", files.len()),
    }
}

fn describe_by_category(files: &[FileChange], categories: &ChangeCategories) -> Option<String> {
    match categories.code.as_slice() {
        [single] => return Some(format!("update {}", source_stem(single))),
        [] => {}
        code => return Some(format!("update {} source files", code.len())),
    }

    if !categories.tests.is_empty() {
        let adds_tests = files
            .iter()
            .any(|f| f.status() == FileStatus::Added && categories.tests.contains(&f.path));
        return Some(if adds_tests { "add tests" } else { "update tests" }.to_string());
    }

    if !categories.docs.is_empty() {
        return Some("update documentation".to_string());
    }

    if !categories.config.is_empty() {
        return Some("update configuration".to_string());
    }

    None
}

/// `"add 2, update 1, remove 1"` style summary.
fn describe_status_counts(files: &[FileChange]) -> String {
    [
        FileStatus::Added,
        FileStatus::Modified,
        FileStatus::Renamed,
        FileStatus::Deleted,
    ]
    .into_iter()
    .filter_map(|status| {
        let n = files.iter().filter(|f| f.status() == status).count();
        (n > 0).then(|| format!("{} {n}", status.verb()))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Confidence in a generated message, in `[0, 1]`.
///
/// Never increases with the number of files for a fixed package count.
pub fn calculate_confidence(file_count: usize, package_count: usize) -> f64 {
    let mut confidence = match file_count {
        1 => SINGLE_FILE_CONFIDENCE,
        n if n > LARGE_CHANGE_FILES => LARGE_CHANGE_CONFIDENCE,
        _ => BASE_CONFIDENCE,
    };
    if package_count == 1 {
        confidence += SINGLE_PACKAGE_BONUS;
    }
    confidence.clamp(0.0, 1.0)
}

/// Bulleted file list for mid-sized changes.
pub fn generate_body(files: &[FileChange]) -> Option<String> {
    if !BODY_FILE_RANGE.contains(&files.len()) {
        return None;
    }

    let mut lines: Vec<String> = files
        .iter()
        .take(MAX_BODY_FILES)
        .map(|f| format!("- {}", f.path))
        .collect();

    if files.len() > MAX_BODY_FILES {
        lines.push(format!("... and {} more", files.len() - MAX_BODY_FILES));
    }

    Some(lines.join("\n"))
}
