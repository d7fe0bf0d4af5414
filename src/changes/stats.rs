//! Change statistics and the category/status based type suggestion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::classify::ChangeCategories;
use super::parser::FileChange;
use super::status::FileStatus;
use crate::commit::CommitType;

/// Aggregate counts for a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStats {
    pub total_files: usize,
    pub total_lines_added: usize,
    pub total_lines_deleted: usize,
    pub files_by_type: BTreeMap<String, usize>,
    pub files_by_status: BTreeMap<FileStatus, usize>,
}

impl ChangeStats {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files_by_status.get(&status).copied().unwrap_or(0)
    }
}

pub fn calculate_stats(files: &[FileChange]) -> ChangeStats {
    let mut stats = ChangeStats {
        total_files: files.len(),
        ..ChangeStats::default()
    };

    for file in files {
        stats.total_lines_added += file.lines_added as usize;
        stats.total_lines_deleted += file.lines_deleted as usize;
        *stats.files_by_type.entry(file.file_type.clone()).or_insert(0) += 1;
        *stats.files_by_status.entry(file.status()).or_insert(0) += 1;
    }

    stats
}

/// Suggest a commit type from categories and status counts alone.
///
/// Used as the fallback when no path-marker rule applies.
pub fn suggest_commit_type(categories: &ChangeCategories, stats: &ChangeStats) -> CommitType {
    let has_code = !categories.code.is_empty();
    let has_config = !categories.config.is_empty();
    let has_docs = !categories.docs.is_empty();
    let has_tests = !categories.tests.is_empty();
    let only_tests = has_tests && categories.len() == categories.tests.len();

    if only_tests {
        return CommitType::Test;
    }
    if has_docs && !has_code && !has_config {
        return CommitType::Docs;
    }
    if has_config && !has_code {
        return CommitType::Chore;
    }

    let added = stats.count(FileStatus::Added);
    let modified = stats.count(FileStatus::Modified);
    let deleted = stats.count(FileStatus::Deleted);
    let renamed = stats.count(FileStatus::Renamed);

    if added > modified && added > deleted {
        CommitType::Feat
    } else if (deleted > 0 || renamed > 0) && added == 0 {
        CommitType::Refactor
    } else {
        CommitType::Fix
    }
}
