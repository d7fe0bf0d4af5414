//! Joins one name-status pass with one numstat pass into typed file changes.

use serde::{Deserialize, Serialize};

use super::classify::{detect_package, file_type};
use super::numstat::{LineCounts, NumstatMap, parse_numstat_output};
use super::status::{ChangeKind, FileStatus, StatusEntry, parse_status_output};

/// A single changed file with its line counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    #[serde(flatten)]
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<u32>,
    pub lines_added: u32,
    pub lines_deleted: u32,
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl FileChange {
    pub fn status(&self) -> FileStatus {
        self.kind.status()
    }

    pub fn old_path(&self) -> Option<&str> {
        self.kind.old_path()
    }

    /// Build a change from a status record and the numstat of the same pass.
    ///
    /// Counts are looked up by the new path first, then by the old path.
    pub fn from_entry(entry: StatusEntry, numstat: &NumstatMap) -> Self {
        let counts = numstat
            .get(&entry.path)
            .or_else(|| entry.kind.old_path().and_then(|old| numstat.get(old)))
            .copied()
            .unwrap_or_default();
        let LineCounts { added, deleted } = counts;

        Self {
            file_type: file_type(&entry.path),
            package: detect_package(&entry.path),
            path: entry.path,
            kind: entry.kind,
            similarity: entry.similarity,
            lines_added: added,
            lines_deleted: deleted,
        }
    }
}

/// Parse raw name-status and numstat output of one side into file changes.
pub fn parse_changes(name_status: &str, numstat: &str) -> Vec<FileChange> {
    let counts = parse_numstat_output(numstat);
    parse_status_output(name_status)
        .into_iter()
        .map(|entry| FileChange::from_entry(entry, &counts))
        .collect()
}
