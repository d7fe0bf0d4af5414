//! Name-status record parsing.
//!
//! Accepts both `git diff --name-status` lines (`M\tsrc/lib.rs`,
//! `R087\told.rs\tnew.rs`) and porcelain-style `XY path` lines
//! (` M src/lib.rs`, `R  old.rs -> new.rs`).

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Status of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    /// Verb used when describing a change of this status.
    pub fn verb(self) -> &'static str {
        match self {
            FileStatus::Added => "add",
            FileStatus::Modified => "update",
            FileStatus::Deleted => "remove",
            FileStatus::Renamed => "rename",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
        }
    }
}

/// What happened to a path, with the origin path where one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChangeKind {
    Added {
        /// Source of a copy; `None` for a plain new file.
        #[serde(rename = "oldPath", default, skip_serializing_if = "Option::is_none")]
        copied_from: Option<String>,
    },
    Modified,
    Deleted,
    Renamed {
        #[serde(rename = "oldPath")]
        old_path: String,
    },
}

impl ChangeKind {
    pub fn status(&self) -> FileStatus {
        match self {
            ChangeKind::Added { .. } => FileStatus::Added,
            ChangeKind::Modified => FileStatus::Modified,
            ChangeKind::Deleted => FileStatus::Deleted,
            ChangeKind::Renamed { .. } => FileStatus::Renamed,
        }
    }

    /// Rename origin or copy source.
    pub fn old_path(&self) -> Option<&str> {
        match self {
            ChangeKind::Added { copied_from } => copied_from.as_deref(),
            ChangeKind::Renamed { old_path } => Some(old_path),
            ChangeKind::Modified | ChangeKind::Deleted => None,
        }
    }
}

/// One parsed name-status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub kind: ChangeKind,
    /// Similarity index reported for renames and copies, passed through verbatim.
    pub similarity: Option<u32>,
}

static RENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^R(\d+)?\s+(.+)$").expect("valid rename pattern"));
static COPY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^C(\d+)?\s+(.+)$").expect("valid copy pattern"));

/// Parse a single name-status record.
///
/// Returns `None` for records shorter than 3 characters, records with an
/// empty path, and rename/copy records that do not carry two paths.
pub fn parse_status_line(line: &str) -> Option<StatusEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.chars().count() < 3 {
        debug!("Skipping short status record {:?}", line);
        return None;
    }

    if let Some(caps) = RENAME_RE.captures(line) {
        let similarity = caps.get(1).and_then(|m| m.as_str().parse().ok());
        match split_path_pair(&caps[2]) {
            Some((old_path, path)) => {
                return Some(StatusEntry {
                    path,
                    kind: ChangeKind::Renamed { old_path },
                    similarity,
                });
            }
            // With a similarity index the record is unambiguously a broken pair.
            None if caps.get(1).is_some() => {
                debug!("Skipping rename record without two paths {:?}", line);
                return None;
            }
            None => {}
        }
    }

    if let Some(caps) = COPY_RE.captures(line) {
        let similarity = caps.get(1).and_then(|m| m.as_str().parse().ok());
        match split_path_pair(&caps[2]) {
            Some((old_path, path)) => {
                return Some(StatusEntry {
                    path,
                    kind: ChangeKind::Added {
                        copied_from: Some(old_path),
                    },
                    similarity,
                });
            }
            None if caps.get(1).is_some() => {
                debug!("Skipping copy record without two paths {:?}", line);
                return None;
            }
            None => {}
        }
    }

    parse_two_char_code(line)
}

/// Parse every record of a name-status listing, skipping malformed lines.
pub fn parse_status_output(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(parse_status_line)
        .collect()
}

/// Standard `XY path` record: the index column `X` dominates.
fn parse_two_char_code(line: &str) -> Option<StatusEntry> {
    let mut chars = line.chars();
    let index = chars.next()?;
    let worktree = chars.next()?;
    let path = chars.as_str().trim();
    if path.is_empty() {
        debug!("Skipping status record without path {:?}", line);
        return None;
    }

    let kind = match index {
        'A' | 'C' => ChangeKind::Added { copied_from: None },
        'D' => ChangeKind::Deleted,
        'R' => {
            // A rename code without a recognizable pair still records an origin.
            let (old_path, path) =
                split_path_pair(path).unwrap_or_else(|| (path.to_string(), path.to_string()));
            return Some(StatusEntry {
                path,
                kind: ChangeKind::Renamed { old_path },
                similarity: None,
            });
        }
        'M' | ' ' => match worktree {
            'D' => ChangeKind::Deleted,
            _ => ChangeKind::Modified,
        },
        _ => ChangeKind::Modified,
    };

    Some(StatusEntry {
        path: path.to_string(),
        kind,
        similarity: None,
    })
}

/// Split `old<TAB>new`, `old -> new` or `old new` into its two paths.
fn split_path_pair(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim();

    if rest.contains('\t') {
        let fields: Vec<&str> = rest.split('\t').filter(|f| !f.is_empty()).collect();
        return match fields.as_slice() {
            [old, new] => Some((old.trim().to_string(), new.trim().to_string())),
            _ => None,
        };
    }

    if let Some((old, new)) = rest.split_once(" -> ") {
        let (old, new) = (old.trim(), new.trim());
        if old.is_empty() || new.is_empty() {
            return None;
        }
        return Some((old.to_string(), new.to_string()));
    }

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    match tokens.as_slice() {
        [old, new] => Some((old.to_string(), new.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(line: &str) -> FileStatus {
        parse_status_line(line).unwrap().kind.status()
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Added.to_string(), "Added");
        assert_eq!(FileStatus::Modified.to_string(), "Modified");
        assert_eq!(FileStatus::Deleted.to_string(), "Deleted");
        assert_eq!(FileStatus::Renamed.to_string(), "Renamed");
    }

    #[test]
    fn test_name_status_single_letter_codes() {
        assert_eq!(status_of("A\tsrc/feature.ts"), FileStatus::Added);
        assert_eq!(status_of("M\tsrc/bug.ts"), FileStatus::Modified);
        assert_eq!(status_of("D\tsrc/old.ts"), FileStatus::Deleted);
        assert_eq!(parse_status_line("A\tsrc/feature.ts").unwrap().path, "src/feature.ts");
    }

    #[test]
    fn test_porcelain_codes() {
        assert_eq!(status_of("A  new.rs"), FileStatus::Added);
        assert_eq!(status_of(" M lib.rs"), FileStatus::Modified);
        assert_eq!(status_of(" D gone.rs"), FileStatus::Deleted);
        assert_eq!(status_of("MD gone.rs"), FileStatus::Deleted);
        assert_eq!(status_of("MM both.rs"), FileStatus::Modified);
        assert_eq!(status_of("?? untracked.rs"), FileStatus::Modified);
        assert_eq!(status_of("T  typechange.rs"), FileStatus::Modified);
    }

    #[test]
    fn test_every_two_char_code_yields_a_status() {
        let codes = ['A', 'M', 'D', 'R', 'C', 'U', 'T', ' ', '?', '!'];
        for x in codes {
            for y in codes {
                let line = format!("{x}{y} some/file.txt");
                assert!(
                    parse_status_line(&line).is_some(),
                    "no status for {line:?}"
                );
            }
        }
    }

    #[test]
    fn test_rename_with_similarity() {
        let entry = parse_status_line("R087\tsrc/old.rs\tsrc/new.rs").unwrap();
        assert_eq!(entry.path, "src/new.rs");
        assert_eq!(entry.kind.old_path(), Some("src/old.rs"));
        assert_eq!(entry.kind.status(), FileStatus::Renamed);
        assert_eq!(entry.similarity, Some(87));
    }

    #[test]
    fn test_rename_whitespace_separated_without_similarity() {
        let entry = parse_status_line("R old.ts new.ts").unwrap();
        assert_eq!(entry.path, "new.ts");
        assert_eq!(
            entry.kind,
            ChangeKind::Renamed {
                old_path: "old.ts".to_string()
            }
        );
        assert_eq!(entry.similarity, None);
    }

    #[test]
    fn test_porcelain_rename_arrow() {
        let entry = parse_status_line("R  docs/a.md -> docs/b.md").unwrap();
        assert_eq!(entry.path, "docs/b.md");
        assert_eq!(entry.kind.old_path(), Some("docs/a.md"));
    }

    #[test]
    fn test_rename_paths_with_spaces_use_tabs() {
        let entry = parse_status_line("R100\tmy old.txt\tmy new.txt").unwrap();
        assert_eq!(entry.path, "my new.txt");
        assert_eq!(entry.kind.old_path(), Some("my old.txt"));
        assert_eq!(entry.similarity, Some(100));
    }

    #[test]
    fn test_copy_is_added_with_origin() {
        let entry = parse_status_line("C075\tsrc/a.rs\tsrc/b.rs").unwrap();
        assert_eq!(entry.path, "src/b.rs");
        assert_eq!(entry.kind.status(), FileStatus::Added);
        assert_eq!(entry.kind.old_path(), Some("src/a.rs"));
        assert_eq!(entry.similarity, Some(75));
    }

    #[test]
    fn test_bare_rename_code_keeps_origin() {
        let entry = parse_status_line("RM renamed.rs").unwrap();
        assert_eq!(entry.kind.status(), FileStatus::Renamed);
        assert_eq!(entry.kind.old_path(), Some("renamed.rs"));
    }

    #[test]
    fn test_short_or_pathless_records_are_rejected() {
        assert!(parse_status_line("").is_none());
        assert!(parse_status_line("M").is_none());
        assert!(parse_status_line("M ").is_none());
        assert!(parse_status_line("M    ").is_none());
        assert!(parse_status_line("R100\tonly-one-path").is_none());
        assert!(parse_status_line("C050 lonely.rs").is_none());
    }

    #[test]
    fn test_parse_output_skips_malformed_records() {
        let output = "A\tfeature.ts\nM\n\nD\told.ts\nR090\ta.rs\tb.rs\n";
        let entries = parse_status_output(output);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "feature.ts");
        assert_eq!(entries[1].path, "old.ts");
        assert_eq!(entries[2].path, "b.rs");
    }

    #[test]
    fn test_change_kind_serializes_flat() {
        let kind = ChangeKind::Renamed {
            old_path: "a.rs".to_string(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["status"], "renamed");
        assert_eq!(json["oldPath"], "a.rs");

        let added = serde_json::to_value(ChangeKind::Added { copied_from: None }).unwrap();
        assert_eq!(added["status"], "added");
        assert!(added.get("oldPath").is_none());
    }
}
