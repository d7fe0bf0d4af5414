//! Numstat record parsing.
//!
//! `git diff --numstat` emits `added<TAB>deleted<TAB>path`. Renames appear as
//! `old => new`, `dir/{old => new}/file`, or as a separate old/new path pair.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Added/deleted line counts for one path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub added: u32,
    pub deleted: u32,
}

/// Line counts keyed by path.
pub type NumstatMap = HashMap<String, LineCounts>;

/// Parse a numstat listing into a path-keyed map.
///
/// Rename records store their counts under the new path and a
/// zero-added/same-deleted entry under the old path.
pub fn parse_numstat_output(output: &str) -> NumstatMap {
    let mut stats = NumstatMap::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_numstat_line(line) {
            Some(record) => {
                if let Some(old) = record.old_path {
                    stats.insert(
                        old,
                        LineCounts {
                            added: 0,
                            deleted: record.counts.deleted,
                        },
                    );
                }
                stats.insert(record.path, record.counts);
            }
            None => debug!("Skipping malformed numstat record {:?}", line),
        }
    }

    stats
}

#[derive(Debug, PartialEq, Eq)]
struct NumstatRecord {
    path: String,
    old_path: Option<String>,
    counts: LineCounts,
}

fn parse_numstat_line(line: &str) -> Option<NumstatRecord> {
    if line.contains('\t') {
        let mut fields = line.splitn(3, '\t');
        let added = parse_count(fields.next()?);
        let deleted = parse_count(fields.next()?);
        let rest = fields.next()?.trim();
        if rest.is_empty() {
            return None;
        }
        let counts = LineCounts { added, deleted };

        if let Some((old, new)) = expand_rename(rest) {
            return Some(NumstatRecord {
                path: new,
                old_path: Some(old),
                counts,
            });
        }
        if let Some((old, new)) = rest.split_once('\t') {
            return Some(NumstatRecord {
                path: new.trim().to_string(),
                old_path: Some(old.trim().to_string()),
                counts,
            });
        }
        return Some(NumstatRecord {
            path: rest.to_string(),
            old_path: None,
            counts,
        });
    }

    // Whitespace form: `added deleted path` or `added deleted old... new`.
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [added, deleted, path] => Some(NumstatRecord {
            path: path.to_string(),
            old_path: None,
            counts: LineCounts {
                added: parse_count(added),
                deleted: parse_count(deleted),
            },
        }),
        [added, deleted, middle @ .., new] if !middle.is_empty() => {
            let old: Vec<&str> = middle.iter().copied().filter(|t| *t != "=>").collect();
            if old.is_empty() {
                return None;
            }
            Some(NumstatRecord {
                path: new.to_string(),
                old_path: Some(old.join(" ")),
                counts: LineCounts {
                    added: parse_count(added),
                    deleted: parse_count(deleted),
                },
            })
        }
        _ => None,
    }
}

/// Non-numeric counts (binary files report `-`) parse to 0.
fn parse_count(token: &str) -> u32 {
    token.trim().parse().unwrap_or(0)
}

/// Expand git's rename notation into `(old, new)` paths.
///
/// `src/{a.rs => b.rs}` becomes `("src/a.rs", "src/b.rs")` and
/// `{old => new}/mod.rs` with an empty side collapses the doubled slash.
fn expand_rename(path: &str) -> Option<(String, String)> {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((old_mid, new_mid)) = inner.split_once(" => ") {
                let prefix = &path[..open];
                let suffix = &path[close + 1..];
                let join = |mid: &str| {
                    format!("{prefix}{}{suffix}", mid.trim()).replace("//", "/")
                };
                return Some((join(old_mid), join(new_mid)));
            }
        }
    }

    let (old, new) = path.split_once(" => ")?;
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return None;
    }
    Some((old.to_string(), new.to_string()))
}
