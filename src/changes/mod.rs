//! Working-tree change parsing, classification, and aggregation.

pub mod aggregate;
pub mod classify;
pub mod numstat;
pub mod parser;
pub mod stats;
pub mod status;

pub use aggregate::{AnalysisResult, AnalysisSummary, ChangeAnalyzer, ChangeSet};
pub use classify::{
    ChangeCategories, FileCategory, categorize_files, categorize_path, detect_package, file_type,
};
pub use numstat::{LineCounts, NumstatMap, parse_numstat_output};
pub use parser::{FileChange, parse_changes};
pub use stats::{ChangeStats, calculate_stats, suggest_commit_type};
pub use status::{ChangeKind, FileStatus, StatusEntry, parse_status_line, parse_status_output};
