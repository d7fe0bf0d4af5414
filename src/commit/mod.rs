//! Conventional commit inference, message generation, and quality scoring.

pub mod describe;
pub mod kind;
pub mod message;
pub mod quality;
pub mod rules;

pub use describe::{calculate_confidence, generate_body, generate_description};
pub use kind::CommitType;
pub use message::{
    CommitMessage, ConventionalHeader, build_commit_message, generate_commit_message,
    parse_header,
};
pub use quality::{QualityReport, analyze_commit_message_quality};
pub use rules::{
    TYPE_RULES, TypeRule, breaking_change_reason, infer_commit_type, infer_scope,
    is_breaking_change,
};
