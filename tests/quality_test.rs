//! Commit message quality scoring through the public API.

use commitlens::api::analyze_commit_message_quality;
use commitlens::commit::analyze_commit_message_quality as score;

#[test]
fn test_empty_message_scores_zero() {
    let report = analyze_commit_message_quality("").data.unwrap();
    assert_eq!(report.score, 0);
    assert!(!report.compliant);
}

#[test]
fn test_wip_message_is_not_compliant() {
    let report = score("wip: stuff");
    assert!(!report.compliant);
    assert!(report.score < 100 - 30 - 20);
    assert!(report.issues.iter().any(|i| i.contains("Work-in-progress")));
    assert!(report.issues.iter().any(|i| i.contains("too short")));
}

#[test]
fn test_generated_style_messages_are_compliant() {
    for message in [
        "feat: add feature",
        "fix(ui): update 2 source files",
        "refactor!: remove old.ts",
        "chore!: update configuration\n\nBREAKING CHANGE: dependency manifest changed (package.json)",
    ] {
        let report = score(message);
        assert!(report.compliant, "{message}: {:?}", report.issues);
    }
}

#[test]
fn test_scores_stay_in_range() {
    let long = "a".repeat(300);
    for message in [
        "x",
        "??",
        "oops wip",
        "WIP ?? oops fix typo",
        "feat(a): add a",
        long.as_str(),
        "unknown(scope)!: Something happened here that is really long and keeps going on and on.",
    ] {
        let report = score(message);
        assert!(report.score <= 100);
        if report.score < 60 {
            assert!(!report.compliant);
        }
    }
}

#[test]
fn test_response_serializes_report() {
    let response = analyze_commit_message_quality("docs: update readme");
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["score"], 100);
    assert_eq!(json["data"]["compliant"], true);
}
