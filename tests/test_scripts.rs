use std::fs;
use std::path::{Path, PathBuf};

use beacon::report::scripts::{self, FailureTracker};

fn temp_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("beacon-scripts-{}", tag));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("triggers")).unwrap();
    fs::create_dir_all(root.join("states")).unwrap();
    root
}

#[test]
fn test_trigger_badges_reflect_recorded_failures() {
    let root = temp_root("badges");
    fs::write(root.join("triggers/alpha.sh"), "#!/bin/sh\n").unwrap();
    fs::write(root.join("triggers/bravo.sh"), "#!/bin/sh\n").unwrap();

    let tracker = FailureTracker::new();
    tracker.record(root.join("triggers/bravo.sh"), "exit status 2");

    let badges = scripts::trigger_badges(&root, &tracker);
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0].name, "alpha.sh");
    assert!(badges[0].ok);
    assert_eq!(badges[1].name, "bravo.sh");
    assert!(!badges[1].ok);

    tracker.clear(&root.join("triggers/bravo.sh"));
    let badges = scripts::trigger_badges(&root, &tracker);
    assert!(badges[1].ok);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_trigger_badges_empty_without_directory() {
    let tracker = FailureTracker::new();
    let badges = scripts::trigger_badges(Path::new("/nonexistent/beacon"), &tracker);
    assert!(badges.is_empty());
}

#[test]
fn test_failure_tracker_replaces_and_clears() {
    let tracker = FailureTracker::new();
    let script = Path::new("triggers/deploy.sh");

    tracker.record(script, "first");
    tracker.record(script, "second");
    assert_eq!(tracker.failure(script).unwrap(), "second");

    tracker.clear(script);
    assert!(tracker.failure(script).is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_state_summary_runs_scripts_and_flags_stderr() {
    use std::os::unix::fs::PermissionsExt;

    let root = temp_root("states");
    let script = root.join("states/10-status.sh");
    fs::write(&script, "#!/bin/sh\necho build ok\necho disk low >&2\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let summary = scripts::state_summary(&root).await;
    assert!(summary.contains("build ok"));
    assert!(summary.contains("<span class='state_bad'>disk low</span><br/>"));

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn test_state_summary_empty_without_directory() {
    let summary = scripts::state_summary(Path::new("/nonexistent/beacon")).await;
    assert!(summary.is_empty());
}
