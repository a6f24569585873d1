//! Trigger and state script discovery and execution.
//!
//! Two well-known directories under the configured scripts root:
//! `triggers/`, whose entries get a pass/fail badge on the page, and
//! `states/`, whose entries are executed on every page render with their
//! output folded into the summary section. Both directories are optional.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::process::Command;
use tracing::error;

/// Tracks which trigger scripts last failed, keyed by script path.
///
/// The execution side records and clears entries; the page side only asks
/// whether a failure is on record.
pub struct FailureTracker {
    failures: Mutex<HashMap<PathBuf, String>>,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Records a failure for `script`, replacing any earlier one.
    pub fn record(&self, script: impl Into<PathBuf>, reason: impl Into<String>) {
        self.failures
            .lock()
            .expect("failure map lock poisoned")
            .insert(script.into(), reason.into());
    }

    /// Clears the failure on record for `script`, if any.
    pub fn clear(&self, script: &Path) {
        self.failures
            .lock()
            .expect("failure map lock poisoned")
            .remove(script);
    }

    /// The recorded failure for `script`, if any.
    pub fn failure(&self, script: &Path) -> Option<String> {
        self.failures
            .lock()
            .expect("failure map lock poisoned")
            .get(script)
            .cloned()
    }
}

impl Default for FailureTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// One trigger script as shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBadge {
    pub name: String,
    pub ok: bool,
}

/// Lists the trigger scripts with their pass/fail state.
///
/// Missing or unreadable directory yields no badges. Badges are sorted by
/// name so the page is stable across renders.
pub fn trigger_badges(root: &Path, failures: &FailureTracker) -> Vec<ScriptBadge> {
    let dir = root.join("triggers");
    let mut badges = Vec::new();

    let Ok(entries) = std::fs::read_dir(&dir) else {
        return badges;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        badges.push(ScriptBadge {
            name: name.to_string_lossy().into_owned(),
            ok: failures.failure(&path).is_none(),
        });
    }
    badges.sort_by(|a, b| a.name.cmp(&b.name));
    badges
}

/// Runs every state script and folds their output into one summary string.
///
/// Stdout lines are appended as-is; stderr lines are wrapped in failure
/// spans so the page highlights them. A script that cannot be launched is
/// logged and skipped.
pub async fn state_summary(root: &Path) -> String {
    let dir = root.join("states");
    let mut summary = String::new();

    let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
        return summary;
    };
    let mut scripts = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.is_file() {
            scripts.push(path);
        }
    }
    scripts.sort();

    for script in scripts {
        match run_state_script(&script).await {
            Ok((stdout, stderr)) => {
                for line in stdout.lines() {
                    summary.push_str(line);
                    summary.push('\n');
                }
                for line in stderr.lines() {
                    summary.push_str("<span class='state_bad'>");
                    summary.push_str(line);
                    summary.push_str("</span><br/>");
                }
            }
            Err(e) => {
                error!("State script {} failed: {}", script.display(), e);
            }
        }
    }
    summary
}

async fn run_state_script(script: &Path) -> anyhow::Result<(String, String)> {
    let workdir = script.parent().unwrap_or(Path::new("."));
    let output = Command::new(script).current_dir(workdir).output().await?;
    Ok((
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_roundtrip() {
        let tracker = FailureTracker::new();
        let script = Path::new("triggers/deploy.sh");

        assert!(tracker.failure(script).is_none());

        tracker.record(script, "exit status 1");
        assert_eq!(tracker.failure(script).unwrap(), "exit status 1");

        tracker.clear(script);
        assert!(tracker.failure(script).is_none());
    }

    #[test]
    fn badges_empty_without_directory() {
        let tracker = FailureTracker::new();
        let badges = trigger_badges(Path::new("/nonexistent/beacon"), &tracker);
        assert!(badges.is_empty());
    }
}
