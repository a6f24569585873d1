//! Interface boundary of the polled background job.
//!
//! The reporter only needs to ask whether the job is running, fetch its
//! state and latest output, and trigger a run. [`CommandJob`] is a small
//! default implementation that shells out to a configured command so the
//! binary works out of the box; a real deployment supplies its own
//! [`JobStatus`].

use std::sync::{Arc, Mutex};

use tokio::process::Command;
use tracing::{error, info};

/// What the status page needs to know about the background job.
pub trait JobStatus: Send + Sync + 'static {
    /// Whether a run is currently in progress.
    fn is_running(&self) -> bool;

    /// Short human-readable state line shown in the top bar.
    fn state(&self) -> String;

    /// Output of the most recent run.
    fn output(&self) -> String;

    /// Starts a run now. Must be safe to call while a run is in progress.
    fn force_run(&self);
}

struct JobInner {
    running: bool,
    state: String,
    output: String,
}

/// Runs a configured shell command on demand and captures its output.
pub struct CommandJob {
    command: String,
    inner: Arc<Mutex<JobInner>>,
}

impl CommandJob {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            inner: Arc::new(Mutex::new(JobInner {
                running: false,
                state: "Idle".to_string(),
                output: String::new(),
            })),
        }
    }
}

impl JobStatus for CommandJob {
    fn is_running(&self) -> bool {
        self.inner.lock().expect("job state lock poisoned").running
    }

    fn state(&self) -> String {
        self.inner.lock().expect("job state lock poisoned").state.clone()
    }

    fn output(&self) -> String {
        self.inner.lock().expect("job state lock poisoned").output.clone()
    }

    fn force_run(&self) {
        {
            let mut inner = self.inner.lock().expect("job state lock poisoned");
            if inner.running {
                info!("Run already in progress, ignoring trigger");
                return;
            }
            inner.running = true;
            inner.state = "Running".to_string();
        }

        let command = self.command.clone();
        let state = Arc::clone(&self.inner);
        tokio::spawn(async move {
            info!("Running job command: {}", command);
            let result = Command::new("sh").arg("-c").arg(&command).output().await;

            let mut inner = state.lock().expect("job state lock poisoned");
            inner.running = false;
            match result {
                Ok(out) => {
                    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                    if !out.stderr.is_empty() {
                        text.push_str(&String::from_utf8_lossy(&out.stderr));
                    }
                    inner.output = text;
                    inner.state = if out.status.success() {
                        "Idle (last run succeeded)".to_string()
                    } else {
                        format!("Idle (last run failed: {})", out.status)
                    };
                }
                Err(e) => {
                    error!("Failed to launch job command: {}", e);
                    inner.state = format!("Idle (could not launch command: {})", e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_job_starts_idle() {
        let job = CommandJob::new("true");
        assert!(!job.is_running());
        assert_eq!(job.state(), "Idle");
        assert_eq!(job.output(), "");
    }
}
