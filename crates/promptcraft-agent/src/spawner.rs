use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

use crate::{BackendConfig, BackendError};

/// Output captured from a backend process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Utility for spawning backend processes
pub struct ProcessSpawner;

impl ProcessSpawner {
    /// Run `binary` to completion and capture its output, honoring the
    /// configured timeout
    pub async fn spawn(
        binary: &Path,
        args: &[&str],
        config: &BackendConfig,
    ) -> Result<ProcessOutput, BackendError> {
        let start = Instant::now();

        debug!(
            binary = %binary.display(),
            arg_count = args.len(),
            working_dir = %config.working_dir.display(),
            "Spawning backend process"
        );

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .current_dir(&config.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null()) // Non-interactive
            .kill_on_drop(true);

        for (key, value) in &config.env_vars {
            cmd.env(key, value);
        }

        let child = cmd.spawn()?;
        let output = match config.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| BackendError::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(
            exit_code,
            duration_ms = duration.as_millis() as u64,
            "Backend process completed"
        );

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            duration,
        })
    }
}
