//! Prediction invoker
//!
//! Runs the external predictive computation and classifies its outcome:
//! - script missing: [`InvokeError::NotFound`]
//! - non-zero exit: [`InvokeError::ExecutionFailure`] with stderr verbatim
//! - stdout not JSON: [`InvokeError::InvalidOutput`] with stdout verbatim
//! - otherwise the captured stdout, byte for byte
//!
//! Every call spawns a fresh process. Runs are gated by a semaphore and
//! bounded by an optional timeout; a timed-out child is killed.

use crate::config::PredictorConfig;
use serde::de::IgnoredAny;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Prediction invocation errors
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The computation's script is absent
    #[error("Prediction script not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The process exited non-zero
    #[error("Prediction script execution failed.")]
    ExecutionFailure { stderr: String, status: Option<i32> },

    /// Exit was zero but stdout is not JSON
    #[error("Invalid JSON output from script.")]
    InvalidOutput { raw_output: String },

    /// The process outlived the configured limit and was killed
    #[error("Prediction script timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    /// The process could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker gate was closed
    #[error("Prediction workers are shutting down")]
    Unavailable,
}

/// Result type for invocations
pub type InvokeResult<T> = Result<T, InvokeError>;

/// Outcome of one process run. Discarded once classified.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub exit_success: bool,
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessResult {
    /// Classify a finished run into the relayed artifact or an error.
    ///
    /// The returned bytes are stdout exactly as captured.
    pub fn into_artifact(self) -> InvokeResult<Vec<u8>> {
        if !self.exit_success {
            return Err(InvokeError::ExecutionFailure {
                stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
                status: self.status,
            });
        }

        if serde_json::from_slice::<IgnoredAny>(&self.stdout).is_err() {
            return Err(InvokeError::InvalidOutput {
                raw_output: String::from_utf8_lossy(&self.stdout).into_owned(),
            });
        }

        Ok(self.stdout)
    }
}

/// Runs the predictive computation on demand
#[derive(Debug)]
pub struct PredictionInvoker {
    script_path: PathBuf,
    interpreter: Option<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    permits: Arc<Semaphore>,
}

impl PredictionInvoker {
    pub fn new(config: &PredictorConfig) -> Self {
        let interpreter = config.interpreter.trim();
        Self {
            script_path: config.resolved_script_path(),
            interpreter: (!interpreter.is_empty()).then(|| interpreter.to_string()),
            working_dir: config.working_dir(),
            timeout: config.timeout(),
            permits: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Override the run time limit
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Number of runs that could start right now without waiting
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run the computation once and return its validated stdout.
    #[instrument(skip(self), fields(invocation_id = %uuid::Uuid::new_v4(), script = %self.script_path.display()))]
    pub async fn predict(&self) -> InvokeResult<Vec<u8>> {
        if tokio::fs::metadata(&self.script_path).await.is_err() {
            warn!("Prediction script missing");
            return Err(InvokeError::NotFound {
                path: self.script_path.clone(),
            });
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| InvokeError::Unavailable)?;

        let started = Instant::now();
        let result = self.run().await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            exit_success = result.exit_success,
            status = ?result.status,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            elapsed_ms,
            "Prediction script finished"
        );

        result.into_artifact()
    }

    async fn run(&self) -> InvokeResult<ProcessResult> {
        let mut command = self.command();
        let program = command.as_std().get_program().to_string_lossy().into_owned();

        debug!(program = %program, "Spawning prediction script");

        let child = command.spawn().map_err(|source| InvokeError::Spawn {
            program: program.clone(),
            source,
        })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it.
                    warn!(timeout_ms = limit.as_millis() as u64, "Prediction script timed out");
                    return Err(InvokeError::Timeout { timeout: limit });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|source| InvokeError::Spawn { program, source })?;

        Ok(ProcessResult {
            exit_success: output.status.success(),
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn command(&self) -> Command {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut c = Command::new(interpreter);
                c.arg(&self.script_path);
                c
            }
            None => Command::new(&self.script_path),
        };

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}
