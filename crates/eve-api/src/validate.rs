//! # External Configuration Validation
//!
//! Full semantic validation is delegated to the framework's own CLI. The
//! document is written into a fresh temporary directory as `config.yaml`
//! together with a `secrets.yaml` that satisfies every `!secret NAME`
//! reference with a dummy value, then `<cmd> config <path>` is run with a
//! timeout and its exit status and output are reported verbatim.

use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Value substituted for every referenced secret.
pub const DUMMY_SECRET: &str = "__eve_dummy__";

/// Default time allowed for one validator run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static SECRET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!secret\s+([A-Za-z0-9_.-]+)").expect("valid regex"));

/// Error running the external validator.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The configured command could not be found.
    #[error("validator command '{0}' is not installed")]
    CommandMissing(String),

    /// The command did not finish in time.
    #[error("validator did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    /// Temporary files or process plumbing failed.
    #[error("validator io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one validator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationReport {
    /// Whether the command exited with status 0.
    pub ok: bool,
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `-1` when the process was killed by a signal.
    pub returncode: i32,
}

/// Sorted, unique secret names referenced by `!secret NAME`.
pub fn secret_names(yaml: &str) -> Vec<String> {
    let mut names: Vec<String> = SECRET_RE
        .captures_iter(yaml)
        .map(|c| c[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// `secrets.yaml` body mapping each name to [`DUMMY_SECRET`].
pub fn dummy_secrets(names: &[String]) -> String {
    names
        .iter()
        .map(|k| format!("{k}: \"{DUMMY_SECRET}\"\n"))
        .collect()
}

/// Runs the framework CLI against a document.
#[derive(Debug, Clone)]
pub struct ExternalValidator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalValidator {
    /// `command` is split on whitespace; the first word is the program and
    /// the rest are leading arguments (e.g. `python3 -m esphome`).
    pub fn new(command: &str) -> Self {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_else(|| "esphome".to_string());
        Self {
            program,
            args: words.collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Validate a document. A non-zero exit is a successful run with
    /// `ok: false`; only failing to run the command is an error.
    pub async fn validate(&self, yaml: &str) -> Result<ValidationReport, ValidateError> {
        let dir = tempfile::Builder::new().prefix("eve-").tempdir()?;
        let config_path = dir.path().join("config.yaml");
        tokio::fs::write(&config_path, yaml).await?;

        let secrets = secret_names(yaml);
        if !secrets.is_empty() {
            tokio::fs::write(dir.path().join("secrets.yaml"), dummy_secrets(&secrets)).await?;
        }

        let report = self.run(&config_path).await;
        // Keep the directory alive until the process is done with it.
        drop(dir);
        report
    }

    async fn run(&self, config_path: &Path) -> Result<ValidationReport, ValidateError> {
        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg("config")
            .arg(config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ValidateError::CommandMissing(self.program.clone()),
                _ => ValidateError::Io(e),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ValidateError::Timeout(self.timeout))??;

        let returncode = output.status.code().unwrap_or(-1);
        tracing::info!(program = %self.program, returncode, "external validation finished");
        Ok(ValidationReport {
            ok: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            returncode,
        })
    }
}
