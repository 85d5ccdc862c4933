// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sandboxed validation of candidate snippets
//!
//! Two steps, each in its own resource-limited child process, sharing one
//! wall-clock budget of `timeout_ms`:
//! 1. syntax check: the interpreter parses the source into an AST without
//!    running it; a parse error ends validation
//! 2. execution: the source is written into a private temp directory and run
//!
//! Infrastructure failures (spawn errors, missing interpreter) are folded
//! into the report as a failed execution; `validate` never errors.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::config::SandboxConfig;
use super::language::SandboxLanguage;
use super::process::{run_limited, ProcessLimits, SandboxCommand};
use super::types::{ProcessOutput, SandboxError, ValidationReport};
use crate::utils::truncate_chars;

/// Parses stdin as Python and reports the first syntax error on stdout
const PYTHON_SYNTAX_CHECK: &str = r#"import ast, sys
source = sys.stdin.buffer.read().decode("utf-8", "replace")
try:
    ast.parse(source, "<candidate>")
except (SyntaxError, ValueError) as exc:
    sys.stdout.write(str(exc) or type(exc).__name__)
    sys.exit(3)
"#;

const SYNTAX_ERROR_EXIT: i32 = 3;

/// Bytes of each stream retained while the child runs
const CAPTURE_BYTES: usize = 64 * 1024;

/// Validates candidates by static check and isolated execution
#[derive(Debug, Clone)]
pub struct SandboxValidator {
    config: SandboxConfig,
}

impl SandboxValidator {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Limits for a child that must finish by `deadline`
    fn limits_until(&self, deadline: Instant) -> ProcessLimits {
        ProcessLimits {
            wall_time: deadline.saturating_duration_since(Instant::now()),
            memory_bytes: self.config.memory_limit_bytes,
            capture_bytes: CAPTURE_BYTES,
        }
    }

    fn clip(&self, text: &str) -> String {
        truncate_chars(text, self.config.max_output_chars).to_string()
    }

    /// Validate `code` as `language`.
    ///
    /// Languages the sandbox cannot execute get a report carrying only the tag.
    pub async fn validate(&self, code: &str, language: &str) -> ValidationReport {
        let mut report = ValidationReport::for_language(language);

        let Some(lang) = SandboxLanguage::parse(language) else {
            debug!("No sandbox for language '{}', skipping validation", language);
            return report;
        };

        let deadline = Instant::now() + self.config.timeout();

        match self.check_syntax(lang, code, deadline).await {
            Ok(Some(error)) => {
                debug!("Candidate rejected by syntax check: {}", error);
                report.syntax_error = Some(self.clip(&error));
                return report;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Sandbox syntax check failed: {}", e);
                report.exec_ok = Some(false);
                report.stderr = self.clip(&format!("Sandbox error: {}", e));
                return report;
            }
        }

        if deadline.saturating_duration_since(Instant::now()) == Duration::ZERO {
            warn!("Syntax check used the whole sandbox budget, not executing");
            report.exec_ok = Some(false);
            report.timed_out = true;
            report.stderr = "Timed out".to_string();
            return report;
        }

        match self.execute(lang, code, deadline).await {
            Ok(output) => {
                info!(
                    "Sandbox run finished: success={} timed_out={} exit={:?}",
                    output.success, output.timed_out, output.exit_code
                );
                report.exec_ok = Some(output.success && !output.timed_out);
                report.stdout = self.clip(&output.stdout);
                report.stderr = if output.timed_out && output.stderr.trim().is_empty() {
                    "Timed out".to_string()
                } else {
                    self.clip(&output.stderr)
                };
                report.timed_out = output.timed_out;
            }
            Err(e) => {
                warn!("Sandbox execution failed: {}", e);
                report.exec_ok = Some(false);
                report.stderr = self.clip(&format!("Sandbox error: {}", e));
            }
        }

        report
    }

    /// Parse without executing; `Ok(Some(msg))` is a syntax error
    pub async fn check_syntax(
        &self,
        lang: SandboxLanguage,
        code: &str,
        deadline: Instant,
    ) -> Result<Option<String>, SandboxError> {
        match lang {
            SandboxLanguage::Python => {
                let command = SandboxCommand::new(&self.config.python_bin)
                    .arg("-I")
                    .arg("-c")
                    .arg(PYTHON_SYNTAX_CHECK)
                    .stdin(code.as_bytes().to_vec());
                let output = run_limited(command, self.limits_until(deadline)).await?;
                interpret_syntax_check(output)
            }
        }
    }

    /// Run the candidate in a fresh private workspace, killed at `deadline`
    pub async fn execute(
        &self,
        lang: SandboxLanguage,
        code: &str,
        deadline: Instant,
    ) -> Result<ProcessOutput, SandboxError> {
        // Removed on drop, after the child has been reaped
        let workspace = tempfile::Builder::new()
            .prefix("docsynth-sandbox-")
            .tempdir()
            .map_err(SandboxError::Workspace)?;
        let source = workspace.path().join(lang.source_file());
        tokio::fs::write(&source, code)
            .await
            .map_err(SandboxError::WriteSource)?;

        let command = match lang {
            SandboxLanguage::Python => SandboxCommand::new(&self.config.python_bin)
                .arg("-I")
                .arg("-B")
                .arg(source.as_os_str())
                .workdir(workspace.path()),
        };

        run_limited(command, self.limits_until(deadline)).await
    }
}

impl Default for SandboxValidator {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

fn interpret_syntax_check(output: ProcessOutput) -> Result<Option<String>, SandboxError> {
    if output.timed_out {
        return Err(SandboxError::SyntaxCheck("timed out".to_string()));
    }
    if output.success {
        return Ok(None);
    }
    if output.exit_code == Some(SYNTAX_ERROR_EXIT) {
        let message = output.stdout.trim();
        return Ok(Some(if message.is_empty() {
            "invalid syntax".to_string()
        } else {
            message.to_string()
        }));
    }
    Err(SandboxError::SyntaxCheck(format!(
        "exit {:?}: {}",
        output.exit_code,
        output.stderr.trim()
    )))
}
