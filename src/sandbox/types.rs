// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for sandboxed validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of validating one candidate snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Language tag the candidate was validated as
    pub language: String,
    /// Parser error message; execution is skipped when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_error: Option<String>,
    /// Whether the run exited successfully; None when nothing was executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_ok: Option<bool>,
    /// Captured stdout, truncated
    pub stdout: String,
    /// Captured stderr, truncated
    pub stderr: String,
    /// Whether the run was killed at the wall-clock deadline
    pub timed_out: bool,
}

impl ValidationReport {
    /// A report carrying only the language tag
    pub fn for_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
            syntax_error: None,
            exec_ok: None,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    pub fn has_syntax_error(&self) -> bool {
        self.syntax_error.is_some()
    }

    /// Execution was attempted and did not succeed (includes timeouts)
    pub fn execution_failed(&self) -> bool {
        self.exec_ok == Some(false)
    }
}

/// Raw result of one sandboxed child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit status was success; false when killed or timed out
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Sandbox infrastructure failures; never surfaced past the validator
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to create private workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to write candidate source: {0}")]
    WriteSource(#[source] std::io::Error),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("syntax check did not complete: {0}")]
    SyntaxCheck(String),
}
