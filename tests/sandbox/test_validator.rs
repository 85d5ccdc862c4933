// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SandboxValidator against a real Python interpreter
//!
//! Every test returns early when `python3` is not on PATH.

use docsynth::sandbox::{SandboxConfig, SandboxValidator};
use std::time::{Duration, Instant};

fn python_available() -> bool {
    let found = std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !found {
        eprintln!("python3 not found on PATH, skipping sandbox test");
    }
    found
}

#[tokio::test]
async fn test_valid_code_runs() {
    if !python_available() {
        return;
    }
    let report = SandboxValidator::default().validate("print(1+1)", "python").await;

    assert!(report.syntax_error.is_none());
    assert_eq!(report.exec_ok, Some(true));
    assert!(report.stdout.contains('2'));
    assert!(!report.timed_out);
}

#[tokio::test]
async fn test_syntax_error_skips_execution() {
    if !python_available() {
        return;
    }
    let report = SandboxValidator::default()
        .validate("def f(:\n    pass", "Python")
        .await;

    assert!(report.syntax_error.is_some());
    assert_eq!(report.exec_ok, None);
    assert!(report.stdout.is_empty());
}

#[tokio::test]
async fn test_syntax_check_does_not_execute() {
    if !python_available() {
        return;
    }
    // A valid program with a side effect followed by a parse error
    let report = SandboxValidator::default()
        .validate("print('ran')\nx = (", "py")
        .await;

    assert!(report.syntax_error.is_some());
    assert!(!report.stdout.contains("ran"));
}

#[tokio::test]
async fn test_runtime_error_reported() {
    if !python_available() {
        return;
    }
    let report = SandboxValidator::default()
        .validate("raise ValueError('boom')", "python")
        .await;

    assert_eq!(report.exec_ok, Some(false));
    assert!(report.stderr.contains("ValueError"));
    assert!(!report.timed_out);
}

#[tokio::test]
async fn test_infinite_loop_times_out() {
    if !python_available() {
        return;
    }
    let config = SandboxConfig {
        timeout_ms: 1_000,
        ..SandboxConfig::default()
    };
    let validator = SandboxValidator::new(config);

    let start = Instant::now();
    let report = validator.validate("while True:\n    pass", "python").await;

    assert!(report.timed_out);
    assert_eq!(report.exec_ok, Some(false));
    assert_eq!(report.stderr, "Timed out");
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_partial_output_kept_on_timeout() {
    if !python_available() {
        return;
    }
    let config = SandboxConfig {
        timeout_ms: 1_000,
        ..SandboxConfig::default()
    };
    let code = "import sys, time\nprint('started')\nsys.stdout.flush()\nwhile True:\n    time.sleep(0.05)";
    let report = SandboxValidator::new(config).validate(code, "python").await;

    assert!(report.timed_out);
    assert!(report.stdout.contains("started"));
}

#[tokio::test]
async fn test_memory_ceiling_enforced() {
    if !python_available() {
        return;
    }
    // 512 MiB allocation against the default 128 MiB ceiling
    let report = SandboxValidator::default()
        .validate("x = bytearray(512 * 1024 * 1024)\nprint('allocated')", "python")
        .await;

    assert_eq!(report.exec_ok, Some(false));
    assert!(!report.stdout.contains("allocated"));
}

#[tokio::test]
async fn test_output_truncated() {
    if !python_available() {
        return;
    }
    let report = SandboxValidator::default()
        .validate("print('x' * 10000)", "python")
        .await;

    assert_eq!(report.exec_ok, Some(true));
    assert_eq!(report.stdout.chars().count(), 2000);
}

#[tokio::test]
async fn test_unsupported_language_not_executed() {
    let report = SandboxValidator::default()
        .validate("console.log(1)", "javascript")
        .await;

    assert_eq!(report.language, "javascript");
    assert!(report.syntax_error.is_none());
    assert_eq!(report.exec_ok, None);
}
