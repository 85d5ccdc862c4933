// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sandboxed execution of untrusted candidate code
//!
//! Guarantees:
//! - the host never waits longer than the configured timeout (plus a short
//!   reaping grace) for a child
//! - the child's address space is capped before it runs user code
//!
//! Not guaranteed: filesystem or network isolation. The child sees the
//! host's default view; anything stronger needs namespaces or seccomp
//! around [`process::run_limited`].

pub mod config;
pub mod language;
pub mod process;
pub mod types;
pub mod validator;

pub use config::SandboxConfig;
pub use language::{is_executable, SandboxLanguage};
pub use process::{run_limited, ProcessLimits, SandboxCommand};
pub use types::{ProcessOutput, SandboxError, ValidationReport};
pub use validator::SandboxValidator;
