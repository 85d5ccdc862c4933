// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for sandboxed execution

use std::env;
use std::time::Duration;

/// Configuration for the sandboxed validator
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Wall-clock budget for one validation in milliseconds (default: 3000)
    pub timeout_ms: u64,
    /// Address-space ceiling applied inside the child (default: 128 MiB)
    pub memory_limit_bytes: u64,
    /// Interpreter binary used for the supported language (default: python3)
    pub python_bin: String,
    /// Characters of stdout/stderr kept in the report (default: 2000)
    pub max_output_chars: usize,
}

impl SandboxConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_ms: env::var("DOCSYNTH_SANDBOX_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            memory_limit_bytes: env::var("DOCSYNTH_SANDBOX_MEM_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.memory_limit_bytes),
            python_bin: env::var("DOCSYNTH_PYTHON_BIN").unwrap_or(defaults.python_bin),
            max_output_chars: defaults.max_output_chars,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be at least 1".to_string());
        }
        if self.memory_limit_bytes < 16 * 1024 * 1024 {
            return Err("memory_limit_bytes must be at least 16 MiB".to_string());
        }
        if self.python_bin.trim().is_empty() {
            return Err("python_bin must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            memory_limit_bytes: 128 * 1024 * 1024,
            python_bin: "python3".to_string(),
            max_output_chars: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_config_defaults() {
        let config = SandboxConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.memory_limit_bytes, 134_217_728);
        assert_eq!(config.python_bin, "python3");
        assert_eq!(config.max_output_chars, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sandbox_config_validation() {
        let mut config = SandboxConfig::default();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());

        config.timeout_ms = 100;
        config.memory_limit_bytes = 1024;
        assert!(config.validate().is_err());

        config.memory_limit_bytes = 64 * 1024 * 1024;
        config.python_bin = " ".to_string();
        assert!(config.validate().is_err());
    }
}
