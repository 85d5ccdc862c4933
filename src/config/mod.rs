// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Aggregate configuration
//!
//! Each module owns its config struct; this gathers them so the binary can
//! load everything from the environment in one call and fail fast on bad
//! values.

use thiserror::Error;

use crate::fetch::FetchConfig;
use crate::sandbox::SandboxConfig;
use crate::search::SearchConfig;
use crate::synthesis::SynthesisConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {section} configuration: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

fn section(name: &'static str, result: Result<(), String>) -> Result<(), ConfigError> {
    result.map_err(|message| ConfigError::Invalid {
        section: name,
        message,
    })
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default)]
pub struct DocSynthConfig {
    pub fetch: FetchConfig,
    pub sandbox: SandboxConfig,
    pub search: SearchConfig,
    pub synthesis: SynthesisConfig,
}

impl DocSynthConfig {
    /// Load every section from `DOCSYNTH_*` environment variables
    pub fn from_env() -> Self {
        Self {
            fetch: FetchConfig::from_env(),
            sandbox: SandboxConfig::from_env(),
            search: SearchConfig::from_env(),
            synthesis: SynthesisConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        section("fetch", self.fetch.validate())?;
        section("sandbox", self.sandbox.validate())?;
        section("search", self.search.validate())?;
        section("synthesis", self.synthesis.validate())?;
        Ok(())
    }
}
