// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Languages the sandbox can execute

/// An executable sandbox language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxLanguage {
    Python,
}

impl SandboxLanguage {
    /// Resolve a free-form language tag (case-insensitive)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "python" | "python3" | "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
        }
    }

    /// Source file name used inside the private workspace
    pub fn source_file(&self) -> &'static str {
        match self {
            Self::Python => "candidate.py",
        }
    }
}

/// Whether `tag` names a language the sandbox executes
pub fn is_executable(tag: &str) -> bool {
    SandboxLanguage::parse(tag).is_some()
}
