// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for docsynth

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent with every outbound page fetch
pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; docsynth/",
    env!("CARGO_PKG_VERSION"),
    ")"
);
