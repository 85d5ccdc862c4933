// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line surface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::app::DocSynth;
use crate::config::DocSynthConfig;

/// Documentation-backed code answers
#[derive(Parser, Debug)]
#[command(name = "docsynth")]
#[command(version = crate::version::VERSION)]
#[command(about = "Learn documentation topics and synthesize validated code answers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover and index tutorial pages for a topic
    Learn {
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },

    /// Learn a topic, then answer it with the best corroborated snippet
    Codehelp {
        /// Language of the wanted snippet (only python is executed)
        language: String,

        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,

        /// Caller id recorded on review entries
        #[arg(long, env = "DOCSYNTH_CHAT_ID", default_value = "cli")]
        chat_id: String,
    },

    /// Run a source file through the sandbox validator
    Validate {
        language: String,
        file: PathBuf,
    },

    /// Show discovery results for a query
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute CLI command
pub async fn execute(cli: Cli, config: DocSynthConfig) -> Result<()> {
    config.validate()?;
    let app = DocSynth::new(config).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Learn { topic } => {
            let report = app.learn(&topic.join(" ")).await?;
            print_json(&report)
        }
        Commands::Codehelp {
            language,
            topic,
            chat_id,
        } => {
            let topic = topic.join(" ");
            // The index lives in memory, so each run learns before answering
            let learned = app.learn(&format!("{} {}", language, topic)).await?;
            info!("Indexed {} pages before answering", learned.crawled);

            let answer = app.codehelp(&chat_id, &language, &topic).await?;
            print_json(&answer)
        }
        Commands::Validate { language, file } => {
            let code = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let report = app.validate(&code, &language).await;
            print_json(&report)
        }
        Commands::Search { query } => {
            let response = app.search(&query.join(" ")).await?;
            print_json(&response)
        }
    }
}
