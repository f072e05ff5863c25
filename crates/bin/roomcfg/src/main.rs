//! # roomcfg — room configuration editor
//!
//! Composition root that wires the HTTP room store into an editor session
//! and exposes it as an operator CLI.
//!
//! ## Responsibilities
//! - Parse CLI arguments, configuration file and env vars
//! - Initialise logging
//! - Construct the room store adapter with the configured credentials
//! - Run the requested subcommand through an `EditorSession`
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod commands;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use roomcfg_adapter_http::{HttpRoomStore, StaticToken};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let credentials = StaticToken::new(config.auth.token.clone());
    let store = HttpRoomStore::new(&config.api, credentials)?;

    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, store, &mut stdout).await
}
