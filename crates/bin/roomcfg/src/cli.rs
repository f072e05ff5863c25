//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use roomcfg_domain::action::{ActionKind, FieldKey};
use roomcfg_domain::id::RoomId;
use roomcfg_domain::room::Phase;

#[derive(Debug, Parser)]
#[command(author, version, about = "Edit room automation configurations", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "roomcfg.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the configuration of a room
    Show {
        room: RoomId,
        /// Print the editor read model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration of a room without changing it
    Check { room: RoomId },
    /// Append an action to a phase and save
    Add {
        room: RoomId,
        /// `startup` or `shutdown`
        phase: Phase,
        #[command(flatten)]
        edit: ActionEdit,
    },
    /// Change an existing action and save
    Edit {
        room: RoomId,
        phase: Phase,
        /// Position of the action, starting at 1, as printed by `show`
        index: usize,
        #[command(flatten)]
        edit: ActionEdit,
    },
    /// Remove an action and save
    Remove {
        room: RoomId,
        phase: Phase,
        /// Position of the action, starting at 1, as printed by `show`
        index: usize,
    },
}

/// Changes applied to one action.
#[derive(Debug, Clone, Default, Args)]
pub struct ActionEdit {
    /// New kind of the action
    #[arg(long)]
    pub kind: Option<ActionKind>,

    /// Field assignment, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(FieldKey, String)>,
}

fn parse_assignment(raw: &str) -> Result<(FieldKey, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim().parse::<FieldKey>().map_err(|err| err.to_string())?;
    Ok((key, value.to_string()))
}
