//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfile symlink manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Keep dotfile symlinks in agreement with a declarative sync file",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Config file to use [default: $HOME/.dotlink.yaml]
    #[arg(short = 'c', long = "conf", env = "DOTLINK_CONFIG", global = true)]
    pub conf: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record the sync file of a dotfiles directory in the config
    Init(InitOpts),
    /// Register a new source -> target mapping in the sync file
    Add(AddOpts),
    /// Create or repair every symlink listed in the sync file
    Sync(SyncOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Add(_) => "add",
            Self::Sync(_) => "sync",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Directory containing the sync file [default: current directory]
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Create an empty sync file if none exists
    #[arg(long)]
    pub create: bool,
}

/// Options for the `add` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AddOpts {
    /// Path the symlink points to (relative paths resolve against the sync file's directory)
    #[arg(short, long)]
    pub source: String,

    /// Path where the symlink is created
    #[arg(short, long)]
    pub target: String,
}

/// Options for the `sync` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}
