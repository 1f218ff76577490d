//! `dotlink` command-line entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::logging::{self, Log, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, args.command.name());
    let logger = Arc::new(Logger::new(args.command.name()));
    let log: Arc<dyn Log> = logger.clone();

    let result = match args.command {
        Command::Init(ref opts) => commands::init::run(&args.global, opts, &log).map(drop),
        Command::Add(ref opts) => commands::add::run(&args.global, opts, &log).map(drop),
        Command::Sync(ref opts) => commands::sync::run(&args.global, opts, &log),
        Command::Version => Ok(()),
    };

    if let Some(path) = logger.log_file() {
        log.debug(&format!("log written to {}", path.display()));
    }
    result
}
