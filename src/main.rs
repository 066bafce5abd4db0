//! Command-line entry point for `dtb-selector`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dtb_selector::{cli, commands, logging};

/// Exit status after Ctrl-C, as a shell reports for SIGINT.
const INTERRUPTED: i32 = 130;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args.command_or_default();
    let name = command.name();

    ctrlc::set_handler(|| {
        println!("\nCancelled, bye!");
        std::process::exit(INTERRUPTED);
    })?;

    match command {
        cli::Command::Completions(opts) => {
            commands::completions::run(opts.shell);
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
        cli::Command::List(opts) => commands::list::run(&args.global, &opts),
        cli::Command::Check => {
            logging::init_subscriber(args.verbose, name);
            let log = logging::Logger::new(name);
            commands::check::run(&args.global, &log)
        }
        cli::Command::Deploy(opts) => {
            logging::init_subscriber(args.verbose, name);
            let log = Arc::new(logging::Logger::new(name));
            commands::deploy::run(&args.global, &opts, &log)
        }
    }
}
