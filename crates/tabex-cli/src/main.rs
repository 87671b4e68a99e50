//! tabex command-line tool.

use clap::Parser;
use tabex_cli::cli::{Cli, Command};
use tabex_cli::commands::{run_export, run_formats, run_render};
use tabex_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Formats => run_formats(),
        Command::Render(args) => run_render(args).map(|_| ()),
        Command::Export(args) => run_export(args).map(|_| ()),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
