use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    ci::{self, CiCommand},
    eval::{self, EvalArgs},
};
use config::CalcConfig;

mod commands;
mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "calc", version, about = "Arithmetic calculator and CI pipeline tooling")]
struct Cli {
    /// TOML configuration file; defaults to `calc.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one arithmetic operation to two operands.
    Eval(EvalArgs),
    /// Render, check or evaluate the CI pipeline declaration.
    #[command(subcommand)]
    Ci(CiCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config = CalcConfig::load(cli.config.as_deref(), &cwd)?;
    logging::init_with_config(&config.logging);
    match cli.command {
        Command::Eval(args) => eval::run(&args),
        Command::Ci(command) => ci::run(&command, &config),
    }
}
