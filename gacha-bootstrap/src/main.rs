use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use gacha_bootstrap::{init_logging, present, start_session, SessionOptions};
use gacha_interfaces_console::{ConsoleOutcome, DisplayOptions};

#[derive(Parser, Debug)]
#[command(name = "wuthering-gacha")]
#[command(about = "Wuthering Waves convene history and pity statistics", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read this log file instead of looking for the running game client
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print pool summaries as JSON
    #[arg(long)]
    json: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Directory for the debug log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(ConsoleOutcome::Populated) => ExitCode::SUCCESS,
        Ok(ConsoleOutcome::Failed) => ExitCode::from(1),
        Ok(ConsoleOutcome::Cancelled) => ExitCode::from(130),
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<ConsoleOutcome> {
    let _guard = init_logging(&args.log_dir)?;

    let options = DisplayOptions {
        enable_color: !args.no_color,
        json: args.json,
    };
    let handle = start_session(SessionOptions {
        config_path: args.config,
        log_file: args.log_file,
    })?;

    present(handle, &options)
}
