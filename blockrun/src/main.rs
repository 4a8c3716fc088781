//! Interactive runner for named, schema-validated database blocks.

use std::path::PathBuf;

use blockrun::io::prompt::TerminalPrompt;
use blockrun::start::{StartOptions, start_session};
use blockrun::{exit_codes, logging};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "blockrun",
    version,
    about = "Interactive runner for named, schema-validated database blocks"
)]
struct Cli {
    /// Config file path; defaults to `blockrun.toml` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    println!("blockrun\n");

    let options = StartOptions {
        config_path: cli.config,
        ..StartOptions::default()
    };
    let mut prompt = TerminalPrompt::new();
    match start_session(options, &mut prompt) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}
