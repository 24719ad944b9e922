use clap::Parser;
use env_logger::Env;
use log::debug;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod libquiz;

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "gui")]
mod gui;

use crate::libquiz::agent::Difficulty;
use crate::libquiz::config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "Quiz Master")]
#[command(version, about, long_about = None)]
struct Args {
    /// Study text to quiz on. Reads stdin when omitted (CLI build); the GUI
    /// build starts with an empty text box instead.
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=5))]
    question_count: u32,
    /// Chat-completion endpoint URL. Falls back to LLM_ENDPOINT, then the default gateway.
    #[arg(long)]
    endpoint: Option<String>,
    /// Model identifier sent with each request. Falls back to LLM_MODEL.
    #[arg(short, long)]
    model: Option<String>,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("cannot read the study text: {0}")]
    InputRead(#[from] io::Error),
    #[cfg(feature = "gui")]
    #[error("cannot start the GUI: {0}")]
    Gui(#[from] eframe::Error),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();
    debug!("[Setup] Args: {:?}", args);

    let config = Config::from_env(args.endpoint, args.model)?;

    cfg_if::cfg_if! {
        if #[cfg(feature = "gui")] {
            let text = match &args.file {
                Some(path) => std::fs::read_to_string(path)?,
                None => String::new(),
            };
            gui::init_gui(config, text, args.question_count, args.difficulty)?;
        } else if #[cfg(feature = "cli")] {
            let text = read_study_text(args.file)?;
            cli::run(&config, &text, args.question_count, args.difficulty);
        } else {
            compile_error!("enable at least one of the `gui` or `cli` features");
        }
    }

    Ok(())
}

#[cfg(all(feature = "cli", not(feature = "gui")))]
fn read_study_text(file: Option<PathBuf>) -> Result<String, Error> {
    use std::io::Read;
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
