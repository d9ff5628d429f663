pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "frajola",
    about = "Frajola pizzeria chat assistant",
    long_about = "Talk to the Frajola ordering assistant, replay scripted conversations, \
                  and inspect the menu and effective configuration.",
    after_help = "Examples:\n  frajola chat\n  frajola replay \"oi\" \"quanto custa a margherita?\"\n  \
                  frajola menu --all\n  frajola config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive conversation on stdin/stdout (type `sair` to leave)")]
    Chat,
    #[command(about = "Feed messages to a fresh conversation and print the transcript as JSON")]
    Replay {
        #[arg(required = true, help = "User messages, one per turn")]
        messages: Vec<String>,
    },
    #[command(about = "Print the menu the assistant answers from")]
    Menu {
        #[arg(long, help = "Include items currently marked unavailable")]
        all: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Replay { messages } => commands::replay::run(&messages),
        Command::Menu { all } => commands::menu::run(all),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
