use anyhow::Result;
use clap::Parser;

use banter_cli::cli::commands::{chat, configure, personas};
use banter_cli::cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Personas) => {
            personas::print_personas()?;
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        Some(Command::Chat { persona, model }) => {
            let options = chat::ChatOptions { persona, model };
            chat::run_chat(options).await?;
        }
        None => {
            let options = chat::ChatOptions {
                persona: None,
                model: None,
            };
            chat::run_menu(options).await?;
        }
    }

    Ok(())
}
