use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "banter")]
#[command(about = "Chat with AI bot personas from your terminal")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new conversation, skipping the start/resume menu
    Chat {
        /// Persona key (e.g., henry, vera)
        #[arg(short = 'p', long)]
        persona: Option<String>,

        /// Model name
        #[arg(short = 'm', long)]
        model: Option<String>,
    },
    /// List available personas
    Personas,
    /// Configure banter settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
