//! Chat command handler: the start/resume menus and session launch.

use anyhow::Result;
use inquire::{Confirm, InquireError, Select};

use crate::chat::{ChatSession, SessionConfig};
use crate::config::{ConfigFile, ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::persona::{self, ResolvedPersona};
use crate::store::{SavedEntry, SessionStore};
use crate::transcript::Transcript;
use crate::ui::Style;

pub struct ChatOptions {
    pub persona: Option<String>,
    pub model: Option<String>,
}

/// Runs the default interactive flow: choose between starting a new
/// conversation and continuing a saved one, then chat.
pub async fn run_menu(options: ChatOptions) -> Result<()> {
    let (config_file, resolved) = load_startup_config(&options)?;

    let choice = Select::new(
        "What do you want to do?",
        vec!["Start a new conversation", "Continue a saved conversation"],
    )
    .prompt();

    match choice {
        Ok("Continue a saved conversation") => {
            resume_conversation(&config_file, &resolved).await
        }
        Ok(_) => new_conversation(None, &config_file, &resolved).await,
        Err(e) if is_menu_cancelled(&e) => cancelled(),
        Err(e) => Err(e.into()),
    }
}

/// Runs `banter chat`: straight into a new conversation.
pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let (config_file, resolved) = load_startup_config(&options)?;

    new_conversation(options.persona.as_deref(), &config_file, &resolved).await
}

/// Loads and resolves the startup configuration.
///
/// A missing credential is startup-fatal; the anyhow error propagates out of
/// `main` with a non-zero exit code before any session starts.
fn load_startup_config(options: &ChatOptions) -> Result<(ConfigFile, ResolvedConfig)> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();

    let resolve_options = ResolveOptions {
        model: options.model.clone(),
    };
    let resolved = resolve_config(&resolve_options, &config_file)?;

    Ok((config_file, resolved))
}

async fn new_conversation(
    persona_key: Option<&str>,
    config_file: &ConfigFile,
    resolved: &ResolvedConfig,
) -> Result<()> {
    let Some(persona) = pick_persona(persona_key, config_file)? else {
        return cancelled();
    };

    let mut session = ChatSession::new(session_config(persona, resolved));
    session.run().await
}

async fn resume_conversation(config_file: &ConfigFile, resolved: &ResolvedConfig) -> Result<()> {
    let store = SessionStore::new();
    let entries = store.list();

    if entries.is_empty() {
        return handle_no_saved_conversations(config_file, resolved).await;
    }

    let Some(entry) = pick_saved_conversation(entries)? else {
        return cancelled();
    };

    // A corrupt file is recoverable: report it and start from an empty
    // transcript instead of crashing.
    let transcript = match store.load(&entry.path) {
        Ok(conversation) => conversation.transcript,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            eprintln!("Starting a new conversation instead.");
            eprintln!();
            Transcript::new()
        }
    };

    // The original persona is not binding: the user picks who continues
    // the conversation, and the system prompt is re-primed accordingly.
    let Some(persona) = pick_persona(None, config_file)? else {
        return cancelled();
    };

    let mut session = if transcript.is_empty() {
        ChatSession::new(session_config(persona, resolved))
    } else {
        ChatSession::resumed(session_config(persona, resolved), transcript, entry.stem)
    };
    session.run().await
}

async fn handle_no_saved_conversations(
    config_file: &ConfigFile,
    resolved: &ResolvedConfig,
) -> Result<()> {
    let start_new = Confirm::new("No saved conversations found. Start a new one?")
        .with_default(true)
        .prompt();

    match start_new {
        Ok(true) => new_conversation(None, config_file, resolved).await,
        Ok(false) => Ok(()),
        Err(e) if is_menu_cancelled(&e) => cancelled(),
        Err(e) => Err(e.into()),
    }
}

fn pick_saved_conversation(entries: Vec<SavedEntry>) -> Result<Option<SavedEntry>> {
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{}, topic: {}", e.stem, e.subject))
        .collect();

    let choice = Select::new("Choose the conversation to continue:", labels.clone()).prompt();

    match choice {
        Ok(label) => {
            let index = labels.iter().position(|l| *l == label).unwrap_or(0);
            Ok(entries.into_iter().nth(index))
        }
        Err(e) if is_menu_cancelled(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a persona from a CLI-provided key, or asks interactively.
///
/// Returns `None` when the user cancels the prompt.
fn pick_persona(
    persona_key: Option<&str>,
    config_file: &ConfigFile,
) -> Result<Option<ResolvedPersona>> {
    if let Some(key) = persona_key {
        let persona = persona::resolve_persona(key, &config_file.personas)?;
        return Ok(Some(persona));
    }

    let mut keys: Vec<String> = persona::PRESETS.iter().map(|p| p.key.to_string()).collect();
    keys.extend(
        persona::sorted_custom_keys(&config_file.personas)
            .into_iter()
            .cloned(),
    );

    let choice = Select::new("With whom would you like to chat today?", keys).prompt();

    match choice {
        Ok(key) => Ok(Some(persona::resolve_persona(&key, &config_file.personas)?)),
        Err(e) if is_menu_cancelled(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn session_config(persona: ResolvedPersona, resolved: &ResolvedConfig) -> SessionConfig {
    SessionConfig {
        persona,
        endpoint: resolved.endpoint.clone(),
        model: resolved.model.clone(),
        api_key: resolved.api_key.clone(),
        exit_cue_ignores_case: resolved.exit_cue_ignores_case,
        history_limit: resolved.history_limit,
    }
}

const fn is_menu_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

#[allow(clippy::unnecessary_wraps)]
fn cancelled() -> Result<()> {
    println!();
    Ok(())
}
