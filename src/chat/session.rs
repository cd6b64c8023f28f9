use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, Styled};
use std::path::PathBuf;

use super::ui;
use crate::completion::CompletionClient;
use crate::persona::ResolvedPersona;
use crate::store::{SavedConversation, SessionStore};
use crate::transcript::{Speaker, Transcript};
use crate::ui::Spinner;

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The persona driving the bot's behavior.
    pub persona: ResolvedPersona,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model to use.
    pub model: String,
    /// The API key for outbound requests.
    pub api_key: String,
    /// Match the exit cue case-insensitively.
    pub exit_cue_ignores_case: bool,
    /// Maximum number of turns kept in the context window.
    pub history_limit: Option<usize>,
}

/// Returns true when `input` matches the persona's exit cue.
///
/// Byte-exact by default; case-insensitive when configured. Anything else
/// proceeds to the completion path.
pub fn is_exit_cue(input: &str, exit_cue: &str, ignores_case: bool) -> bool {
    if ignores_case {
        input.to_lowercase() == exit_cue.to_lowercase()
    } else {
        input == exit_cue
    }
}

/// Appends one completed exchange and applies the context-window policy.
///
/// Called only after the completion client succeeded, so a failed request
/// never leaves a partial turn behind.
fn apply_exchange(
    transcript: &mut Transcript,
    user_text: &str,
    reply: &str,
    history_limit: Option<usize>,
) {
    transcript.append(Speaker::User, user_text);
    transcript.append(Speaker::Bot, reply);
    if let Some(limit) = history_limit {
        transcript.clamp(limit);
    }
}

/// An interactive conversation with a bot persona.
///
/// Owns the transcript exclusively for the duration of the session. Each
/// iteration blocks on terminal input, then on the remote call; a service
/// failure is reported and the loop keeps awaiting input.
pub struct ChatSession {
    config: SessionConfig,
    client: CompletionClient,
    store: SessionStore,
    transcript: Transcript,
    resumed_from: Option<String>,
    save_path: Option<PathBuf>,
}

impl ChatSession {
    /// Creates a session for a new conversation.
    pub fn new(config: SessionConfig) -> Self {
        let client = CompletionClient::new(config.endpoint.clone(), config.api_key.clone());
        Self {
            config,
            client,
            store: SessionStore::new(),
            transcript: Transcript::new(),
            resumed_from: None,
            save_path: None,
        }
    }

    /// Creates a session continuing a previously saved conversation.
    ///
    /// The saved turns are replayed verbatim before new input is accepted.
    /// The resumed session is saved to a fresh file, leaving the original
    /// untouched.
    pub fn resumed(config: SessionConfig, transcript: Transcript, source_stem: String) -> Self {
        let mut session = Self::new(config);
        session.transcript = transcript;
        session.resumed_from = Some(source_stem);
        session
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header();

        let persona_name = self.config.persona.name();

        if self.transcript.is_empty() {
            let greeting = self.config.persona.greeting().to_string();
            ui::print_bot_turn(&persona_name, &greeting);
            self.transcript.append(Speaker::Bot, greeting);
        } else {
            if let Some(stem) = &self.resumed_from {
                ui::print_resumed(stem);
            }
            for turn in self.transcript.turns() {
                match turn.speaker {
                    Speaker::Bot => ui::print_bot_turn(&persona_name, &turn.text),
                    Speaker::User => ui::print_user_turn(&turn.text),
                }
            }
        }

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        let help_message = format!(
            "Type {} to end the conversation, Ctrl+C to quit",
            self.config.persona.exit_cue()
        );

        loop {
            let input = Text::new("You:")
                .with_render_config(render_config)
                .with_help_message(&help_message)
                .prompt();

            match input {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if is_exit_cue(
                        line,
                        self.config.persona.exit_cue(),
                        self.config.exit_cue_ignores_case,
                    ) {
                        break;
                    }
                    self.exchange(line).await;
                }
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_bot_turn(&persona_name, self.config.persona.goodbye());
        self.persist()?;
        if let Some(path) = &self.save_path {
            ui::print_saved(path);
        }
        Ok(())
    }

    /// One PROCESSING step: request the bot's reply for the pending input.
    ///
    /// On success the user and bot turns are appended and the transcript is
    /// persisted. On failure nothing is appended; the error is reported and
    /// the caller loops back to awaiting input.
    async fn exchange(&mut self, user_text: &str) {
        let spinner = Spinner::thinking();

        let result = self
            .client
            .complete(
                self.config.persona.system_prompt(),
                &self.transcript,
                user_text,
                &self.config.model,
            )
            .await;

        spinner.stop();

        match result {
            Ok(reply) => {
                apply_exchange(
                    &mut self.transcript,
                    user_text,
                    &reply,
                    self.config.history_limit,
                );
                ui::print_bot_turn(&self.config.persona.name(), &reply);
                if let Err(e) = self.persist() {
                    ui::print_error(&format!("Failed to save conversation: {e:#}"));
                }
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    /// Writes the transcript to disk, allocating a file on the first save
    /// and rewriting the same file afterwards.
    fn persist(&mut self) -> Result<()> {
        let conversation =
            SavedConversation::new(self.config.persona.key(), self.transcript.clone());

        if let Some(path) = &self.save_path {
            self.store.save_to(path, &conversation)
        } else {
            let path = self.store.save(&conversation)?;
            self.save_path = Some(path);
            Ok(())
        }
    }
}
