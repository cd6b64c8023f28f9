//! Bot persona management.
//!
//! A persona defines a bot's conversational behavior: the system prompt that
//! primes the model, the greeting shown when a conversation starts, the exit
//! cue that ends the session, and the goodbye line. Two personas are compiled
//! in (`henry` and `vera`); more can be added via `[personas.<key>]` tables
//! in the config file.

use std::collections::HashMap;

use crate::config::CustomPersona;

/// Exit cue used when a custom persona does not define one.
pub const DEFAULT_EXIT_CUE: &str = "EXIT";

/// Goodbye line used when a custom persona does not define one.
pub const DEFAULT_GOODBYE: &str = "See you next time.";

/// A compiled-in persona (not modifiable by users).
#[derive(Debug, Clone)]
pub struct PresetPersona {
    /// The persona key (e.g., "henry").
    pub key: &'static str,
    /// Display name used when printing bot turns.
    pub name: &'static str,
    /// Human-readable description for listings.
    pub description: &'static str,
    /// System prompt sent with every completion request.
    pub system_prompt: &'static str,
    /// Opening line of a new conversation.
    pub greeting: &'static str,
    /// User input that ends the session.
    pub exit_cue: &'static str,
    /// Sign-off printed before the program terminates.
    pub goodbye: &'static str,
}

/// All compiled-in personas.
pub const PRESETS: &[PresetPersona] = &[
    PresetPersona {
        key: "henry",
        name: "Henry",
        description: "Relentless joker",
        system_prompt: "You are a chatbot named Henry and should try to make as many \
                        jokes as possible, whilst staying relevant to the conversation.",
        greeting: "Hi There, I am Henry the chatbot. What would you like to chat about today?",
        exit_cue: DEFAULT_EXIT_CUE,
        goodbye: DEFAULT_GOODBYE,
    },
    PresetPersona {
        key: "vera",
        name: "Vera",
        description: "Committed pessimist",
        system_prompt: "You are a very sad chatbot named Vera and try respond as \
                        pessimistically as possible.",
        greeting: "Hello, are you also very sad today? What is happening today?",
        exit_cue: DEFAULT_EXIT_CUE,
        goodbye: DEFAULT_GOODBYE,
    },
];

/// A persona resolved from a key, ready to drive a session.
#[derive(Debug, Clone)]
pub enum ResolvedPersona {
    /// A compiled-in persona.
    Preset(&'static PresetPersona),
    /// A user-defined persona from the config file.
    Custom { key: String, persona: CustomPersona },
}

impl ResolvedPersona {
    pub fn key(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.key,
            Self::Custom { key, .. } => key,
        }
    }

    /// Display name. Custom personas use their capitalized key.
    pub fn name(&self) -> String {
        match self {
            Self::Preset(preset) => preset.name.to_string(),
            Self::Custom { key, .. } => {
                let mut chars = key.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().collect::<String>() + chars.as_str()
                })
            }
        }
    }

    pub fn system_prompt(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.system_prompt,
            Self::Custom { persona, .. } => &persona.system_prompt,
        }
    }

    pub fn greeting(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.greeting,
            Self::Custom { persona, .. } => &persona.greeting,
        }
    }

    pub fn exit_cue(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.exit_cue,
            Self::Custom { persona, .. } => {
                persona.exit_cue.as_deref().unwrap_or(DEFAULT_EXIT_CUE)
            }
        }
    }

    pub fn goodbye(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.goodbye,
            Self::Custom { persona, .. } => {
                persona.goodbye.as_deref().unwrap_or(DEFAULT_GOODBYE)
            }
        }
    }
}

/// Looks up a preset persona by key.
pub fn get_preset(key: &str) -> Option<&'static PresetPersona> {
    PRESETS.iter().find(|p| p.key == key)
}

/// Returns custom persona keys sorted alphabetically.
#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(personas: &HashMap<String, CustomPersona>) -> Vec<&String> {
    let mut keys: Vec<_> = personas.keys().collect();
    keys.sort();
    keys
}

/// Resolves a persona key against presets, then custom personas.
#[allow(clippy::implicit_hasher)]
pub fn resolve_persona(
    key: &str,
    custom_personas: &HashMap<String, CustomPersona>,
) -> Result<ResolvedPersona, PersonaError> {
    if let Some(preset) = get_preset(key) {
        return Ok(ResolvedPersona::Preset(preset));
    }

    if let Some(custom) = custom_personas.get(key) {
        return Ok(ResolvedPersona::Custom {
            key: key.to_string(),
            persona: custom.clone(),
        });
    }

    let custom_keys: Vec<String> = sorted_custom_keys(custom_personas)
        .into_iter()
        .cloned()
        .collect();
    Err(PersonaError::NotFound {
        key: key.to_string(),
        custom_keys,
    })
}

/// Persona-related errors.
#[derive(Debug, Clone)]
pub enum PersonaError {
    /// Persona not found. Contains the key and the list of custom keys.
    NotFound {
        key: String,
        custom_keys: Vec<String>,
    },
}

impl std::fmt::Display for PersonaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { key, custom_keys } => {
                let mut all_keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
                all_keys.extend(custom_keys.iter().map(String::as_str));
                write!(
                    f,
                    "Persona '{key}' not found\n\nAvailable personas: {}",
                    all_keys.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PersonaError {}
