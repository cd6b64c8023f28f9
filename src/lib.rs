//! # banter - Persona Chatbot CLI
//!
//! `banter` is a command-line client for conversing with bot personas backed
//! by an OpenAI-compatible chat-completion endpoint. Conversations are saved
//! as human-readable JSON files and can be resumed later, with any persona.
//!
//! ## Quick Start
//!
//! ```bash
//! # Set up endpoint, model and API key
//! banter configure
//!
//! # Start chatting (interactive start/resume menu)
//! banter
//!
//! # Jump straight into a conversation with Vera
//! banter chat --persona vera
//!
//! # See who is available
//! banter personas
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/banter/config.toml`:
//!
//! ```toml
//! [banter]
//! model = "gpt-3.5-turbo"
//!
//! [api]
//! endpoint = "https://api.openai.com"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [personas.marvin]
//! description = "Gloomy android"
//! system_prompt = "You are a depressed robot with a brain the size of a planet."
//! greeting = "Life. Don't talk to me about life."
//! ```
//!
//! Saved conversations live in `~/.local/share/banter/conversations/`, one
//! JSON file per conversation. Type `EXIT` (each persona's exit cue) to end
//! a session; the transcript is persisted on the way out.

/// Interactive chat sessions (the conversation loop).
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Client for OpenAI-compatible chat completion APIs.
pub mod completion;

/// Configuration file management.
pub mod config;

/// File system utilities.
pub mod fs;

/// XDG-style path utilities for configuration and saved conversations.
pub mod paths;

/// Bot persona definitions and resolution.
pub mod persona;

/// Saved conversation storage.
pub mod store;

/// Conversation transcript types.
pub mod transcript;

/// Terminal UI components (spinner, colors).
pub mod ui;
