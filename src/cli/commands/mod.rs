//! Subcommand implementations.

/// Chat session command handler and interactive menus.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Persona listing command handler.
pub mod personas;
