//! Conversation transcript types.
//!
//! A [`Transcript`] is the ordered history of turns for one conversation.
//! It is append-only while a session runs; prior turns are never rewritten
//! or reordered. The persona's system prompt is not part of the transcript,
//! so a saved conversation can be resumed with a different persona.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The human at the terminal.
    User,
    /// The bot persona.
    Bot,
}

/// One message in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// The ordered turn history of a single conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript for a new conversation.
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Rebuilds a transcript from previously saved turns, preserving order.
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    /// Appends a turn. Never touches existing turns.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn::new(speaker, text));
    }

    /// Drops the oldest turns until at most `limit` remain.
    ///
    /// This is the bounded-context policy for long conversations: the
    /// persona's system prompt is sent separately on every request, so
    /// dropping from the front only sheds the oldest user/bot exchange.
    pub fn clamp(&mut self, limit: usize) {
        if self.turns.len() > limit {
            self.turns.drain(..self.turns.len() - limit);
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Text of the first user turn, if any. Used for subject extraction.
    pub fn first_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .find(|t| t.speaker == Speaker::User)
            .map(|t| t.text.as_str())
    }
}
