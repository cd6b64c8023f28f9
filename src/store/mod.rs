//! Saved conversation storage.
//!
//! Each conversation is one pretty-printed JSON file under the data
//! directory, named `conversation_<YYYY-MM-DD-HH-MM>.json` with a ` (N)`
//! counter suffix when several conversations end within the same minute.
//! The format round-trips the ordered (speaker, text) sequence losslessly.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::transcript::{Speaker, Transcript};

/// Words too common to indicate the subject of a conversation.
const STOP_WORDS: &[&str] = &[
    "I", "i", "Hi", "Hello", "hi", "hello", "want", "would", "more", "to", "chat", "discuss",
    "about", "ask", "you", "Id", "like", "please", "talk", "know",
];

/// On-disk record of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConversation {
    /// Persona key the conversation was last held with.
    pub persona: Option<String>,
    /// Subject extracted from the first user turn.
    pub subject: String,
    /// Name the user gave during the conversation, or `UNKNOWN`.
    #[serde(default = "unknown")]
    pub user_name: String,
    /// Word and character counts at the time of the last save.
    #[serde(default)]
    pub stats: ConversationStats,
    /// RFC 3339 timestamp of the last save.
    pub saved_at: String,
    /// The ordered turn history.
    pub transcript: Transcript,
}

impl SavedConversation {
    /// Builds a record for the given transcript, stamped with the current time.
    pub fn new(persona_key: &str, transcript: Transcript) -> Self {
        let subject = extract_subject(&transcript, persona_key);
        let user_name = extract_user_name(&transcript);
        let stats = ConversationStats::of(&transcript);
        Self {
            persona: Some(persona_key.to_string()),
            subject,
            user_name,
            stats,
            saved_at: Local::now().to_rfc3339(),
            transcript,
        }
    }
}

fn unknown() -> String {
    "UNKNOWN".to_string()
}

/// Summary counts stored alongside the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Total characters across the user's turns.
    #[serde(default)]
    pub user_characters: usize,
    /// Total words across the bot's turns, punctuation-only tokens excluded.
    #[serde(default)]
    pub bot_words: usize,
}

impl ConversationStats {
    pub fn of(transcript: &Transcript) -> Self {
        let mut user_characters = 0;
        let mut bot_words = 0;

        for turn in transcript.turns() {
            match turn.speaker {
                Speaker::User => user_characters += turn.text.chars().count(),
                Speaker::Bot => {
                    bot_words += turn
                        .text
                        .split_whitespace()
                        .filter(|word| word.chars().any(|c| c.is_alphanumeric() || c == '_'))
                        .count();
                }
            }
        }

        Self {
            user_characters,
            bot_words,
        }
    }
}

/// A saved conversation file, as shown in the resume listing.
#[derive(Debug, Clone)]
pub struct SavedEntry {
    pub path: PathBuf,
    /// File stem, e.g. `conversation_2026-08-23-14-02`.
    pub stem: String,
    /// Subject line, or a placeholder when the file cannot be parsed.
    pub subject: String,
}

/// Reads and writes conversation files in one directory.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at the default conversations directory.
    pub fn new() -> Self {
        Self {
            dir: paths::conversations_dir(),
        }
    }

    /// Creates a store rooted at an explicit directory.
    pub const fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Lists saved conversations sorted by file name.
    ///
    /// A missing directory yields an empty list; unreadable files still
    /// appear so the user can see (and clean up) what is there.
    pub fn list(&self) -> Vec<SavedEntry> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut saved: Vec<SavedEntry> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "json")
                    && p.file_name()
                        .is_some_and(|n| n.to_string_lossy().starts_with("conversation_"))
            })
            .map(|path| {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let subject = self
                    .load(&path)
                    .map_or_else(|_| "(unreadable)".to_string(), |c| c.subject);
                SavedEntry {
                    path,
                    stem,
                    subject,
                }
            })
            .collect();

        saved.sort_by(|a, b| a.stem.cmp(&b.stem));
        saved
    }

    /// Loads a saved conversation from a file.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing or corrupt file; callers report it and
    /// fall back to a new transcript rather than crashing.
    pub fn load(&self, path: &Path) -> Result<SavedConversation> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read conversation file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Corrupt conversation file: {}", path.display()))
    }

    /// Saves a conversation to a newly allocated file and returns its path.
    pub fn save(&self, conversation: &SavedConversation) -> Result<PathBuf> {
        let path = self.allocate_path()?;
        self.save_to(&path, conversation)?;
        Ok(path)
    }

    /// Saves a conversation to an existing path (incremental per-session saves).
    pub fn save_to(&self, path: &Path, conversation: &SavedConversation) -> Result<()> {
        let contents = serde_json::to_string_pretty(conversation)
            .context("Failed to serialize conversation")?;

        crate::fs::atomic_write(path, &contents)
            .with_context(|| format!("Failed to write conversation file: {}", path.display()))
    }

    /// Picks a timestamped file name, appending a counter when several
    /// conversations land in the same minute.
    fn allocate_path(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!(
                "Failed to create conversations directory: {}",
                self.dir.display()
            )
        })?;

        let timestamp = Local::now().format("%Y-%m-%d-%H-%M");
        let mut path = self.dir.join(format!("conversation_{timestamp}.json"));

        let mut counter = 1;
        while path.exists() {
            path = self
                .dir
                .join(format!("conversation_{timestamp} ({counter}).json"));
            counter += 1;
        }

        Ok(path)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts a subject line from the first user turn.
///
/// Strips punctuation and filters stop words (including the persona's name);
/// returns `UNKNOWN` when no user turn exists or nothing survives the filter.
pub fn extract_subject(transcript: &Transcript, persona_name: &str) -> String {
    let Some(first) = transcript.first_user_text() else {
        return "UNKNOWN".to_string();
    };

    let words: Vec<String> = first
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|word| {
            !word.is_empty()
                && !STOP_WORDS.contains(&word.as_str())
                && !word.eq_ignore_ascii_case(persona_name)
        })
        .collect();

    if words.is_empty() {
        "UNKNOWN".to_string()
    } else {
        words.join(" ")
    }
}

/// Scans the user's turns for a "my name is" introduction.
///
/// Returns the word following the phrase, or `UNKNOWN` when the user never
/// introduced themselves. The first introduction wins.
pub fn extract_user_name(transcript: &Transcript) -> String {
    for turn in transcript.turns() {
        if turn.speaker != Speaker::User || !turn.text.to_lowercase().contains("my name is") {
            continue;
        }
        // The name is the second word after "name"; "name" is a safer anchor
        // than "is", which shows up everywhere.
        let words: Vec<&str> = turn.text.split_whitespace().collect();
        if let Some(pos) = words.iter().position(|w| w.eq_ignore_ascii_case("name"))
            && let Some(name) = words.get(pos + 2)
        {
            let name: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
            if !name.is_empty() {
                return name;
            }
        }
    }
    unknown()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::Bot, "Hi There, I am Henry the chatbot.");
        transcript.append(Speaker::User, "Hi Henry, I want to chat about rockets!");
        transcript.append(Speaker::Bot, "Rockets? Blast off!");
        transcript
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());

        let conversation = SavedConversation::new("henry", sample_transcript());
        let path = store.save(&conversation).unwrap();

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.transcript, conversation.transcript);
        assert_eq!(loaded.persona, Some("henry".to_string()));
        assert_eq!(loaded.subject, "rockets");
    }

    #[test]
    fn test_save_collision_gets_counter_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());

        let conversation = SavedConversation::new("henry", sample_transcript());
        let first = store.save(&conversation).unwrap();
        let second = store.save(&conversation).unwrap();

        assert_ne!(first, second);
        assert!(
            second
                .file_name()
                .unwrap()
                .to_string_lossy()
                .contains("(1)")
        );
    }

    #[test]
    fn test_list_empty_when_dir_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().join("nope"));

        assert!(store.list().is_empty());
    }

    #[test]
    fn test_list_finds_saved_conversations() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());

        let conversation = SavedConversation::new("vera", sample_transcript());
        store.save(&conversation).unwrap();
        store.save(&conversation).unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].stem.starts_with("conversation_"));
        assert_eq!(entries[0].subject, "rockets");
    }

    #[test]
    fn test_list_marks_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        fs::create_dir_all(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("conversation_bad.json"), "not json").unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, "(unreadable)");
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        let path = temp_dir.path().join("conversation_bad.json");
        fs::write(&path, "{ not json").unwrap();

        let result = store.load(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Corrupt"));
    }

    #[test]
    fn test_extract_user_name_from_introduction() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "Hi Henry, my name is Ada and I like rockets");

        assert_eq!(extract_user_name(&transcript), "Ada");
    }

    #[test]
    fn test_extract_user_name_mixed_case_phrase() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "My Name is Bob.");

        assert_eq!(extract_user_name(&transcript), "Bob");
    }

    #[test]
    fn test_extract_user_name_first_introduction_wins() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "my name is Ada");
        transcript.append(Speaker::User, "actually my name is Grace");

        assert_eq!(extract_user_name(&transcript), "Ada");
    }

    #[test]
    fn test_extract_user_name_ignores_bot_turns_and_dangling_phrase() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::Bot, "my name is Henry");
        transcript.append(Speaker::User, "guess what my name is");

        assert_eq!(extract_user_name(&transcript), "UNKNOWN");
    }

    #[test]
    fn test_stats_count_user_characters_and_bot_words() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::Bot, "Why - so serious?\nLighten up!");
        transcript.append(Speaker::User, "ha");
        transcript.append(Speaker::User, "good one");

        let stats = ConversationStats::of(&transcript);

        // "-" is punctuation only and does not count as a word
        assert_eq!(stats.bot_words, 5);
        assert_eq!(stats.user_characters, 2 + 8);
    }

    #[test]
    fn test_stats_empty_transcript() {
        assert_eq!(
            ConversationStats::of(&Transcript::new()),
            ConversationStats::default()
        );
    }

    #[test]
    fn test_saved_record_carries_name_and_stats() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::Bot, "Hi There, I am Henry the chatbot.");
        transcript.append(Speaker::User, "Hi, my name is Sam. Tell me about rockets");

        let saved = SavedConversation::new("henry", transcript);

        assert_eq!(saved.user_name, "Sam");
        assert_eq!(saved.stats.bot_words, 7);
        assert!(saved.stats.user_characters > 0);
    }

    #[test]
    fn test_load_record_without_name_and_stats() {
        // Hand-written or older files may omit the summary fields
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        let path = temp_dir.path().join("conversation_sparse.json");
        fs::write(
            &path,
            r#"{
                "persona": "henry",
                "subject": "rockets",
                "saved_at": "2026-08-23T12:00:00+00:00",
                "transcript": {"turns": []}
            }"#,
        )
        .unwrap();

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.user_name, "UNKNOWN");
        assert_eq!(loaded.stats, ConversationStats::default());
    }

    #[test]
    fn test_extract_subject_filters_stop_words() {
        let subject = extract_subject(&sample_transcript(), "Henry");
        assert_eq!(subject, "rockets");
    }

    #[test]
    fn test_extract_subject_unknown_when_no_user_turn() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::Bot, "greeting only");

        assert_eq!(extract_subject(&transcript, "Henry"), "UNKNOWN");
    }

    #[test]
    fn test_extract_subject_unknown_when_all_stop_words() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "Hi Henry, I would like to chat!");

        assert_eq!(extract_subject(&transcript, "Henry"), "UNKNOWN");
    }
}
