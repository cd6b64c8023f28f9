//! Interactive chat sessions.
//!
//! The session loop reads user input, detects the exit cue, and drives the
//! transcript, store, and completion client per iteration.

mod session;
mod ui;

pub use session::{ChatSession, SessionConfig, is_exit_cue};
