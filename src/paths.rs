//! XDG-style path utilities for configuration and saved conversations.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use std::path::PathBuf;

/// Returns the configuration directory for banter.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/banter` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/banter` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("banter"),
        |xdg| PathBuf::from(xdg).join("banter"),
    )
}

/// Returns the directory holding saved conversations.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/banter/conversations` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/banter/conversations` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn conversations_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map_or_else(
            |_| home_dir().join(".local").join("share").join("banter"),
            |xdg| PathBuf::from(xdg).join("banter"),
        )
        .join("conversations")
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let dir = config_dir();
        assert!(dir.ends_with(".config/banter"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/custom/config") };

        let dir = config_dir();
        assert_eq!(dir, PathBuf::from("/custom/config/banter"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        }
    }

    #[test]
    #[serial]
    fn test_conversations_dir_default() {
        let original = std::env::var("XDG_DATA_HOME").ok();
        unsafe { std::env::remove_var("XDG_DATA_HOME") };

        let dir = conversations_dir();
        assert!(dir.ends_with(".local/share/banter/conversations"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_DATA_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_conversations_dir_xdg_override() {
        let original = std::env::var("XDG_DATA_HOME").ok();
        unsafe { std::env::set_var("XDG_DATA_HOME", "/custom/data") };

        let dir = conversations_dir();
        assert_eq!(dir, PathBuf::from("/custom/data/banter/conversations"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_DATA_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_DATA_HOME") };
        }
    }
}
