//! PII scrubbing for crash-reporter payloads
//!
//! Replaces the home directory and login name with placeholders before a
//! message or breadcrumb leaves the process.

use trailmark_core::config::ScrubbingConfig;

/// Strips personally identifiable text according to [`ScrubbingConfig`].
#[derive(Debug, Clone, Default)]
pub struct Scrubber {
    home_dir: Option<String>,
    username: Option<String>,
}

impl Scrubber {
    /// Creates a scrubber for the current user.
    pub fn new(config: &ScrubbingConfig) -> Self {
        let home_dir = dirs::home_dir()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|_| config.strip_paths);
        let username = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .ok()
            .filter(|_| config.strip_usernames);
        Self::with_values(home_dir, username)
    }

    /// Creates a scrubber for explicit values. Empty or very short values are ignored.
    pub fn with_values(home_dir: Option<String>, username: Option<String>) -> Self {
        // A one-letter login would mangle every message.
        let username = username.filter(|u| u.chars().count() > 1);
        let home_dir = home_dir.filter(|h| !h.is_empty() && h != "/");
        Self { home_dir, username }
    }

    /// Scrubber that leaves text untouched.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn scrub(&self, text: &str) -> String {
        let mut result = text.to_string();

        if let Some(home) = &self.home_dir {
            result = result.replace(home.as_str(), "<HOME>");
        }

        if let Some(user) = &self.username {
            result = result.replace(user.as_str(), "<USER>");
        }

        result
    }
}
