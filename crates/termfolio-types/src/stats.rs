//! Read-only profile statistics snapshot.
//!
//! Produced by an external data-fetch collaborator (serialized as JSON) and
//! consumed only for the terminal header. Nothing in termfolio mutates it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Basic account information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
}

/// Contribution counters for the trailing year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionSummary {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

/// Share of one language across all repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    /// Percentage in `0.0..=100.0`.
    pub percent: f32,
}

/// Snapshot of user, contribution and language statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub user: UserSummary,
    #[serde(default)]
    pub contributions: ContributionSummary,
    #[serde(default)]
    pub languages: Vec<LanguageShare>,
}

impl ProfileStats {
    /// Parse a snapshot from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Display name, falling back to the login.
    pub fn display_name(&self) -> &str {
        self.user.name.as_deref().unwrap_or(&self.user.login)
    }

    /// The `n` languages with the largest share, largest first.
    pub fn top_languages(&self, n: usize) -> Vec<&LanguageShare> {
        let mut langs: Vec<&LanguageShare> = self.languages.iter().collect();
        langs.sort_by(|a, b| b.percent.total_cmp(&a.percent));
        langs.truncate(n);
        langs
    }

    /// Header lines shown above the terminal once it has booted.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} (@{}) | {} repos | {} followers",
            self.display_name(),
            self.user.login,
            self.user.public_repos,
            self.user.followers
        )];
        lines.push(format!(
            "{} contributions this year | streak {} (best {})",
            self.contributions.total,
            self.contributions.current_streak,
            self.contributions.longest_streak
        ));
        let top = self.top_languages(3);
        if !top.is_empty() {
            let langs: Vec<String> = top
                .iter()
                .map(|l| format!("{} {:.1}%", l.name, l.percent))
                .collect();
            lines.push(langs.join(" / "));
        }
        lines
    }
}
