//! Terminal configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock terminal:
//!
//! ```toml
//! prompt = "guest@folio:~$"
//! boot_delay_ms = 400
//! type_interval_ms = 25
//! reduced_motion = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermfolioError};

/// Tunables for a terminal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Banner revealed character by character during boot.
    #[serde(default = "default_banner")]
    pub banner: String,
    /// Prompt drawn in front of the input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Delay before the first banner character appears.
    #[serde(default = "default_boot_delay")]
    pub boot_delay_ms: u64,
    /// Interval between revealed banner characters.
    #[serde(default = "default_type_interval")]
    pub type_interval_ms: u64,
    /// Delay between `sudo rm -rf /` and the crash.
    #[serde(default = "default_crash_delay")]
    pub crash_delay_ms: u64,
    /// Duration of a smooth scroll (and of the self-scroll suppression window).
    #[serde(default = "default_smooth_scroll")]
    pub smooth_scroll_ms: u64,
    /// Visible rows in the terminal viewport.
    #[serde(default = "default_viewport_rows")]
    pub viewport_rows: u32,
    /// Maximum in-session history entries.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Skip the typing animation entirely.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Host has no physical keyboard.
    #[serde(default)]
    pub touch_only: bool,
}

fn default_banner() -> String {
    "Welcome to my corner of the internet.".to_string()
}
fn default_prompt() -> String {
    "guest@folio:~$".to_string()
}
fn default_boot_delay() -> u64 {
    400
}
fn default_type_interval() -> u64 {
    25
}
fn default_crash_delay() -> u64 {
    1500
}
fn default_smooth_scroll() -> u64 {
    300
}
fn default_viewport_rows() -> u32 {
    24
}
fn default_history_limit() -> usize {
    100
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            banner: default_banner(),
            prompt: default_prompt(),
            boot_delay_ms: default_boot_delay(),
            type_interval_ms: default_type_interval(),
            crash_delay_ms: default_crash_delay(),
            smooth_scroll_ms: default_smooth_scroll(),
            viewport_rows: default_viewport_rows(),
            history_limit: default_history_limit(),
            reduced_motion: false,
            touch_only: false,
        }
    }
}

impl TerminalConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded terminal config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.banner.is_empty() {
            return Err(TermfolioError::Config("banner must not be empty".into()));
        }
        if self.type_interval_ms == 0 {
            return Err(TermfolioError::Config(
                "type_interval_ms must be at least 1".into(),
            ));
        }
        if self.viewport_rows == 0 {
            return Err(TermfolioError::Config(
                "viewport_rows must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
