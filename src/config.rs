use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::Level;

pub const SUPPORTED_LOCALES: &[&str] = &["zh-HK", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default = "default_keypad_visible")]
    pub keypad_visible: bool,
    /// Path to a question bank JSON file replacing the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_bank: Option<String>,
}

fn default_theme() -> String {
    "harbour-night".to_string()
}
fn default_locale() -> String {
    "zh-HK".to_string()
}
fn default_keypad_visible() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            level: Level::default(),
            keypad_visible: default_keypad_visible(),
            question_bank: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize_locale(SUPPORTED_LOCALES);
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simeq")
            .join("config.toml")
    }

    /// Reset `locale` to the default when it names no bundled translation.
    /// Accepts case and separator variants such as `zh_hk`.
    pub fn normalize_locale(&mut self, available: &[&str]) {
        let wanted = self.locale.replace('_', "-");
        match available.iter().find(|l| l.eq_ignore_ascii_case(&wanted)) {
            Some(locale) => self.locale = locale.to_string(),
            None => self.locale = default_locale(),
        }
    }

    pub fn cycle_locale(&mut self, forward: bool) {
        let current = SUPPORTED_LOCALES
            .iter()
            .position(|l| *l == self.locale)
            .unwrap_or(0);
        let len = SUPPORTED_LOCALES.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.locale = SUPPORTED_LOCALES[next].to_string();
    }
}
