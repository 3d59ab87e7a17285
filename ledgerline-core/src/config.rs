//! Configuration management
//!
//! settings.json format, shared with the hosted dashboard:
//! ```json
//! {
//!   "app": { "demoMode": false, "apiBaseUrl": "https://...", "editorPin": "0000" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    editor_pin: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Ledgerline configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    /// Backend base URL; None means no backend is configured and the
    /// dashboard runs purely from the local cache
    pub api_base_url: Option<String>,
    /// PIN sent with every backend write
    pub editor_pin: Option<String>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the ledgerline directory
    ///
    /// Env overrides (for CI/testing):
    /// `LEDGERLINE_DEMO_MODE`, `LEDGERLINE_API_BASE_URL`, `LEDGERLINE_PIN`
    pub fn load(ledgerline_dir: &Path) -> Result<Self> {
        let settings_path = ledgerline_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("LEDGERLINE_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };
        let api_base_url = std::env::var("LEDGERLINE_API_BASE_URL")
            .ok()
            .or_else(|| raw.app.api_base_url.clone());
        let editor_pin = std::env::var("LEDGERLINE_PIN")
            .ok()
            .or_else(|| raw.app.editor_pin.clone());

        Ok(Self {
            demo_mode,
            api_base_url,
            editor_pin,
            _raw_settings: raw,
        })
    }

    /// Save config to the ledgerline directory, preserving settings the
    /// CLI doesn't manage
    pub fn save(&self, ledgerline_dir: &Path) -> Result<()> {
        let settings_path = ledgerline_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.app.api_base_url = self.api_base_url.clone();
        settings.app.editor_pin = self.editor_pin.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}
