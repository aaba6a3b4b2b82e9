use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LunaError, Result};

/// Top-level configuration for the Luna widget.
///
/// Loaded from `~/.luna/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LunaConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub suggestions: SuggestionsConfig,
    pub voice: VoiceConfig,
    pub profile: ProfileConfig,
    pub embed: EmbedConfig,
}

impl LunaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LunaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| LunaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the chat backend (no trailing slash required).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Company name interpolated into the welcome message.
    pub company_name: String,
    /// Display name of the assistant persona.
    pub assistant_name: String,
    /// Number of trailing messages sent as conversation history per turn.
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            company_name: "Luna Labs".to_string(),
            assistant_name: "Luna".to_string(),
            history_window: 4,
        }
    }
}

/// Suggestion-chip settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Once more than this many questions have been used, the used set is
    /// cleared so the suggestion pool does not go stale.
    pub used_reset_threshold: usize,
    /// How many of the initial suggested questions are displayed.
    pub initial_shown: usize,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            used_reset_threshold: 8,
            initial_shown: 4,
        }
    }
}

/// Voice input/output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether spoken playback of bot replies starts enabled.
    pub output_enabled: bool,
    /// Delay before auto-speaking a freshly arrived bot reply, in ms.
    pub auto_speak_delay_ms: u64,
    /// Delay before the single retry of a failed recognition start, in ms.
    pub start_retry_delay_ms: u64,
    /// Recognition/synthesis language tag.
    pub language: String,
    /// Speech rate (1.0 is the engine default).
    pub rate: f32,
    /// Speech pitch (1.0 is the engine default).
    pub pitch: f32,
    /// Speech volume (0.0 to 1.0).
    pub volume: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            output_enabled: true,
            auto_speak_delay_ms: 500,
            start_retry_delay_ms: 1000,
            language: "en-US".to_string(),
            rate: 0.9,
            pitch: 0.8,
            volume: 0.8,
        }
    }
}

/// Company profile used by the offline fallback responder.
///
/// The fallback rule table is fixed; these are the identifying details it
/// interpolates into its canned answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub contact_email: String,
    pub contact_phone: String,
    /// Team roster as "Name (Role)" entries. First names also feed the
    /// team-phase keyword group of the context classifier.
    pub team: Vec<String>,
    /// One-line summary of the services offered.
    pub services_line: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            contact_email: "hello@lunalabs.io".to_string(),
            contact_phone: "+1 555 010 0199".to_string(),
            team: vec![
                "Maya Lindqvist (Founder)".to_string(),
                "Jonas Keller (UI/UX Designer)".to_string(),
                "Tomas Rivera (Full-Stack Developer)".to_string(),
                "Priya Nandakumar (AI/ML Engineer)".to_string(),
            ],
            services_line: "AI-powered chatbots, automation solutions, and premium web development"
                .to_string(),
        }
    }
}

/// Embed-loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// URL of the hosted chat page loaded in the embedded frame.
    pub chat_url: String,
    /// Corner the widget is anchored to: "bottom-right" or "bottom-left".
    pub position: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            chat_url: "https://chat.lunalabs.io/".to_string(),
            position: "bottom-right".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LunaConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.chat.history_window, 4);
        assert_eq!(config.suggestions.used_reset_threshold, 8);
        assert!(config.voice.output_enabled);
        assert_eq!(config.voice.auto_speak_delay_ms, 500);
        assert_eq!(config.embed.position, "bottom-right");
    }

    #[test]
    fn test_default_profile_has_team() {
        let config = LunaConfig::default();
        assert_eq!(config.profile.team.len(), 4);
        assert!(config.profile.contact_email.contains('@'));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = LunaConfig::load_or_default(Path::new("/nonexistent/luna.toml"));
        assert_eq!(config.chat.assistant_name, "Luna");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = LunaConfig::load(Path::new("/nonexistent/luna.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = LunaConfig::default();
        config.api.base_url = "https://api.example.com".to_string();
        config.suggestions.used_reset_threshold = 12;
        config.voice.output_enabled = false;
        config.save(&path).unwrap();

        let loaded = LunaConfig::load(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://api.example.com");
        assert_eq!(loaded.suggestions.used_reset_threshold, 12);
        assert!(!loaded.voice.output_enabled);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");
        LunaConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [api]
            base_url = "https://partial.example.com"
        "#;
        let config: LunaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://partial.example.com");
        // Untouched sections keep defaults
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.chat.company_name, "Luna Labs");
        assert_eq!(config.suggestions.initial_shown, 4);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: LunaConfig = toml::from_str("").unwrap();
        assert_eq!(config.voice.language, "en-US");
        assert_eq!(config.voice.start_retry_delay_ms, 1000);
    }

    #[test]
    fn test_load_invalid_toml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [[[ not toml").unwrap();

        let config = LunaConfig::load_or_default(&path);
        assert_eq!(config.chat.company_name, "Luna Labs");
    }
}
