use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What to do with a submission that arrives while a reply is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    Reject,
    Queue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderSettings {
    pub response_delay_ms: u64,
    pub overlap_policy: OverlapPolicy,
    pub greeting: String,
    pub apology: String,
}

impl ResponderSettings {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            response_delay_ms: 2000,
            overlap_policy: OverlapPolicy::Reject,
            greeting: "Hello! I'm your NeuraOps AI assistant. How can I help you with your manufacturing operations today?".to_string(),
            apology: "I'm sorry, I couldn't analyze that request right now. Please try again in a moment.".to_string(),
        }
    }
}

pub struct SettingsService;

impl SettingsService {
    /// Load settings from a JSON file. Missing or unreadable files yield defaults.
    pub async fn load(path: &Path) -> ResponderSettings {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::error!("Invalid settings in {}: {}", path.display(), e);
                ResponderSettings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                ResponderSettings::default()
            }
            Err(e) => {
                tracing::error!("Failed to read settings {}: {}", path.display(), e);
                ResponderSettings::default()
            }
        }
    }

    pub async fn save(path: &Path, settings: &ResponderSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ResponderSettings::default();
        assert_eq!(settings.response_delay(), Duration::from_millis(2000));
        assert_eq!(settings.overlap_policy, OverlapPolicy::Reject);
        assert!(settings.greeting.starts_with("Hello! I'm your NeuraOps AI assistant."));
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let settings: ResponderSettings =
            serde_json::from_str(r#"{"response_delay_ms": 50, "overlap_policy": "queue"}"#)
                .unwrap();
        assert_eq!(settings.response_delay_ms, 50);
        assert_eq!(settings.overlap_policy, OverlapPolicy::Queue);
        assert_eq!(settings.greeting, ResponderSettings::default().greeting);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = ResponderSettings {
            response_delay_ms: 10,
            overlap_policy: OverlapPolicy::Queue,
            greeting: "Hi".to_string(),
            ..ResponderSettings::default()
        };
        SettingsService::save(&path, &settings).await.unwrap();

        let loaded = SettingsService::load(&path).await;
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let missing = SettingsService::load(&dir.path().join("nope.json")).await;
        assert_eq!(missing, ResponderSettings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(SettingsService::load(&broken).await, ResponderSettings::default());
    }
}
