//! Widget settings and their key-value persistence.
//!
//! Settings only affect rendering and side channels (voice capture,
//! notifications); classification never reads them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SettingsError;

/// Key under which settings are stored.
pub const SETTINGS_KEY: &str = "hiro_settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

/// User-adjustable widget settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: default_language(),
            voice_enabled: true,
            notifications_enabled: true,
        }
    }
}

/// Where settings live between mounts.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load saved settings, or `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<ChatSettings>, SettingsError>;

    /// Persist settings, replacing any previous value.
    async fn save(&self, settings: &ChatSettings) -> Result<(), SettingsError>;
}

/// In-memory store (the default when no path is configured).
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    value: RwLock<Option<ChatSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Option<ChatSettings>, SettingsError> {
        Ok(self.value.read().await.clone())
    }

    async fn save(&self, settings: &ChatSettings) -> Result<(), SettingsError> {
        *self.value.write().await = Some(settings.clone());
        Ok(())
    }
}

/// JSON file store: `{ "hiro_settings": { ... } }`.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Option<ChatSettings>, SettingsError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut doc: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&bytes)?;
        match doc.remove(SETTINGS_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, settings: &ChatSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut doc = serde_json::Map::new();
        doc.insert(SETTINGS_KEY.to_string(), serde_json::to_value(settings)?);
        let bytes = serde_json::to_vec_pretty(&doc)?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
