use std::sync::Arc;

use log::warn;

use crate::errors::CoreError;
use crate::models::settings::Theme;

use super::backend::StorageBackend;
use super::format;

/// Durable theme preference.
pub struct SettingsStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Stored theme. `Light` when none is stored or the value is unrecognised.
    pub fn load_theme(&self) -> Result<Theme, CoreError> {
        match self.backend.read(&self.key)? {
            None => Ok(Theme::default()),
            Some(raw) => Ok(format::decode_theme(&raw).unwrap_or_else(|e| {
                warn!("theme '{}' is unreadable ({e}), using light", self.key);
                Theme::default()
            })),
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), CoreError> {
        let payload = format::encode_theme(theme)?;
        self.backend.write(&self.key, &payload)
    }

    /// Flip light/dark, persist, and return the new theme.
    pub fn toggle_theme(&self) -> Result<Theme, CoreError> {
        let theme = self.load_theme()?.toggled();
        self.save_theme(theme)?;
        Ok(theme)
    }
}
