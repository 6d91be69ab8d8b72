use std::sync::Arc;

use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::history::HistoryEntry;
use crate::services::history_service::HistoryService;

use super::backend::StorageBackend;
use super::format;

/// Durable result history, most recent first.
pub struct HistoryStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    service: HistoryService,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            service: HistoryService::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored log, or an empty one when nothing has been saved.
    /// A malformed record yields `CorruptRecord`; [`HistoryStore::clear`] recovers.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        match self.backend.read(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => format::decode_history(&raw).map_err(|e| {
                warn!("history '{}' is unreadable: {e}", self.key);
                CoreError::CorruptRecord {
                    key: self.key.clone(),
                    message: e.to_string(),
                }
            }),
        }
    }

    /// Insert `entry` at the head and persist the whole log.
    pub fn append(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, CoreError> {
        let mut log = self.load()?;
        self.service.prepend(&mut log, entry);
        self.save(&log)?;
        Ok(log)
    }

    /// Remove the entry with `id`. Unknown ids leave storage untouched.
    pub fn delete_by_id(&self, id: i64) -> Result<Vec<HistoryEntry>, CoreError> {
        let mut log = self.load()?;
        if self.service.remove_by_id(&mut log, id) {
            self.save(&log)?;
        } else {
            debug!("history entry {id} not found, nothing deleted");
        }
        Ok(log)
    }

    /// Drop every entry. Does not read the current record.
    pub fn clear(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        self.backend.remove(&self.key)?;
        debug!("cleared history '{}'", self.key);
        Ok(Vec::new())
    }

    /// Id for an entry created at `now_millis`, unique against the stored log.
    pub fn next_id(&self, now_millis: i64) -> Result<i64, CoreError> {
        let log = self.load()?;
        Ok(self.service.next_id(&log, now_millis))
    }

    fn save(&self, log: &[HistoryEntry]) -> Result<(), CoreError> {
        let payload = format::encode_history(log)?;
        self.backend.write(&self.key, &payload)?;
        debug!(
            "saved history '{}' ({} entries) to {}",
            self.key,
            log.len(),
            self.backend.name()
        );
        Ok(())
    }
}
