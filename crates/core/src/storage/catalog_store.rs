use std::sync::Arc;

use log::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::subject::Catalog;
use crate::services::catalog_service::CatalogService;

use super::backend::StorageBackend;
use super::format::{self, DecodedCatalog};

/// Durable subject catalog.
///
/// Every mutation is read → validate → write: a rejected edit never reaches
/// storage. Indices are positions in the catalog as last loaded; `delete`
/// shifts every later subject down by one.
pub struct CatalogStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
    service: CatalogService,
}

impl CatalogStore {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            service: CatalogService::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored catalog, created from defaults when absent or retired.
    ///
    /// Older schema versions are migrated and written back. A record that is
    /// present but unreadable yields `CorruptRecord` rather than being
    /// replaced; call [`CatalogStore::reset_to_defaults`] to recover.
    pub fn load(&self) -> Result<Catalog, CoreError> {
        let raw = match self.backend.read(&self.key)? {
            Some(raw) => raw,
            None => {
                info!("catalog '{}' not found, writing defaults", self.key);
                return self.reset_to_defaults();
            }
        };

        let decoded = format::decode_catalog(&raw).map_err(|e| self.corrupt(e))?;
        match decoded {
            DecodedCatalog::Current(catalog) => {
                self.service
                    .validate_catalog(&catalog)
                    .map_err(|e| self.corrupt(e))?;
                Ok(catalog)
            }
            DecodedCatalog::MissingIds(catalog) => {
                self.service
                    .validate_catalog(&catalog)
                    .map_err(|e| self.corrupt(e))?;
                info!("catalog '{}' had subjects without ids, writing ids back", self.key);
                self.save(&catalog)?;
                Ok(catalog)
            }
            DecodedCatalog::Migrated { from, catalog } => {
                self.service
                    .validate_catalog(&catalog)
                    .map_err(|e| self.corrupt(e))?;
                info!(
                    "migrating catalog '{}' from schema v{from} to v{}",
                    self.key,
                    format::CURRENT_VERSION
                );
                self.save(&catalog)?;
                Ok(catalog)
            }
            DecodedCatalog::Stale { from } => {
                warn!(
                    "catalog '{}' (schema v{from}) lists retired subject '{}', replacing with defaults",
                    self.key,
                    format::OBSOLETE_SUBJECT
                );
                self.reset_to_defaults()
            }
        }
    }

    /// Overwrite the stored catalog in a single write.
    pub fn save(&self, catalog: &Catalog) -> Result<(), CoreError> {
        let payload = format::encode_catalog(catalog)?;
        self.backend.write(&self.key, &payload)?;
        debug!(
            "saved catalog '{}' ({} subjects) to {}",
            self.key,
            catalog.len(),
            self.backend.name()
        );
        Ok(())
    }

    /// Append a subject. Rejects an empty name or non-positive credits.
    pub fn add(&self, name: &str, credits: f64) -> Result<Catalog, CoreError> {
        let mut catalog = self.load()?;
        self.service.add_subject(&mut catalog, name, credits)?;
        self.save(&catalog)?;
        Ok(catalog)
    }

    /// Overwrite the subject at `index` in place.
    pub fn update(&self, index: usize, name: &str, credits: f64) -> Result<Catalog, CoreError> {
        let mut catalog = self.load()?;
        self.service
            .update_subject(&mut catalog, index, name, credits)?;
        self.save(&catalog)?;
        Ok(catalog)
    }

    /// Remove the subject at `index`; later subjects shift down by one.
    pub fn delete(&self, index: usize) -> Result<Catalog, CoreError> {
        let mut catalog = self.load()?;
        let removed = self.service.remove_subject(&mut catalog, index)?;
        self.save(&catalog)?;
        info!("deleted subject '{}' at #{index}", removed.name);
        Ok(catalog)
    }

    /// Replace the catalog with the embedded defaults without reading the
    /// current record (so this also recovers from a corrupt one).
    pub fn reset_to_defaults(&self) -> Result<Catalog, CoreError> {
        let catalog = Catalog::defaults();
        self.save(&catalog)?;
        Ok(catalog)
    }

    fn corrupt(&self, e: CoreError) -> CoreError {
        match e {
            CoreError::UnsupportedVersion(_) => e,
            other => {
                warn!("catalog '{}' is unreadable: {other}", self.key);
                CoreError::CorruptRecord {
                    key: self.key.clone(),
                    message: other.to_string(),
                }
            }
        }
    }
}
