pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use chrono::{DateTime, Local};
use log::info;
use uuid::Uuid;

use config::StorageConfig;
use errors::CoreError;
use models::{
    grade::{GradeSelection, PriorAggregate},
    history::HistoryEntry,
    report::{GradeReport, PrintHeader},
    settings::Theme,
    subject::{Catalog, Subject},
};
use services::grade_service::GradeService;
use storage::{
    backend::{MemoryBackend, StorageBackend},
    catalog_store::CatalogStore,
    history_store::HistoryStore,
    settings_store::SettingsStore,
};

/// Main entry point for the SGPA calculator core library.
/// Holds the stores, the last computed result and the subject editor state.
///
/// A presentation shell keeps one of these and calls into it; the core never
/// reaches into UI state.
#[must_use]
pub struct GradeTracker {
    catalog_store: CatalogStore,
    history_store: HistoryStore,
    settings_store: SettingsStore,
    grade_service: GradeService,
    /// Result currently on screen, if any.
    last_report: Option<GradeReport>,
    /// Subject being edited in the catalog editor, by stable id.
    editing: Option<Uuid>,
}

impl std::fmt::Debug for GradeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradeTracker")
            .field("catalog_key", &self.catalog_store.key())
            .field("history_key", &self.history_store.key())
            .field("last_report", &self.last_report)
            .field("editing", &self.editing)
            .finish()
    }
}

impl GradeTracker {
    /// Use an on-disk data directory (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(config: &StorageConfig) -> Result<Self, CoreError> {
        let backend = storage::backend::FileBackend::open(&config.data_dir)?;
        info!("opened grade data at {}", backend.dir().display());
        Ok(Self::with_backend(Arc::new(backend), config))
    }

    /// Keep everything in memory (nothing persists past the process).
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()), &StorageConfig::default())
    }

    /// Use any backend, e.g. one bridged to browser local storage.
    pub fn with_backend(backend: Arc<dyn StorageBackend>, config: &StorageConfig) -> Self {
        Self {
            catalog_store: CatalogStore::new(Arc::clone(&backend), config.subjects_key.as_str()),
            history_store: HistoryStore::new(Arc::clone(&backend), config.history_key.as_str()),
            settings_store: SettingsStore::new(backend, config.theme_key.as_str()),
            grade_service: GradeService::new(),
            last_report: None,
            editing: None,
        }
    }

    pub fn catalog_store(&self) -> &CatalogStore {
        &self.catalog_store
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history_store
    }

    // ── Grade Calculation ───────────────────────────────────────────

    /// The current catalog (defaults on first use).
    pub fn catalog(&self) -> Result<Catalog, CoreError> {
        self.catalog_store.load()
    }

    /// One unselected grade row per subject, ready for the input form.
    pub fn blank_selections(&self) -> Result<Vec<GradeSelection>, CoreError> {
        Ok(GradeSelection::blank_form(&self.catalog()?))
    }

    /// Compute a result and keep it as the one on screen.
    /// A failed computation leaves the previous result in place.
    pub fn calculate(
        &mut self,
        selections: &[GradeSelection],
        prior: Option<&PriorAggregate>,
    ) -> Result<&GradeReport, CoreError> {
        let report = self.grade_service.compute(selections, prior)?;
        Ok(self.last_report.insert(report))
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&GradeReport> {
        self.last_report.as_ref()
    }

    /// Forget the result on screen (form reset).
    pub fn clear_result(&mut self) {
        self.last_report = None;
    }

    // ── History ─────────────────────────────────────────────────────

    /// Save the result on screen to history, stamped with the current time.
    pub fn save_result(&mut self) -> Result<HistoryEntry, CoreError> {
        self.save_result_at(Local::now())
    }

    /// Save the result on screen to history, stamped with `saved_at`.
    pub fn save_result_at(&mut self, saved_at: DateTime<Local>) -> Result<HistoryEntry, CoreError> {
        let report = self.last_report.as_ref().ok_or(CoreError::NothingToSave)?;
        let id = self.history_store.next_id(saved_at.timestamp_millis())?;
        let entry = HistoryEntry::from_report(report, id, saved_at);
        self.history_store.append(entry.clone())?;
        Ok(entry)
    }

    /// Saved results, most recent first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        self.history_store.load()
    }

    pub fn delete_history_entry(&self, id: i64) -> Result<Vec<HistoryEntry>, CoreError> {
        self.history_store.delete_by_id(id)
    }

    pub fn clear_history(&self) -> Result<(), CoreError> {
        self.history_store.clear()?;
        Ok(())
    }

    // ── Catalog Editor ──────────────────────────────────────────────

    /// Start editing the subject at `index`. Replaces any edit in progress.
    pub fn begin_edit(&mut self, index: usize) -> Result<Subject, CoreError> {
        let catalog = self.catalog()?;
        let subject = catalog
            .get(index)
            .cloned()
            .ok_or(CoreError::SubjectIndexOutOfRange {
                index,
                len: catalog.len(),
            })?;
        self.editing = Some(subject.id);
        Ok(subject)
    }

    /// Position of the subject being edited, if an edit is in progress.
    pub fn editing_index(&self) -> Result<Option<usize>, CoreError> {
        match self.editing {
            None => Ok(None),
            Some(id) => Ok(self.catalog()?.position_of(id)),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Add a new subject, or update the one being edited and end the edit.
    ///
    /// If the edited subject disappeared meanwhile, the edit is cancelled and
    /// `SubjectNotFound` is returned. A validation failure keeps the edit open.
    pub fn submit_subject(&mut self, name: &str, credits: f64) -> Result<Catalog, CoreError> {
        let Some(id) = self.editing else {
            return self.catalog_store.add(name, credits);
        };

        let Some(index) = self.catalog()?.position_of(id) else {
            self.editing = None;
            return Err(CoreError::SubjectNotFound(id.to_string()));
        };

        let catalog = self.catalog_store.update(index, name, credits)?;
        self.editing = None;
        Ok(catalog)
    }

    /// Delete the subject at `index`. Deleting the subject under edit cancels the edit.
    pub fn delete_subject(&mut self, index: usize) -> Result<Catalog, CoreError> {
        let target = self.catalog()?.get(index).map(|s| s.id);
        let catalog = self.catalog_store.delete(index)?;
        if target.is_some() && target == self.editing {
            self.editing = None;
        }
        Ok(catalog)
    }

    /// Restore the default subjects and cancel any edit.
    pub fn reset_catalog(&mut self) -> Result<Catalog, CoreError> {
        self.editing = None;
        let catalog = self.catalog_store.reset_to_defaults()?;
        info!("catalog reset to {} default subjects", catalog.len());
        Ok(catalog)
    }

    /// The subject under edit, as currently stored.
    pub fn editing_subject(&self) -> Result<Subject, CoreError> {
        let id = self.editing.ok_or(CoreError::NoEditInProgress)?;
        let catalog = self.catalog()?;
        catalog
            .position_of(id)
            .and_then(|i| catalog.get(i).cloned())
            .ok_or_else(|| CoreError::SubjectNotFound(id.to_string()))
    }

    // ── Theme ───────────────────────────────────────────────────────

    pub fn theme(&self) -> Result<Theme, CoreError> {
        self.settings_store.load_theme()
    }

    pub fn toggle_theme(&self) -> Result<Theme, CoreError> {
        self.settings_store.toggle_theme()
    }

    // ── Printing ────────────────────────────────────────────────────

    /// Header for a printed sheet of the result on screen.
    pub fn print_header(&self, name: &str, roll: &str) -> Result<PrintHeader, CoreError> {
        if self.last_report.is_none() {
            return Err(CoreError::NothingToSave);
        }
        Ok(PrintHeader::new(name, roll, Local::now()))
    }
}
