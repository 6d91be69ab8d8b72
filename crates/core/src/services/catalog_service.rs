use crate::errors::CoreError;
use crate::models::subject::{Catalog, Subject};

/// Validates and applies edits to a catalog in memory.
///
/// Every method validates before mutating, so a failed call leaves the
/// catalog untouched.
pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        Self
    }

    /// Append a subject. Returns the new subject's position.
    pub fn add_subject(
        &self,
        catalog: &mut Catalog,
        name: &str,
        credits: f64,
    ) -> Result<usize, CoreError> {
        let name = Self::validate_subject(name, credits)?;
        catalog.subjects.push(Subject::new(name, credits));
        Ok(catalog.subjects.len() - 1)
    }

    /// Overwrite name and credits at `index`, keeping its position and id.
    pub fn update_subject(
        &self,
        catalog: &mut Catalog,
        index: usize,
        name: &str,
        credits: f64,
    ) -> Result<(), CoreError> {
        Self::check_index(catalog, index)?;
        let name = Self::validate_subject(name, credits)?;
        let subject = &mut catalog.subjects[index];
        subject.name = name;
        subject.credits = credits;
        Ok(())
    }

    /// Remove the subject at `index`. Later subjects move down one position,
    /// so any index held for them is stale after this call.
    pub fn remove_subject(&self, catalog: &mut Catalog, index: usize) -> Result<Subject, CoreError> {
        Self::check_index(catalog, index)?;
        Ok(catalog.subjects.remove(index))
    }

    /// Check every stored subject; used when reading records back.
    pub fn validate_catalog(&self, catalog: &Catalog) -> Result<(), CoreError> {
        for (i, subject) in catalog.subjects.iter().enumerate() {
            if let Some(problem) = Self::subject_problem(&subject.name, subject.credits) {
                return Err(CoreError::ValidationError(format!("subject #{i}: {problem}")));
            }
        }
        Ok(())
    }

    /// Rules:
    /// - Name must be non-empty after trimming
    /// - Credits must be a finite number greater than zero
    ///
    /// Returns the trimmed name.
    fn validate_subject(name: &str, credits: f64) -> Result<String, CoreError> {
        match Self::subject_problem(name, credits) {
            Some(problem) => Err(CoreError::ValidationError(problem)),
            None => Ok(name.trim().to_string()),
        }
    }

    fn subject_problem(name: &str, credits: f64) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Some("Subject name must not be empty".into());
        }
        if !credits.is_finite() || credits <= 0.0 {
            return Some(format!("Credits for '{trimmed}' must be positive, got {credits}"));
        }
        None
    }

    fn check_index(catalog: &Catalog, index: usize) -> Result<(), CoreError> {
        if index >= catalog.subjects.len() {
            return Err(CoreError::SubjectIndexOutOfRange {
                index,
                len: catalog.subjects.len(),
            });
        }
        Ok(())
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}
