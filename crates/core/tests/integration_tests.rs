// ═══════════════════════════════════════════════════════════════════
// Integration Tests: GradeTracker facade end to end
// ═══════════════════════════════════════════════════════════════════

use std::sync::Arc;

use chrono::{Local, TimeZone};
use sgpa_calculator_core::config::{StorageConfig, DATA_DIR_ENV, DEFAULT_DATA_DIR};
use sgpa_calculator_core::errors::CoreError;
use sgpa_calculator_core::models::grade::{Grade, GradeSelection, PriorAggregate};
use sgpa_calculator_core::models::report::Band;
use sgpa_calculator_core::models::settings::Theme;
use sgpa_calculator_core::models::subject::Catalog;
use sgpa_calculator_core::storage::backend::{MemoryBackend, StorageBackend};
use sgpa_calculator_core::GradeTracker;

fn at(h: u32, m: u32, s: u32) -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2025, 5, 20, h, m, s).single().unwrap()
}

/// Fill every blank row with `grade`.
fn graded(tracker: &GradeTracker, grade: Grade) -> Vec<GradeSelection> {
    tracker
        .blank_selections()
        .unwrap()
        .into_iter()
        .map(|s| GradeSelection::new(s.credits, grade))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// Calculation flow
// ═══════════════════════════════════════════════════════════════════

mod calculation {
    use super::*;

    #[test]
    fn blank_form_cannot_be_calculated() {
        let mut tracker = GradeTracker::in_memory();
        let blank = tracker.blank_selections().unwrap();
        assert_eq!(blank.len(), 9);
        match tracker.calculate(&blank, None) {
            Err(CoreError::IncompleteSelection(missing)) => {
                assert_eq!(missing, (0..9).collect::<Vec<_>>())
            }
            other => panic!("expected IncompleteSelection, got {other:?}"),
        }
        assert!(tracker.last_report().is_none());
    }

    #[test]
    fn semester_result() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::A);
        let report = tracker.calculate(&selections, None).unwrap().clone();
        assert_eq!(report.sgpa_display(), "8.00");
        assert_eq!(report.credits_display(), "25");
        assert_eq!(report.percentage_display(), "75.00%");
        assert_eq!(report.band, Band::Excellent);
        assert_eq!(tracker.last_report(), Some(&report));
    }

    #[test]
    fn cumulative_result() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::O);
        let prior = PriorAggregate::parse("75", "8").unwrap();
        let report = tracker.calculate(&selections, Some(&prior)).unwrap().clone();
        // (8 * 75 + 10 * 25) / 100
        assert_eq!(report.cgpa_display().as_deref(), Some("8.50"));
        assert_eq!(report.sgpa_display(), "10.00");
        assert_eq!(report.credits_display(), "100");
        assert_eq!(report.band, Band::Excellent);
    }

    #[test]
    fn failed_calculation_keeps_previous_result() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::B);
        tracker.calculate(&selections, None).unwrap();
        assert!(tracker.calculate(&[], None).is_err());
        assert_eq!(tracker.last_report().unwrap().sgpa_display(), "6.00");
    }

    #[test]
    fn clear_result() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::B);
        tracker.calculate(&selections, None).unwrap();
        tracker.clear_result();
        assert!(tracker.last_report().is_none());
    }

    #[test]
    fn empty_catalog_is_zero_credits() {
        let mut tracker = GradeTracker::in_memory();
        for _ in 0..9 {
            tracker.delete_subject(0).unwrap();
        }
        let blank = tracker.blank_selections().unwrap();
        assert!(blank.is_empty());
        assert!(matches!(
            tracker.calculate(&blank, None),
            Err(CoreError::ZeroCredits)
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// History flow
// ═══════════════════════════════════════════════════════════════════

mod history {
    use super::*;

    #[test]
    fn save_requires_result() {
        let mut tracker = GradeTracker::in_memory();
        assert!(matches!(tracker.save_result(), Err(CoreError::NothingToSave)));
        assert!(tracker.history().unwrap().is_empty());
    }

    #[test]
    fn save_snapshots_result() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::APlus);
        tracker.calculate(&selections, None).unwrap();
        let saved = tracker.save_result_at(at(10, 30, 0)).unwrap();

        assert_eq!(saved.id, at(10, 30, 0).timestamp_millis());
        assert_eq!(saved.date, "20/05/2025, 10:30:00");
        assert_eq!(saved.sgpa, "9.00");
        assert_eq!(saved.cgpa, None);
        assert_eq!(saved.percentage, "85.00%");
        assert_eq!(saved.credits, 25.0);
        assert_eq!(tracker.history().unwrap(), vec![saved]);
    }

    #[test]
    fn newest_first_with_unique_ids() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::A);
        tracker.calculate(&selections, None).unwrap();
        let first = tracker.save_result_at(at(9, 0, 0)).unwrap();
        // Same clock reading: the id still moves forward
        let second = tracker.save_result_at(at(9, 0, 0)).unwrap();
        assert_eq!(second.id, first.id + 1);

        let ids: Vec<i64> = tracker.history().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn delete_and_clear() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::A);
        tracker.calculate(&selections, None).unwrap();
        let r1 = tracker.save_result_at(at(9, 0, 0)).unwrap();
        let r2 = tracker.save_result_at(at(9, 5, 0)).unwrap();

        let remaining = tracker.delete_history_entry(r1.id).unwrap();
        assert_eq!(remaining, vec![r2]);

        tracker.clear_history().unwrap();
        assert!(tracker.history().unwrap().is_empty());
    }

    #[test]
    fn cumulative_headline() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::O);
        let prior = PriorAggregate::new(75.0, 8.0).unwrap();
        tracker.calculate(&selections, Some(&prior)).unwrap();
        let saved = tracker.save_result_at(at(11, 0, 0)).unwrap();
        assert_eq!(saved.headline(), "CGPA: 8.50");
    }

    #[test]
    fn save_after_clear_result_fails() {
        let mut tracker = GradeTracker::in_memory();
        let selections = graded(&tracker, Grade::A);
        tracker.calculate(&selections, None).unwrap();
        tracker.clear_result();
        assert!(matches!(tracker.save_result(), Err(CoreError::NothingToSave)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Catalog editor
// ═══════════════════════════════════════════════════════════════════

mod editor {
    use super::*;

    #[test]
    fn submit_without_edit_adds() {
        let mut tracker = GradeTracker::in_memory();
        let catalog = tracker.submit_subject("Compiler Design", 4.0).unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.subjects[9].name, "Compiler Design");
    }

    #[test]
    fn edit_updates_in_place_and_ends() {
        let mut tracker = GradeTracker::in_memory();
        let subject = tracker.begin_edit(3).unwrap();
        assert_eq!(subject.name, "Object-Oriented Programming");
        assert_eq!(tracker.editing_index().unwrap(), Some(3));

        let catalog = tracker.submit_subject("OOP with Java", 4.0).unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.subjects[3].name, "OOP with Java");
        assert_eq!(catalog.subjects[3].id, subject.id);
        assert_eq!(tracker.editing_index().unwrap(), None);
    }

    #[test]
    fn edit_follows_subject_when_earlier_row_deleted() {
        let mut tracker = GradeTracker::in_memory();
        let subject = tracker.begin_edit(3).unwrap();
        tracker.delete_subject(0).unwrap();
        assert_eq!(tracker.editing_index().unwrap(), Some(2));

        let catalog = tracker.submit_subject("OOP", 3.0).unwrap();
        assert_eq!(catalog.subjects[2].id, subject.id);
        assert_eq!(catalog.subjects[2].name, "OOP");
        assert_eq!(catalog.subjects[3].name, "Software Engineering");
    }

    #[test]
    fn deleting_edited_subject_cancels_edit() {
        let mut tracker = GradeTracker::in_memory();
        tracker.begin_edit(3).unwrap();
        tracker.delete_subject(3).unwrap();
        assert_eq!(tracker.editing_index().unwrap(), None);
        assert!(matches!(
            tracker.editing_subject(),
            Err(CoreError::NoEditInProgress)
        ));

        // Next submit is an add, not an update of a shifted row
        let catalog = tracker.submit_subject("Networks", 3.0).unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.subjects[8].name, "Networks");
        assert_eq!(catalog.subjects[3].name, "Software Engineering");
    }

    #[test]
    fn reset_cancels_edit() {
        let mut tracker = GradeTracker::in_memory();
        tracker.submit_subject("Extra", 2.0).unwrap();
        tracker.begin_edit(1).unwrap();
        let catalog = tracker.reset_catalog().unwrap();
        assert_eq!(catalog, Catalog::defaults());
        assert_eq!(tracker.editing_index().unwrap(), None);
    }

    #[test]
    fn reset_twice_is_stable() {
        let mut tracker = GradeTracker::in_memory();
        let first = tracker.reset_catalog().unwrap();
        let second = tracker.reset_catalog().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_submit_keeps_edit_open() {
        let mut tracker = GradeTracker::in_memory();
        tracker.begin_edit(1).unwrap();
        assert!(matches!(
            tracker.submit_subject("  ", 3.0),
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(tracker.editing_index().unwrap(), Some(1));
        assert_eq!(
            tracker.editing_subject().unwrap().name,
            "Data Structures & Algorithms"
        );
    }

    #[test]
    fn cancel_edit() {
        let mut tracker = GradeTracker::in_memory();
        tracker.begin_edit(0).unwrap();
        tracker.cancel_edit();
        assert_eq!(tracker.editing_index().unwrap(), None);
        let catalog = tracker.submit_subject("New", 1.0).unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.subjects[0].name, "Discrete Mathematics");
    }

    #[test]
    fn begin_edit_out_of_range() {
        let mut tracker = GradeTracker::in_memory();
        assert!(matches!(
            tracker.begin_edit(9),
            Err(CoreError::SubjectIndexOutOfRange { index: 9, len: 9 })
        ));
        assert_eq!(tracker.editing_index().unwrap(), None);
    }

    #[test]
    fn edit_on_record_without_ids() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        backend
            .write(
                "subjects",
                r#"{"version":2,"subjects":[{"name":"Compilers","credits":4},{"name":"Networks","credits":3}]}"#,
            )
            .unwrap();
        let mut tracker = GradeTracker::with_backend(backend, &StorageConfig::default());

        tracker.begin_edit(1).unwrap();
        let catalog = tracker.submit_subject("Computer Networks", 3.0).unwrap();
        assert_eq!(catalog.subjects[1].name, "Computer Networks");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn edited_subject_removed_behind_our_back() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let config = StorageConfig::default();
        let mut tracker = GradeTracker::with_backend(Arc::clone(&backend), &config);
        tracker.begin_edit(2).unwrap();

        // Another handle on the same storage deletes the row
        let other = GradeTracker::with_backend(backend, &config);
        other.catalog_store().delete(2).unwrap();

        assert!(matches!(
            tracker.submit_subject("DBMS", 3.0),
            Err(CoreError::SubjectNotFound(_))
        ));
        assert_eq!(tracker.editing_index().unwrap(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Theme, printing, configuration, persistence
// ═══════════════════════════════════════════════════════════════════

mod shell_support {
    use super::*;

    #[test]
    fn theme_toggle() {
        let tracker = GradeTracker::in_memory();
        assert_eq!(tracker.theme().unwrap(), Theme::Light);
        assert_eq!(tracker.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(tracker.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn print_header_requires_result() {
        let mut tracker = GradeTracker::in_memory();
        assert!(matches!(
            tracker.print_header("Asha", "42"),
            Err(CoreError::NothingToSave)
        ));
        let selections = graded(&tracker, Grade::A);
        tracker.calculate(&selections, None).unwrap();
        let header = tracker.print_header("Asha K", "").unwrap();
        assert_eq!(header.file_stem(), "Asha_K_N_A_Result");
    }

    #[test]
    fn default_config() {
        let c = StorageConfig::default();
        assert_eq!(c.data_dir, std::path::PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(c.subjects_key, "subjects");
        assert_eq!(c.history_key, "grade_history");
        assert_eq!(c.theme_key, "theme");
        assert_eq!(DATA_DIR_ENV, "SGPA_DATA_DIR");
    }

    #[test]
    fn data_dir_from_environment() {
        std::env::set_var(DATA_DIR_ENV, "  /tmp/sgpa-env-test ");
        let from_env = StorageConfig::from_env();
        std::env::set_var(DATA_DIR_ENV, "   ");
        let blank = StorageConfig::from_env();
        std::env::remove_var(DATA_DIR_ENV);

        assert_eq!(
            from_env.data_dir,
            std::path::PathBuf::from("/tmp/sgpa-env-test")
        );
        assert_eq!(blank.data_dir, std::path::PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(from_env.history_key, "grade_history");
    }

    #[test]
    fn custom_keys_are_used() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let config = StorageConfig {
            subjects_key: "sem5_subjects".into(),
            ..StorageConfig::default()
        };
        let tracker = GradeTracker::with_backend(Arc::clone(&backend), &config);
        tracker.catalog().unwrap();
        assert!(backend.read("sem5_subjects").unwrap().is_some());
        assert!(backend.read("subjects").unwrap().is_none());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::default().with_data_dir(dir.path());

        {
            let mut tracker = GradeTracker::open(&config).unwrap();
            tracker.submit_subject("Compiler Design", 4.0).unwrap();
            let selections = graded(&tracker, Grade::A);
            tracker.calculate(&selections, None).unwrap();
            tracker.save_result_at(at(12, 0, 0)).unwrap();
            tracker.toggle_theme().unwrap();
        }

        let tracker = GradeTracker::open(&config).unwrap();
        let catalog = tracker.catalog().unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.total_credits(), 29.0);
        let history = tracker.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].credits_display(), "29");
        assert_eq!(tracker.theme().unwrap(), Theme::Dark);
        assert!(dir.path().join("subjects.json").is_file());
        assert!(dir.path().join("grade_history.json").is_file());
        assert!(dir.path().join("theme.json").is_file());
    }

    #[test]
    fn debug_output() {
        let tracker = GradeTracker::in_memory();
        let debug = format!("{tracker:?}");
        assert!(debug.contains("GradeTracker"));
        assert!(debug.contains("grade_history"));
    }
}
