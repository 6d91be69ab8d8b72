pub mod backend;
pub mod catalog_store;
pub mod format;
pub mod history_store;
pub mod settings_store;
