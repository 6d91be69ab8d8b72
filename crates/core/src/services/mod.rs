pub mod catalog_service;
pub mod grade_service;
pub mod history_service;
