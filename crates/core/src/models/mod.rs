pub mod grade;
pub mod history;
pub mod report;
pub mod settings;
pub mod subject;
