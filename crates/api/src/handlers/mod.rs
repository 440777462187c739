pub mod dashboard;
pub mod track;
