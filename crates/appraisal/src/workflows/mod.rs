pub mod import;
pub mod performance;
