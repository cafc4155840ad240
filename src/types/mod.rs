//! Type definitions for the salary predictor

pub mod prediction;
pub mod record;
pub mod table;

pub use prediction::IncomeBracket;
pub use record::EmployeeRecord;
pub use table::Table;
