pub mod query;
pub mod student;
pub mod validation;
