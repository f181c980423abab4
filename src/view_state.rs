pub mod delete;
pub mod downloads;
pub mod form;
pub mod list;
