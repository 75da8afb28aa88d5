//! Translate filter criteria and language model output into statements to be run against
//! the database.

pub mod error;
pub mod filters;
pub mod natural_language;
pub mod query;
