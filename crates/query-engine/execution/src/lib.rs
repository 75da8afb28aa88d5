//! Run statements against a PostgreSQL database, describe its schema and turn questions into
//! statements through a completion service.

pub mod completion;
pub mod connection;
pub mod error;
pub mod execution;
pub mod introspection;
pub mod metrics;
pub mod natural_language;
pub mod postgres;
pub mod result_set;

pub use error::Error;
