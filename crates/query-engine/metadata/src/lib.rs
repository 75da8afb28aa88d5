//! Metadata about the database: the disease table we filter and the schema we describe to the
//! language model.

pub mod metadata;
