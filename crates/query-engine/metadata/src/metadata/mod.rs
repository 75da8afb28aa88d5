//! Metadata information regarding the database and tracked information.

pub mod schema;
pub mod table;

// re-export without modules
pub use schema::*;
pub use table::*;
