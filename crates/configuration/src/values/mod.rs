mod connection;
mod generation;
mod secret;

pub use connection::{ConnectionUri, DatabasePassword, DatabaseUsername, SslMode};
pub use generation::{ApiKey, GeneratedSqlPolicy};
pub use secret::Secret;
