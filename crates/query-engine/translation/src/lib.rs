//! Translate dashboard requests into SQL.

pub mod translation;
