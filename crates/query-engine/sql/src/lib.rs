//! SQL AST and its conversion to a parameterized SQL string.

pub mod sql;
