//! Type definitions of a SQL AST representation, helpers to build it,
//! and its conversion to a low-level SQL string with positional parameters.

pub mod ast;
pub mod convert;
pub mod helpers;
pub mod string;
