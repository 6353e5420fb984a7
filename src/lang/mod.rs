/*!
# PostC Language Module

This module provides lexical analysis and parsing of PostC source text.

*/

#[macro_use]
mod error;
mod lex;
mod parse;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use parse::parse;

pub mod ast;
pub mod token;

/// Source location as (line, column), both 1-based.
pub type Position = (usize, usize);
