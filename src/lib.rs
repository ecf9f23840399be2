//! isoplot: validation and layout of HIV splicing isoform and proviral landscape plots.
//!
//! Isoform descriptions flow through [`lexer`] → [`sections`] → [`parser`]
//! → [`compiler`]; [`pipeline`] runs all four stages. Proviral landscape
//! tables are handled by [`landscape`].

pub mod error;

pub mod ast;
pub mod cli;
pub mod colour;
pub mod compiler;
pub mod config;
pub mod defect;
pub mod landscape;
pub mod lexer;
pub mod nl43;
pub mod parser;
pub mod pipeline;
pub mod sections;
