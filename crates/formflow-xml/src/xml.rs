//! XML document model and parser

pub mod model;
pub mod parser;

pub use model::{Content, Document, Element};
pub use parser::{Config, Diagnostic, Parser, Severity};
