//! formflow-xml - XML layer for IntelliSOURCE enrollment and scheduling
//!
//! Parses vendor responses into a generic [`Node`] tree, normalizes the
//! common responses into fixed-shape results, and builds outbound request
//! documents.
//!
//! # Quick Start
//!
//! ```
//! use formflow_xml::{build_request, parse_scheduling, NodeMap};
//! # fn main() -> Result<(), formflow_xml::Error> {
//! let result = parse_scheduling(
//!     "<response><scheduling><fsr>F1</fsr>\
//!      <slots><slot><date>2024-05-01</date></slot></slots></scheduling></response>",
//! )?;
//! assert_eq!(result.fsr, "F1");
//! assert_eq!(result.slots.len(), 1);
//!
//! let mut request = NodeMap::new();
//! request.insert("caNo", "1234567890");
//! let xml = build_request(&request);
//! assert!(xml.contains("<request><caNo>1234567890</caNo></request>"));
//! # Ok(())
//! # }
//! ```
//!
//! Parsing never resolves DOCTYPE-declared entities and performs no I/O.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;

pub mod node;
pub use node::{Node, NodeMap};

pub mod xml;
pub use xml::{
    Config, Content as XmlContent, Diagnostic, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

pub mod tree;
pub use tree::{child_to_node, element_to_node, parse, parse_with_config};

pub mod builder;
pub use builder::{build, build_request, DEFAULT_ROOT};

pub mod normalize;
pub use normalize::{
    parse_enrollment, parse_scheduling, parse_validation, EnrollmentResult, SchedulingResult,
    Slot, ValidationResult,
};

/// Parse XML into its document model without converting to a [`Node`]
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML bytes into its document model
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}
