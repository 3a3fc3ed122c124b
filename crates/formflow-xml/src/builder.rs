//! Outbound request serialization
//!
//! Turns a [`NodeMap`] into an XML document. `@`-prefixed keys become
//! attributes of the enclosing element, lists become repeated siblings and
//! everything else becomes child elements.

use tracing::{instrument, trace};

use crate::lexer::{is_name_char, is_name_start_char};
use crate::node::{Node, NodeMap, ATTRIBUTE_PREFIX};

/// Root element name used for vendor requests
pub const DEFAULT_ROOT: &str = "request";

/// Declaration written at the start of every document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Build a request document with the `request` root element
pub fn build_request(data: &NodeMap) -> String {
    build(data, DEFAULT_ROOT)
}

/// Build an XML document from `data` under a root element named `root`.
///
/// The output is well-formed for any input: names that are not valid XML
/// names are rewritten, and text is escaped.
#[instrument(level = "debug", skip(data), fields(entries = data.len()))]
pub fn build(data: &NodeMap, root: &str) -> String {
    let mut output = String::with_capacity(64 + data.len() * 32);
    output.push_str(XML_DECLARATION);
    output.push('\n');
    write_element(&sanitize_name(root), data, &mut output);
    output.push('\n');
    trace!(bytes = output.len(), "request built");
    output
}

fn write_element(name: &str, map: &NodeMap, output: &mut String) {
    output.push('<');
    output.push_str(name);

    let mut written: Vec<String> = Vec::new();
    for (key, value) in map.attributes() {
        let attr = sanitize_name(key);
        if written.contains(&attr) {
            continue;
        }
        output.push(' ');
        output.push_str(&attr);
        output.push_str("=\"");
        output.push_str(&escape_xml(value.text().unwrap_or_default()));
        output.push('"');
        written.push(attr);
    }

    let mut body = String::new();
    for (key, value) in map {
        if key.starts_with(ATTRIBUTE_PREFIX) {
            continue;
        }
        write_child(&sanitize_name(key), value, &mut body);
    }

    if body.is_empty() {
        output.push_str("/>");
    } else {
        output.push('>');
        output.push_str(&body);
        output.push_str("</");
        output.push_str(name);
        output.push('>');
    }
}

fn write_child(name: &str, value: &Node, output: &mut String) {
    match value {
        Node::Map(map) => write_element(name, map, output),
        Node::List(items) => {
            for item in items {
                write_child(name, item, output);
            }
        }
        Node::Text(text) => write_text_element(name, text, output),
    }
}

fn write_text_element(name: &str, text: &str, output: &mut String) {
    output.push('<');
    output.push_str(name);
    if text.is_empty() {
        output.push_str("/>");
        return;
    }
    output.push('>');
    output.push_str(&escape_xml(text));
    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

/// Escape markup characters and drop characters XML 1.0 cannot carry
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            ch if is_xml_char(ch) => escaped.push(ch),
            _ => {}
        }
    }
    escaped
}

fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Rewrite `name` into a valid XML element or attribute name
pub fn sanitize_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len() + 1);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 && !is_name_start_char(ch) {
            sanitized.push('_');
            if is_name_char(ch) {
                sanitized.push(ch);
            }
        } else if is_name_char(ch) {
            sanitized.push(ch);
        } else {
            sanitized.push('_');
        }
    }
    if sanitized.is_empty() {
        sanitized.push('_');
    }
    sanitized
}
