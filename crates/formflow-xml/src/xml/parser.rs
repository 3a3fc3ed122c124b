//! XML parser implementation
//!
//! A small non-validating parser for vendor responses. It never fetches
//! anything and never expands entities declared in a DOCTYPE: the
//! declaration is skipped and any reference to a non-predefined entity is a
//! parse error.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::{is_valid_name, Cursor};
use crate::xml::model::{Content, Document, Element};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Limits applied while parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Severity of a parser finding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Recovered from; the document still parses
    Warning,
    /// Parsing stopped here
    Fatal,
}

/// A finding recorded while parsing one document
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub pos: Pos,
}

impl Diagnostic {
    fn warning(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            pos,
        }
    }

    fn fatal(error: &Error) -> Self {
        Self {
            severity: Severity::Fatal,
            message: error.message().to_string(),
            pos: error.span().start,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse an XML document
    ///
    /// Diagnostics start empty on every call. On failure the returned error
    /// is the first fatal diagnostic.
    pub fn parse(&mut self) -> Result<Document> {
        self.diagnostics.clear();
        self.depth = 0;

        let result = self.parse_document();
        if let Err(err) = &result {
            self.diagnostics.push(Diagnostic::fatal(err));
        }

        for diagnostic in &self.diagnostics {
            debug!(
                severity = ?diagnostic.severity,
                line = diagnostic.pos.line,
                col = diagnostic.pos.col,
                "{}",
                diagnostic.message
            );
        }

        result
    }

    /// Findings from the most recent `parse` call
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn parse_document(&mut self) -> Result<Document> {
        let len = self.cursor.remaining().len();
        if self.config.max_size > 0 && len > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        if self.cursor.starts_with(UTF8_BOM) {
            self.cursor.advance_by(UTF8_BOM.len());
        }

        self.skip_misc(true)?;

        match self.cursor.current() {
            None => return Err(Error::at(ErrorKind::MissingRoot, self.cursor.position())),
            Some(b'<') => {}
            Some(_) => {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "start tag expected, '<' not found",
                ))
            }
        }

        let root = self.parse_element()?;
        self.skip_misc(false)?;

        if !self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::TrailingContent, self.cursor.position()));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments, processing instructions and (in the
    /// prolog only) a single DOCTYPE declaration.
    fn skip_misc(&mut self, mut allow_doctype: bool) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if allow_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
                allow_doctype = false;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        self.enter_element()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.exit_element();
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here(
                    ErrorKind::UnexpectedEof,
                    format!("premature end of data in tag {name}"),
                ));
            }

            if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: name,
                            found: close_name,
                        },
                        pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<![CDATA[") {
                let text = self.parse_cdata()?;
                if !text.is_empty() {
                    children.push(Content::Text(text));
                }
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "markup declaration not allowed in content",
                ));
            } else if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
            } else {
                let text = self.parse_text()?;
                children.push(Content::Text(text));
            }
        }

        self.exit_element();
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn enter_element(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.cursor.position(),
            ));
        }
        Ok(())
    }

    fn exit_element(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(
                        self.error_here(ErrorKind::UnexpectedEof, "unexpected end of input in tag")
                    )
                }
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => {
                return Err(
                    self.error_here(ErrorKind::UnexpectedToken, "expected quoted attribute value")
                )
            }
        };
        self.cursor.advance();

        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_str(raw, pos)?.replace(['\t', '\n', '\r'], " ");
                return decode_entities(&text, pos);
            }
            if b == b'<' {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "'<' not allowed in attribute value",
                ));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated attribute value"))
    }

    /// Character data up to the next `<`, whitespace included
    fn parse_text(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_str(raw, pos)?;
        decode_entities(&text.replace("\r\n", "\n"), pos)
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return Ok(bytes_to_str(raw, pos)?.replace("\r\n", "\n"));
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated CDATA section"))
    }

    /// Scan a name by byte class, then check it against the XML 1.0 name
    /// character ranges
    fn parse_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start_byte(first) => self.cursor.advance(),
            Some(_) => {
                return Err(self.error_here(
                    ErrorKind::UnexpectedToken,
                    "invalid element or attribute name",
                ))
            }
            None => return Err(self.error_here(ErrorKind::UnexpectedEof, "expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_byte(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let name = bytes_to_str(self.cursor.slice_from(start), pos)?;
        if !is_valid_name(&name) {
            return Err(Error::with_message(
                ErrorKind::UnexpectedToken,
                Span::at(pos),
                format!("invalid element or attribute name '{name}'"),
            ));
        }
        Ok(name)
    }

    /// Skip `<!DOCTYPE ...>` including an internal subset.
    ///
    /// Entity declarations are noted as warnings and otherwise dropped.
    fn skip_doctype(&mut self) -> Result<()> {
        let doctype_pos = self.cursor.position();
        self.cursor.advance_by(b"<!DOCTYPE".len());
        self.diagnostics
            .push(Diagnostic::warning("DOCTYPE declaration ignored", doctype_pos));

        let mut quote: Option<u8> = None;
        let mut subset_depth = 0usize;
        while let Some(b) = self.cursor.current() {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                self.cursor.advance();
                continue;
            }

            if subset_depth > 0 && self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
                continue;
            }

            if subset_depth > 0 && self.cursor.starts_with(b"<!ENTITY") {
                let pos = self.cursor.position();
                self.cursor.advance_by(b"<!ENTITY".len());
                self.cursor.skip_whitespace();
                if self.cursor.consume(b'%') {
                    self.cursor.skip_whitespace();
                }
                let name = self.parse_name().unwrap_or_default();
                self.diagnostics.push(Diagnostic::warning(
                    format!("entity declaration '{name}' ignored"),
                    pos,
                ));
                continue;
            }

            match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => subset_depth += 1,
                b']' => subset_depth = subset_depth.saturating_sub(1),
                b'>' if subset_depth == 0 => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => {}
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated DOCTYPE declaration"))
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!--".len());
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<?".len());
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => Err(self.error_here(
                ErrorKind::UnexpectedToken,
                format!("expected '{}'", char::from(expected)),
            )),
            None => Err(self.error_here(ErrorKind::UnexpectedEof, "unexpected end of input")),
        }
    }

    fn error_here(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

fn bytes_to_str(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start_byte(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_byte(b: u8) -> bool {
    is_name_start_byte(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Decode the five predefined entities and numeric character references.
///
/// Any other reference is rejected; DOCTYPE-declared entities are never
/// expanded.
fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);

        let after = after.get(1..).unwrap_or_default();
        let Some(semi) = after.find(';') else {
            return Err(Error::with_message(
                ErrorKind::UnexpectedToken,
                Span::at(pos),
                "entity reference not terminated by ';'",
            ));
        };
        let (entity, tail) = after.split_at(semi);

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::at(
                    ErrorKind::UndefinedEntity {
                        name: entity.to_string(),
                    },
                    pos,
                ));
            }
        }

        rest = tail.get(1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.filter(|c| *c != 0).and_then(char::from_u32)
}
