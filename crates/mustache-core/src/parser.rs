/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The template parser.
//!
//! A single-pass scanner over the source text that produces an [`Ast`].
//! The parser is line-oriented: at the start of each line it looks for a
//! standalone tag (a structural tag alone on its line, whose surrounding
//! whitespace is elided from output); mid-line it accumulates literal text
//! until the next tag, line break or end of input.
//!
//! Delimiters are configurable and may change mid-document via the
//! `{{=<% %>=}}` directive. Open sections are tracked on an explicit
//! frame stack rather than through call-stack recursion, so arbitrarily
//! deep nesting cannot overflow the stack.

use crate::ast::{Ast, Identifier, Node};
use crate::error::{ParseError, ParseResult};

/// Default opening delimiter.
pub const DEFAULT_OPEN_DELIMITER: &str = "{{";

/// Default closing delimiter.
pub const DEFAULT_CLOSE_DELIMITER: &str = "}}";

/// Parser configuration: the initial delimiter pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Delimiter opening a tag. Defaults to `{{`.
    pub open_delimiter: String,
    /// Delimiter closing a tag. Defaults to `}}`.
    pub close_delimiter: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            open_delimiter: DEFAULT_OPEN_DELIMITER.to_string(),
            close_delimiter: DEFAULT_CLOSE_DELIMITER.to_string(),
        }
    }
}

impl ParserConfig {
    /// Create a configuration with a custom starting delimiter pair.
    pub fn new(open_delimiter: impl Into<String>, close_delimiter: impl Into<String>) -> Self {
        Self {
            open_delimiter: open_delimiter.into(),
            close_delimiter: close_delimiter.into(),
        }
    }
}

/// Parse template source using the default `{{` / `}}` delimiters.
///
/// `source_name` is carried into error messages only; it is never
/// interpreted.
pub fn parse(source_name: &str, input: &str) -> ParseResult<Ast> {
    parse_with_config(&ParserConfig::default(), source_name, input)
}

/// Parse template source with an explicit starting delimiter pair.
pub fn parse_with_config(
    config: &ParserConfig,
    source_name: &str,
    input: &str,
) -> ParseResult<Ast> {
    Parser::new(config, source_name, input).run()
}

/// A tag recognized between delimiters, before it is applied to the
/// parser state.
enum Tag {
    SectionOpen(Identifier),
    SectionClose(Identifier),
    InvertedOpen(Identifier),
    Variable { escape: bool, id: Identifier },
    Partial(String),
    SetDelimiters(String, String),
    Comment,
}

impl Tag {
    /// Whether this tag participates in standalone-line whitespace
    /// elision. Variable tags never do.
    fn elides_whitespace(&self) -> bool {
        !matches!(self, Tag::Variable { .. })
    }
}

/// An open section awaiting its closing tag.
struct Frame {
    id: Identifier,
    inverted: bool,
    /// Byte offset of the opening tag, for the unclosed-section error.
    open_offset: usize,
    /// Body nodes collected so far.
    nodes: Vec<Node>,
}

struct Parser<'a> {
    input: &'a str,
    source_name: &'a str,
    pos: usize,
    open_delim: String,
    close_delim: String,
    /// Literal text not yet flushed into a `Text` node.
    pending: String,
    at_line_start: bool,
    /// Open sections, innermost last.
    frames: Vec<Frame>,
    /// Completed top-level nodes.
    finished: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(config: &ParserConfig, source_name: &'a str, input: &'a str) -> Self {
        Self {
            input,
            source_name,
            pos: 0,
            open_delim: config.open_delimiter.clone(),
            close_delim: config.close_delimiter.clone(),
            pending: String::new(),
            at_line_start: true,
            frames: Vec::new(),
            finished: Vec::new(),
        }
    }

    fn run(mut self) -> ParseResult<Ast> {
        while self.pos < self.input.len() {
            if self.at_line_start {
                self.line_start()?;
            } else {
                self.line_body()?;
            }
        }
        if let Some(frame) = self.frames.last() {
            return Err(self.error_at(
                frame.open_offset,
                format!("section '{}' is not closed at end of input", frame.id),
            ));
        }
        self.flush_pending();
        Ok(self.finished)
    }

    /// Start-of-line mode: attempt standalone-tag detection.
    ///
    /// Consumes leading whitespace; if a standalone-eligible tag follows
    /// and the rest of the line is blank, the surrounding whitespace and
    /// line break are elided. Otherwise the whitespace is pushed back
    /// into the pending buffer and parsing continues mid-line.
    fn line_start(&mut self) -> ParseResult<()> {
        let input = self.input;
        let ws_start = self.pos;
        while matches!(input[self.pos..].chars().next(), Some(' ' | '\t')) {
            self.pos += 1;
        }
        let ws_end = self.pos;

        if input[self.pos..].starts_with(&self.open_delim) {
            let tag_offset = self.pos;
            let tag = self.read_tag()?;
            if tag.elides_whitespace() && self.rest_of_line_blank() {
                self.consume_line_end();
                self.apply_tag(tag, tag_offset)?;
            } else {
                self.pending.push_str(&input[ws_start..ws_end]);
                self.at_line_start = false;
                self.apply_tag(tag, tag_offset)?;
            }
        } else {
            self.pending.push_str(&input[ws_start..ws_end]);
            self.at_line_start = false;
        }
        Ok(())
    }

    /// Mid-line mode: accumulate literal text until the next tag, line
    /// break or end of input.
    fn line_body(&mut self) -> ParseResult<()> {
        let input = self.input;
        let rest = &input[self.pos..];
        let delim_at = rest.find(self.open_delim.as_str());
        let newline_at = rest.find('\n');

        match (delim_at, newline_at) {
            (Some(d), None) => {
                self.pending.push_str(&rest[..d]);
                self.pos += d;
                let tag_offset = self.pos;
                let tag = self.read_tag()?;
                self.apply_tag(tag, tag_offset)?;
            }
            (Some(d), Some(n)) if d < n => {
                self.pending.push_str(&rest[..d]);
                self.pos += d;
                let tag_offset = self.pos;
                let tag = self.read_tag()?;
                self.apply_tag(tag, tag_offset)?;
            }
            (_, Some(n)) => {
                // Line terminator (any CR is part of the slice) is kept
                // verbatim in the literal text.
                self.pending.push_str(&rest[..=n]);
                self.pos += n + 1;
                self.at_line_start = true;
            }
            (None, None) => {
                self.pending.push_str(rest);
                self.pos = input.len();
            }
        }
        Ok(())
    }

    /// Read one tag starting at the opening delimiter, consuming through
    /// the closing delimiter. Dispatches on the sigil character.
    fn read_tag(&mut self) -> ParseResult<Tag> {
        let input = self.input;
        let tag_offset = self.pos;
        self.pos += self.open_delim.len();

        let sigil = match input[self.pos..].chars().next() {
            Some(c) => c,
            None => {
                return Err(self.error_at(tag_offset, "unterminated tag at end of input".to_string()));
            }
        };

        match sigil {
            '#' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                let id = self.identifier(&content, tag_offset)?;
                Ok(Tag::SectionOpen(id))
            }
            '/' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                let id = self.identifier(&content, tag_offset)?;
                Ok(Tag::SectionClose(id))
            }
            '&' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                let id = self.identifier(&content, tag_offset)?;
                Ok(Tag::Variable { escape: false, id })
            }
            '{' => {
                self.pos += 1;
                let rest = &input[self.pos..];
                let end = match rest.find('}') {
                    Some(end) => end,
                    None => {
                        return Err(self.error_at(
                            tag_offset,
                            format!("unterminated tag: expected '}}{}'", self.close_delim),
                        ));
                    }
                };
                let content = rest[..end].to_string();
                self.pos += end + 1;
                if !input[self.pos..].starts_with(&self.close_delim) {
                    return Err(self.error_at(
                        tag_offset,
                        format!("expected '{}' after '}}'", self.close_delim),
                    ));
                }
                self.pos += self.close_delim.len();
                let id = self.identifier(&content, tag_offset)?;
                Ok(Tag::Variable { escape: false, id })
            }
            '>' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                let name = content.trim();
                if name.is_empty() {
                    return Err(self.error_at(tag_offset, "partial tag has an empty name".to_string()));
                }
                Ok(Tag::Partial(name.to_string()))
            }
            '=' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                self.delimiters_from(&content, tag_offset)
            }
            '^' => {
                self.pos += 1;
                let content = self.tag_content(tag_offset)?;
                let id = self.identifier(&content, tag_offset)?;
                if id == Identifier::Implicit {
                    return Err(
                        self.error_at(tag_offset, "inverted sections cannot be implicit".to_string())
                    );
                }
                Ok(Tag::InvertedOpen(id))
            }
            '!' => {
                self.pos += 1;
                // Comment text is consumed verbatim and discarded.
                self.tag_content(tag_offset)?;
                Ok(Tag::Comment)
            }
            _ => {
                let content = self.tag_content(tag_offset)?;
                let id = self.identifier(&content, tag_offset)?;
                Ok(Tag::Variable { escape: true, id })
            }
        }
    }

    /// Consume and return the text between the current position and the
    /// closing delimiter, advancing past the delimiter.
    fn tag_content(&mut self, tag_offset: usize) -> ParseResult<String> {
        let rest = &self.input[self.pos..];
        match rest.find(self.close_delim.as_str()) {
            Some(end) => {
                let content = rest[..end].to_string();
                self.pos += end + self.close_delim.len();
                Ok(content)
            }
            None => Err(self.error_at(
                tag_offset,
                format!("unterminated tag: missing closing delimiter '{}'", self.close_delim),
            )),
        }
    }

    /// Parse an identifier from raw tag content: either the implicit
    /// marker `.` or one or more non-empty dot-separated segments.
    fn identifier(&self, raw: &str, tag_offset: usize) -> ParseResult<Identifier> {
        let text = raw.trim();
        if text == "." {
            return Ok(Identifier::Implicit);
        }
        if text.is_empty() {
            return Err(self.error_at(tag_offset, "empty identifier in tag".to_string()));
        }
        let mut segments = Vec::new();
        for segment in text.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(
                    self.error_at(tag_offset, format!("empty segment in identifier '{}'", text))
                );
            }
            if segment.chars().any(char::is_whitespace) {
                return Err(self.error_at(
                    tag_offset,
                    format!("unexpected whitespace in identifier segment '{}'", segment),
                ));
            }
            segments.push(segment.to_string());
        }
        Ok(Identifier::Named(segments))
    }

    /// Parse a delimiter-change directive body: `<open> <close>=`
    /// (the leading `=` sigil has already been consumed).
    fn delimiters_from(&self, content: &str, tag_offset: usize) -> ParseResult<Tag> {
        let body = match content.trim().strip_suffix('=') {
            Some(body) => body,
            None => {
                return Err(self.error_at(
                    tag_offset,
                    "malformed delimiter change: expected '=' before the closing delimiter"
                        .to_string(),
                ));
            }
        };
        let mut parts = body.split_whitespace();
        let (open, close) = match (parts.next(), parts.next(), parts.next()) {
            (Some(open), Some(close), None) => (open, close),
            _ => {
                return Err(self.error_at(
                    tag_offset,
                    "malformed delimiter change: expected exactly two delimiters".to_string(),
                ));
            }
        };
        for delim in [open, close] {
            for c in delim.chars() {
                if c.is_alphanumeric() || c == '.' {
                    return Err(self.error_at(
                        tag_offset,
                        format!("invalid character '{}' in delimiter '{}'", c, delim),
                    ));
                }
            }
        }
        Ok(Tag::SetDelimiters(open.to_string(), close.to_string()))
    }

    /// True when only spaces/tabs remain before the next line break or
    /// end of input.
    fn rest_of_line_blank(&self) -> bool {
        let trimmed = self.input[self.pos..].trim_start_matches([' ', '\t']);
        trimmed.is_empty() || trimmed.starts_with('\n') || trimmed.starts_with("\r\n")
    }

    /// Consume trailing whitespace and the line break of a standalone
    /// tag's line.
    fn consume_line_end(&mut self) {
        let input = self.input;
        while matches!(input[self.pos..].chars().next(), Some(' ' | '\t')) {
            self.pos += 1;
        }
        if input[self.pos..].starts_with("\r\n") {
            self.pos += 2;
        } else if input[self.pos..].starts_with('\n') {
            self.pos += 1;
        }
    }

    /// Apply a parsed tag to the parser state.
    fn apply_tag(&mut self, tag: Tag, tag_offset: usize) -> ParseResult<()> {
        match tag {
            Tag::SectionOpen(id) => {
                self.flush_pending();
                self.frames.push(Frame {
                    id,
                    inverted: false,
                    open_offset: tag_offset,
                    nodes: Vec::new(),
                });
            }
            Tag::InvertedOpen(id) => {
                self.flush_pending();
                self.frames.push(Frame {
                    id,
                    inverted: true,
                    open_offset: tag_offset,
                    nodes: Vec::new(),
                });
            }
            Tag::SectionClose(id) => {
                self.flush_pending();
                let frame = match self.frames.pop() {
                    Some(frame) => frame,
                    None => {
                        return Err(self.error_at(
                            tag_offset,
                            format!("closing tag '{}' without a matching open section", id),
                        ));
                    }
                };
                if frame.id != id {
                    return Err(self.error_at(
                        tag_offset,
                        format!(
                            "closing tag '{}' does not match open section '{}'",
                            id, frame.id
                        ),
                    ));
                }
                let node = if frame.inverted {
                    Node::InvertedSection {
                        id: frame.id,
                        body: frame.nodes,
                    }
                } else {
                    Node::Section {
                        id: frame.id,
                        body: frame.nodes,
                    }
                };
                self.current_nodes().push(node);
            }
            Tag::Variable { escape, id } => {
                self.flush_pending();
                self.current_nodes().push(Node::Variable { escape, id });
            }
            Tag::Partial(name) => {
                self.flush_pending();
                self.current_nodes().push(Node::Partial(name));
            }
            Tag::SetDelimiters(open, close) => {
                // State mutation only; no node is emitted.
                self.open_delim = open;
                self.close_delim = close;
            }
            Tag::Comment => {}
        }
        Ok(())
    }

    /// The node list currently being built: the innermost open section's
    /// body, or the top level.
    fn current_nodes(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.nodes,
            None => &mut self.finished,
        }
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.current_nodes().push(Node::Text(text));
        }
    }

    fn error_at(&self, offset: usize, message: String) -> ParseError {
        let prefix = &self.input[..offset.min(self.input.len())];
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        ParseError {
            source_name: self.source_name.to_string(),
            line: prefix.matches('\n').count() + 1,
            column: prefix[line_start..].chars().count() + 1,
            message,
        }
    }
}
