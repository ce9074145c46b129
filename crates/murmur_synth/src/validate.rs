//! Speech-markup validation.
//!
//! Backends accept a markup dialect (tags around plain text), so malformed
//! markup is rejected here before any cache or network work is done. The text
//! is treated as a fragment: it is wrapped in an XML declaration and a root
//! element and the result must parse as a well-formed document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Opening of the envelope the fragment is placed in.
const ENVELOPE_OPEN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><murmur>";

/// Closing of the envelope.
const ENVELOPE_CLOSE: &str = "</murmur>";

/// Maximum number of characters of the input kept in an error.
const EXCERPT_CHARS: usize = 80;

/// The input text is not well-formed speech markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid speech markup: {reason} (in \"{excerpt}\")")]
pub struct ValidationError {
    /// The beginning of the rejected text.
    pub excerpt: String,
    /// The parser's description of the problem.
    pub reason: String,
}

impl ValidationError {
    fn new(text: &str, reason: impl Into<String>) -> Self {
        Self {
            excerpt: excerpt(text),
            reason: reason.into(),
        }
    }
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Checks that `text` is a well-formed markup fragment.
///
/// Plain text without any tags is valid. Unbalanced or mismatched tags,
/// malformed attributes, unknown entity references and markup that closes the
/// surrounding envelope are rejected.
pub fn validate(text: &str) -> Result<(), ValidationError> {
    let document = format!("{ENVELOPE_OPEN}{text}{ENVELOPE_CLOSE}");
    check_document(&document).map_err(|reason| ValidationError::new(text, reason))
}

fn check_document(document: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(document);
    let mut depth = 0usize;
    let mut root_closed = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        if root_closed && !matches!(event, Event::Eof) {
            return Err("markup closes the enclosing element".to_string());
        }
        match event {
            Event::Start(start) => {
                check_attributes(&start)?;
                depth += 1;
            }
            Event::Empty(empty) => {
                if depth == 0 {
                    return Err("element outside the enclosing element".to_string());
                }
                check_attributes(&empty)?;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(text) => {
                text.unescape().map_err(|e| e.to_string())?;
            }
            Event::Decl(_) if depth > 0 => {
                return Err("XML declaration inside content".to_string());
            }
            Event::DocType(_) => {
                return Err("document type declaration inside content".to_string());
            }
            Event::Decl(_) | Event::CData(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if depth != 0 || !root_closed {
        return Err("unclosed element".to_string());
    }
    Ok(())
}

fn check_attributes(element: &BytesStart<'_>) -> Result<(), String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        attr.unescape_value().map_err(|e| e.to_string())?;
    }
    Ok(())
}
