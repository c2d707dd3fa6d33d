//! Repairing XMLTV parser built on quick-xml
//!
//! Parsing is a two-attempt affair. The first attempt is strict: any
//! reader error, malformed attribute, or invalid entity reference fails
//! it. On failure the raw bytes get a textual repair — lossy UTF-8
//! decode with invalid sequences discarded, then every literal `&`
//! replaced with `&amp;` — and one reparse. The repair is deliberately
//! naive and double-escapes entities that were already valid
//! (`&amp;` becomes `&amp;amp;`); downstream consumers of the merged
//! guide have come to rely on that round-trip, so it is kept as-is.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::errors::{SourceError, SourceResult};
use crate::xmltv::{Document, Element, Node};

/// Elements that must carry a `lang` attribute after normalization
const LANG_REQUIRED_TAGS: [&str; 3] = ["display-name", "title", "desc"];

/// Parse raw EPG bytes into a [`Document`], repairing if needed
///
/// Fails with [`SourceError::Parse`] only when both the strict parse
/// and the repaired reparse fail. After parsing, every descendant
/// `display-name`/`title`/`desc` element lacking a `lang` attribute
/// gets `default_lang`.
pub fn parse_document(
    data: &[u8],
    source_name: &str,
    default_lang: &str,
) -> SourceResult<Document> {
    let strict_attempt = std::str::from_utf8(data)
        .map_err(|e| SourceError::parse(source_name, format!("invalid UTF-8: {e}")))
        .and_then(|text| parse_tree(text, source_name));

    let mut document = match strict_attempt {
        Ok(document) => document,
        Err(error) => {
            warn!(
                "Parse error in '{}': {}; retrying with entity repair",
                source_name, error
            );
            let repaired = repair_text(data);
            parse_tree(&repaired, source_name)?
        }
    };

    for element in document
        .channels
        .iter_mut()
        .chain(document.programmes.iter_mut())
    {
        ensure_lang_attribute(element, default_lang);
    }

    Ok(document)
}

/// Best-effort textual repair for malformed markup
///
/// Invalid UTF-8 sequences are discarded, then every literal `&` is
/// escaped. Already-escaped entities get double-escaped on purpose.
fn repair_text(data: &[u8]) -> String {
    // Skip invalid byte sequences rather than substituting U+FFFD, so a
    // replacement character that was validly encoded in the input survives
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.replace('&', "&amp;")
}

/// Single strict parse attempt
fn parse_tree(text: &str, source_name: &str) -> SourceResult<Document> {
    let mut reader = Reader::from_str(text);

    let mut document = Document::default();
    let mut stack: Vec<Element> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                saw_root = true;
                stack.push(element_from_start(e, source_name)?);
            }

            Ok(Event::Empty(ref e)) => {
                saw_root = true;
                let element = element_from_start(e, source_name)?;
                attach(element, &mut stack, &mut document);
            }

            Ok(Event::End(_)) => {
                // Mismatched end tags are already rejected by the reader
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut document);
                }
            }

            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| SourceError::parse(source_name, format!("invalid text: {e}")))?;
                if let Some(parent) = stack.last_mut() {
                    push_text(parent, &text);
                }
            }

            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e).map_err(|e| {
                    SourceError::parse(source_name, format!("invalid UTF-8 in CDATA: {e}"))
                })?;
                if let Some(parent) = stack.last_mut() {
                    push_text(parent, text);
                }
            }

            Ok(Event::Eof) => break,

            Err(e) => {
                return Err(SourceError::parse(
                    source_name,
                    format!("XML parsing error: {e}"),
                ));
            }

            _ => {} // Ignore declarations, comments, processing instructions, doctypes
        }
    }

    if !stack.is_empty() {
        return Err(SourceError::parse(
            source_name,
            "unexpected end of document",
        ));
    }
    if !saw_root {
        return Err(SourceError::parse(source_name, "no root element found"));
    }

    Ok(document)
}

/// Build an [`Element`] from a start tag, unescaping its attributes
fn element_from_start(e: &BytesStart, source_name: &str) -> SourceResult<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| SourceError::parse(source_name, format!("invalid UTF-8 in element name: {e}")))?
        .to_string();

    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr
            .map_err(|e| SourceError::parse(source_name, format!("malformed attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| {
                SourceError::parse(source_name, format!("invalid UTF-8 in attribute name: {e}"))
            })?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| {
                SourceError::parse(source_name, format!("invalid attribute value: {e}"))
            })?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Place a finished element either into the document (channel/programme
/// children of the root) or into its parent's child list
fn attach(element: Element, stack: &mut Vec<Element>, document: &mut Document) {
    let depth = stack.len();
    match stack.last_mut() {
        Some(_) if depth == 1 && element.name == "channel" => {
            document.channels.push(element);
        }
        Some(_) if depth == 1 && element.name == "programme" => {
            document.programmes.push(element);
        }
        Some(parent) => parent.children.push(Node::Element(element)),
        // The root element itself; its channel/programme children were
        // already collected as they closed
        None => {}
    }
}

fn push_text(parent: &mut Element, text: &str) {
    // Adjacent text events (entity boundaries, CDATA seams) collapse
    // into one node so merge comparisons stay stable
    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

fn ensure_lang_attribute(element: &mut Element, default_lang: &str) {
    if LANG_REQUIRED_TAGS.contains(&element.name.as_str()) && element.attr("lang").is_none() {
        element
            .attributes
            .push(("lang".to_string(), default_lang.to_string()));
    }
    for child in &mut element.children {
        if let Node::Element(child) = child {
            ensure_lang_attribute(child, default_lang);
        }
    }
}
