//! Critical-edition XML parsing.
//!
//! Loads the edition dialect (`<book>` / `<version>` / `<divisions>` /
//! `<manuscripts>` / nested `<div>` text structure) into the model in
//! `super`. Pure transform: source ordering of versions, witnesses,
//! labels, and content nodes is preserved.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{ContentNode, Division, DivisionLabel, Document, Manuscript, Reading, Verse, Version};
use crate::error::{Error, Result};

/// Read and parse a document from a file.
pub fn read_document(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(strip_bom(&bytes).to_vec())?;
    parse_document(&content)
}

/// Parse a document from its XML source.
///
/// Fails with [`Error::MalformedDocument`] when the book has no title,
/// a version declares no manuscripts, a reading cites an undeclared
/// witness, or a witness attests more than one reading of a verse.
pub fn parse_document(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);

    let mut document = Document::default();
    let mut saw_book = false;

    let mut version: Option<Version> = None;

    // Manuscript in progress and its <name> text.
    let mut manuscript: Option<Manuscript> = None;
    let mut in_name = false;
    let mut name_skip = 0usize;
    let mut name_text = String::new();

    // Text-structure state: a stack of open <div> elements rooted at
    // a synthetic entry for <text> itself.
    let mut div_stack: Vec<OpenDiv> = Vec::new();
    let mut reading: Option<OpenReading> = None;
    let mut w_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                // <w> word elements carry editorial tokenization; the
                // renderer works on plain reading text, so the whole
                // subtree is dropped.
                b"w" => w_depth += 1,
                b"book" => {
                    saw_book = true;
                    document.title = require_attr(&e, b"title", "book has no title attribute")?;
                    document.filename = attr(&e, b"filename")?.unwrap_or_default();
                    document.text_structure = attr(&e, b"textStructure")?.unwrap_or_default();
                }
                b"version" => {
                    version = Some(Version {
                        title: attr(&e, b"title")?.unwrap_or_default(),
                        author: attr(&e, b"author")?.unwrap_or_default(),
                        language: attr(&e, b"language")?.unwrap_or_default(),
                        ..Version::default()
                    });
                }
                b"division" => push_division_label(&e, &mut version)?,
                b"ms" => manuscript = Some(manuscript_from_attrs(&e)?),
                b"name" if manuscript.is_some() => {
                    in_name = true;
                    name_text.clear();
                }
                _ if in_name => name_skip += 1,
                b"text" if version.is_some() => div_stack.push(OpenDiv::root()),
                b"div" if !div_stack.is_empty() => {
                    div_stack.push(OpenDiv::new(attr(&e, b"number")?.unwrap_or_default()));
                }
                b"reading" if !div_stack.is_empty() => {
                    reading = Some(OpenReading {
                        witnesses: attr(&e, b"mss")?.unwrap_or_default(),
                        text: String::new(),
                    });
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w" => {}
                b"division" => push_division_label(&e, &mut version)?,
                b"ms" => {
                    let ms = manuscript_from_attrs(&e)?;
                    if let Some(v) = version.as_mut()
                        && !ms.abbrev.is_empty()
                    {
                        v.manuscripts.push(ms);
                    }
                }
                b"div" if !div_stack.is_empty() => {
                    // An empty div is a verse with no readings.
                    let number = attr(&e, b"number")?.unwrap_or_default();
                    if let Some(parent) = div_stack.last_mut() {
                        parent.children.push(ContentNode::Verse(Verse::new(number)));
                    }
                }
                b"reading" if !div_stack.is_empty() => {
                    if let Some(open) = div_stack.last_mut() {
                        open.readings.push(Reading {
                            witnesses: attr(&e, b"mss")?.unwrap_or_default(),
                            text: String::new(),
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if w_depth > 0 {
                    continue;
                }
                let raw = String::from_utf8_lossy(e.as_ref());
                if let Some(open) = reading.as_mut() {
                    open.text.push_str(&raw);
                } else if in_name && name_skip == 0 {
                    name_text.push_str(&raw);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if w_depth > 0 {
                    continue;
                }
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    if let Some(open) = reading.as_mut() {
                        open.text.push_str(&resolved);
                    } else if in_name && name_skip == 0 {
                        name_text.push_str(&resolved);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w" => w_depth = w_depth.saturating_sub(1),
                b"reading" => {
                    if let (Some(open), Some(div)) = (reading.take(), div_stack.last_mut()) {
                        div.readings.push(Reading {
                            witnesses: open.witnesses,
                            text: normalize_whitespace(&open.text),
                        });
                    }
                }
                b"div" => {
                    if let Some(open) = div_stack.pop()
                        && let Some(parent) = div_stack.last_mut()
                    {
                        parent.children.push(open.into_node());
                    }
                }
                b"text" => {
                    if let (Some(root), Some(v)) = (div_stack.pop(), version.as_mut()) {
                        v.content = root.children;
                    }
                }
                b"name" if in_name => {
                    in_name = false;
                    if let Some(ms) = manuscript.as_mut() {
                        ms.name = normalize_whitespace(&name_text);
                    }
                }
                _ if name_skip > 0 => name_skip -= 1,
                b"ms" => {
                    if let (Some(ms), Some(v)) = (manuscript.take(), version.as_mut())
                        && !ms.abbrev.is_empty()
                    {
                        v.manuscripts.push(ms);
                    }
                }
                b"version" => {
                    if let Some(v) = version.take() {
                        validate_version(&v)?;
                        document.versions.push(v);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    if !saw_book {
        return Err(Error::MalformedDocument(
            "no <book> element found".to_string(),
        ));
    }

    Ok(document)
}

// ----------------------------------------------------------------------------
// In-progress state
// ----------------------------------------------------------------------------

/// A `<div>` (or the `<text>` root) whose end tag has not been seen yet.
/// Classification into division vs. verse happens when it closes: a div
/// with child divs is a division, anything else is a verse.
struct OpenDiv {
    number: String,
    children: Vec<ContentNode>,
    readings: Vec<Reading>,
}

impl OpenDiv {
    fn root() -> Self {
        Self::new(String::new())
    }

    fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            children: Vec::new(),
            readings: Vec::new(),
        }
    }

    fn into_node(self) -> ContentNode {
        if self.children.is_empty() {
            ContentNode::Verse(Verse {
                number: self.number,
                readings: self.readings,
            })
        } else {
            ContentNode::Division(Division {
                number: self.number,
                children: self.children,
            })
        }
    }
}

struct OpenReading {
    witnesses: String,
    text: String,
}

// ----------------------------------------------------------------------------
// Validation
// ----------------------------------------------------------------------------

/// Load-time semantic checks: a version must declare manuscripts, every
/// cited witness must be declared, and within one verse a witness may
/// attest at most one reading.
fn validate_version(version: &Version) -> Result<()> {
    if version.manuscripts.is_empty() {
        return Err(Error::MalformedDocument(format!(
            "version '{}' declares no witnesses",
            version.title
        )));
    }

    for node in &version.content {
        validate_node(version, node)?;
    }

    Ok(())
}

fn validate_node(version: &Version, node: &ContentNode) -> Result<()> {
    match node {
        ContentNode::Division(div) => {
            for child in &div.children {
                validate_node(version, child)?;
            }
        }
        ContentNode::Verse(verse) => {
            let mut seen: HashSet<&str> = HashSet::new();
            for reading in &verse.readings {
                for token in reading.witnesses.split_whitespace() {
                    if !version.declares_witness(token) {
                        return Err(Error::MalformedDocument(format!(
                            "version '{}' verse '{}' cites undeclared witness '{}'",
                            version.title, verse.number, token
                        )));
                    }
                    if !seen.insert(token) {
                        return Err(Error::MalformedDocument(format!(
                            "witness '{}' attests more than one reading of verse '{}' \
                             in version '{}'",
                            token, verse.number, version.title
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn push_division_label(e: &BytesStart, version: &mut Option<Version>) -> Result<()> {
    if let Some(v) = version.as_mut() {
        v.division_labels.push(DivisionLabel {
            label: attr(e, b"label")?.unwrap_or_default(),
            delimiter: attr(e, b"delimiter")?,
        });
    }
    Ok(())
}

fn manuscript_from_attrs(e: &BytesStart) -> Result<Manuscript> {
    Ok(Manuscript {
        abbrev: attr(e, b"abbrev")?.unwrap_or_default().trim().to_string(),
        language: attr(e, b"language")?.unwrap_or_default(),
        name: String::new(),
        show: attr(e, b"show")?.as_deref() != Some("no"),
    })
}

/// Extract an attribute value as an owned string.
fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart, key: &[u8], message: &str) -> Result<String> {
    attr(e, key)?.ok_or_else(|| Error::MalformedDocument(message.to_string()))
}

/// Collapse runs of whitespace and trim. Reading text arrives in
/// fragments split around child elements and entity references.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip UTF-8 BOM if present.
fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Resolve XML entity references that appear as general-entity events.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
