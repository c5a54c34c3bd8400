//! Core data model for critical editions.
//!
//! A [`Document`] is one book of the tradition. It owns an ordered set of
//! [`Version`]s (editions/translations), each carrying its own declared
//! manuscripts, division labels, and nested content tree. Everything here
//! is immutable after loading; rendering is a pure projection over it.

mod parser;

pub use parser::{parse_document, read_document};

/// A book with one or more versions of its text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub title: String,
    pub filename: String,
    /// "fragmentary" for texts surviving only in fragments, empty otherwise.
    pub text_structure: String,
    pub versions: Vec<Version>,
}

/// One edition or translation of the book.
#[derive(Debug, Clone, Default)]
pub struct Version {
    pub title: String,
    pub author: String,
    pub language: String,
    /// Human-readable names for each nesting depth, outermost first.
    pub division_labels: Vec<DivisionLabel>,
    /// Declared manuscripts; the universe of valid witness ids for this
    /// version's content.
    pub manuscripts: Vec<Manuscript>,
    pub content: Vec<ContentNode>,
}

/// Label for one nesting depth of the division structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionLabel {
    pub label: String,
    /// Separator used when printing references across this level (e.g. ":").
    pub delimiter: Option<String>,
}

/// A manuscript (or derived source) attesting readings of this version.
#[derive(Debug, Clone, Default)]
pub struct Manuscript {
    pub abbrev: String,
    pub language: String,
    pub name: String,
    /// Whether the surrounding UI should offer this witness for selection.
    pub show: bool,
}

/// A node of the content tree. Leaf-ness is decided once at load time:
/// a div with no child divs is a verse, anything else is a division.
#[derive(Debug, Clone)]
pub enum ContentNode {
    Division(Division),
    Verse(Verse),
}

/// A structural grouping (chapter, section, ...) with nested children.
#[derive(Debug, Clone, Default)]
pub struct Division {
    pub number: String,
    pub children: Vec<ContentNode>,
}

/// A leaf of the content tree holding the attested readings.
#[derive(Debug, Clone, Default)]
pub struct Verse {
    pub number: String,
    pub readings: Vec<Reading>,
}

/// One attested textual form of a verse.
#[derive(Debug, Clone, Default)]
pub struct Reading {
    /// Raw witness-list attribute: a single id or a space-delimited list.
    pub witnesses: String,
    pub text: String,
}

impl Document {
    /// Look up a version by its exact title.
    pub fn version(&self, title: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.title == title)
    }
}

impl Version {
    /// Whether `witness` appears in this version's declared manuscript list.
    pub fn declares_witness(&self, witness: &str) -> bool {
        self.manuscripts.iter().any(|ms| ms.abbrev == witness)
    }

    /// Declared witness ids in document order.
    pub fn witness_ids(&self) -> impl Iterator<Item = &str> {
        self.manuscripts.iter().map(|ms| ms.abbrev.as_str())
    }
}

impl ContentNode {
    /// The `number` attribute of either variant.
    pub fn number(&self) -> &str {
        match self {
            ContentNode::Division(d) => &d.number,
            ContentNode::Verse(v) => &v.number,
        }
    }
}

impl Division {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ContentNode) -> Self {
        self.children.push(child);
        self
    }
}

impl Verse {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            readings: Vec::new(),
        }
    }

    pub fn with_reading(mut self, witnesses: impl Into<String>, text: impl Into<String>) -> Self {
        self.readings.push(Reading {
            witnesses: witnesses.into(),
            text: text.into(),
        });
        self
    }
}
