//! Variant-aware hierarchical rendering.
//!
//! Projects a version's content tree into a nested [`RenderedSection`]
//! tree for a chosen witness: every division becomes a labeled section,
//! every verse carries the reading attested by the witness plus the
//! competing readings as structured [`Variant`] records. The projection
//! is pure: each recursive call returns its own subtree and the source
//! model is never touched.

use quick_xml::escape::escape;
use serde::Serialize;

use crate::document::{ContentNode, DivisionLabel, Document, Verse, Version};
use crate::error::{Error, Result};
use crate::witness;

// ============================================================================
// Output model
// ============================================================================

/// A labeled structural grouping of the rendered text.
///
/// `depth` indexes the version's declared division labels; the root
/// wrapper returned by [`render_version`] sits above the outermost
/// divisions and reports depth 0 like them.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSection {
    pub label: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
}

/// One rendered child: a nested section or a verse.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedNode {
    Section(RenderedSection),
    Verse(RenderedVerse),
}

/// A verse as seen through the selected witness.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedVerse {
    pub number: String,
    /// Text of the reading attested by the selected witness; empty when
    /// the witness does not cover this verse.
    pub text: String,
    /// False when the selected witness attests no reading here.
    pub attested: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

/// A competing reading surfaced alongside the selected text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Variant {
    /// Trimmed witness list of the non-selected reading.
    pub witness: String,
    /// Trimmed reading text with XML-reserved characters escaped.
    pub text: String,
}

// ============================================================================
// Rendering
// ============================================================================

/// Render one (version, witness) selection of a document.
///
/// The root section is labeled with the book title. Fails with
/// [`Error::VersionNotFound`] or [`Error::UnknownWitness`] before any
/// traversal starts; on success the root has exactly one child per
/// top-level content node of the version.
pub fn render_document(
    document: &Document,
    version_title: &str,
    witness: &str,
) -> Result<RenderedSection> {
    let version = document
        .version(version_title)
        .ok_or_else(|| Error::VersionNotFound(version_title.to_string()))?;

    let mut root = render_version(version, witness)?;
    root.label = document.title.clone();
    Ok(root)
}

/// Render a version for the given witness, rooted in a section labeled
/// with the version title.
pub fn render_version(version: &Version, witness: &str) -> Result<RenderedSection> {
    if !version.declares_witness(witness) {
        return Err(Error::UnknownWitness {
            witness: witness.to_string(),
            version: version.title.clone(),
        });
    }

    Ok(RenderedSection {
        label: version.title.clone(),
        depth: 0,
        children: render_children(&version.content, &version.division_labels, 0, witness)?,
    })
}

/// Render a sibling run of content nodes at the given division depth.
fn render_children(
    nodes: &[ContentNode],
    labels: &[DivisionLabel],
    depth: usize,
    witness: &str,
) -> Result<Vec<RenderedNode>> {
    let mut rendered = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            ContentNode::Verse(verse) => {
                rendered.push(RenderedNode::Verse(extract_verse(verse, witness)));
            }
            ContentNode::Division(division) => {
                let Some(label) = labels.get(depth) else {
                    return Err(Error::DivisionLabelMismatch {
                        depth,
                        labels: labels.len(),
                    });
                };
                rendered.push(RenderedNode::Section(RenderedSection {
                    label: format!("{} {}", label.label, division.number),
                    depth,
                    children: render_children(&division.children, labels, depth + 1, witness)?,
                }));
            }
        }
    }

    Ok(rendered)
}

/// Render one verse for the given witness.
///
/// When the witness attests a reading and the verse carries competing
/// readings, every non-selected reading is emitted as a [`Variant`].
/// A covered verse with a single reading never produces variants; an
/// uncovered verse renders empty with `attested` unset.
pub fn extract_verse(verse: &Verse, witness: &str) -> RenderedVerse {
    let selected = verse
        .readings
        .iter()
        .position(|reading| witness::matches(&reading.witnesses, witness));

    let Some(selected) = selected else {
        return RenderedVerse {
            number: verse.number.clone(),
            text: String::new(),
            attested: false,
            variants: Vec::new(),
        };
    };

    let variants = verse
        .readings
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != selected)
        .map(|(_, reading)| Variant {
            witness: reading.witnesses.trim().to_string(),
            text: escape(reading.text.trim()).into_owned(),
        })
        .collect();

    RenderedVerse {
        number: verse.number.clone(),
        text: verse.readings[selected].text.clone(),
        attested: true,
        variants,
    }
}
