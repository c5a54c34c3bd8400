//! Renderer tests over the 1 Enoch fixture.
//!
//! These verify the projection from content tree to rendered tree:
//! section labeling by depth, witness selection, variant extraction,
//! the error policy for bad selections, and output serialization.

use apparatus::{
    ContentNode, Division, DivisionLabel, Error, RenderedNode, Verse, Version, read_document,
    render_document, render_version,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn load_fixture() -> apparatus::Document {
    read_document(fixture_path("enoch.xml")).expect("Failed to load fixture")
}

fn expect_section(node: &RenderedNode) -> &apparatus::RenderedSection {
    match node {
        RenderedNode::Section(section) => section,
        RenderedNode::Verse(verse) => panic!("expected section, found verse {}", verse.number),
    }
}

fn expect_verse(node: &RenderedNode) -> &apparatus::RenderedVerse {
    match node {
        RenderedNode::Verse(verse) => verse,
        RenderedNode::Section(section) => panic!("expected verse, found section {}", section.label),
    }
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_root_preserves_child_cardinality() {
    let document = load_fixture();
    let ethiopic = document.version("Ethiopic").unwrap();

    let rendered = render_document(&document, "Ethiopic", "p").unwrap();
    assert_eq!(rendered.label, "1 Enoch");
    assert_eq!(rendered.depth, 0);
    assert_eq!(rendered.children.len(), ethiopic.content.len());
}

#[test]
fn test_sections_labeled_by_depth() {
    let document = load_fixture();
    let rendered = render_document(&document, "Greek", "G").unwrap();

    let chapter = expect_section(&rendered.children[0]);
    assert_eq!(chapter.label, "Chapter 1");
    assert_eq!(chapter.depth, 0);

    let section = expect_section(&chapter.children[0]);
    assert_eq!(section.label, "Section 1");
    assert_eq!(section.depth, 1);

    let verse = expect_verse(&section.children[0]);
    assert_eq!(verse.number, "1");
}

#[test]
fn test_traversal_keeps_document_order() {
    let document = load_fixture();
    let rendered = render_document(&document, "Ethiopic", "p").unwrap();

    let labels: Vec<&str> = rendered
        .children
        .iter()
        .map(|node| expect_section(node).label.as_str())
        .collect();
    assert_eq!(labels, ["Chapter 1", "Chapter 2"]);

    let numbers: Vec<&str> = expect_section(&rendered.children[0])
        .children
        .iter()
        .map(|node| expect_verse(node).number.as_str())
        .collect();
    assert_eq!(numbers, ["1", "2", "3"]);
}

#[test]
fn test_render_version_roots_at_version_title() {
    let document = load_fixture();
    let greek = document.version("Greek").unwrap();

    let rendered = render_version(greek, "S").unwrap();
    assert_eq!(rendered.label, "Greek");
}

// ============================================================================
// Witness selection and variants
// ============================================================================

#[test]
fn test_selected_text_and_variants_mirror() {
    let document = load_fixture();

    let for_p = render_document(&document, "Ethiopic", "p").unwrap();
    let verse = expect_verse(&expect_section(&for_p.children[0]).children[0]);
    assert_eq!(verse.text, "The words of the blessing of Enoch");
    assert!(verse.attested);
    assert_eq!(verse.variants.len(), 1);
    assert_eq!(verse.variants[0].witness, "r");
    assert_eq!(verse.variants[0].text, "The vision of Enoch the scribe");

    let for_r = render_document(&document, "Ethiopic", "r").unwrap();
    let verse = expect_verse(&expect_section(&for_r.children[0]).children[0]);
    assert_eq!(verse.text, "The vision of Enoch the scribe");
    assert_eq!(verse.variants.len(), 1);
    // The variant's witness list is trimmed of the source's padding.
    assert_eq!(verse.variants[0].witness, "p q");
}

#[test]
fn test_single_reading_verse_has_no_variants() {
    let document = load_fixture();

    for witness in ["p", "q", "r"] {
        let rendered = render_document(&document, "Ethiopic", witness).unwrap();
        let verse = expect_verse(&expect_section(&rendered.children[0]).children[1]);
        assert_eq!(verse.text, "He took up his parable and said");
        assert!(verse.variants.is_empty(), "witness {witness} saw variants");
    }
}

#[test]
fn test_variant_apostrophes_escaped() {
    let document = load_fixture();

    let rendered = render_document(&document, "Ethiopic", "q").unwrap();
    let verse = expect_verse(&expect_section(&rendered.children[0]).children[2]);
    assert_eq!(verse.text, "The dwelling of the Holy One");
    assert_eq!(verse.variants[0].witness, "p");
    assert_eq!(verse.variants[0].text, "The Holy Great One&apos;s dwelling");
}

#[test]
fn test_uncovered_verse_renders_empty_and_flagged() {
    let document = load_fixture();

    // Witness r attests nothing in chapter 2.
    let rendered = render_document(&document, "Ethiopic", "r").unwrap();
    let verse = expect_verse(&expect_section(&rendered.children[1]).children[0]);
    assert_eq!(verse.text, "");
    assert!(!verse.attested);
    assert!(verse.variants.is_empty());
}

// ============================================================================
// Error policy
// ============================================================================

#[test]
fn test_unknown_witness_is_an_error() {
    let document = load_fixture();

    let result = render_document(&document, "Ethiopic", "G");
    assert!(matches!(
        result,
        Err(Error::UnknownWitness { ref witness, ref version })
            if witness == "G" && version == "Ethiopic"
    ));
}

#[test]
fn test_unknown_version_is_an_error() {
    let document = load_fixture();

    let result = render_document(&document, "Latin", "p");
    assert!(matches!(result, Err(Error::VersionNotFound(ref title)) if title == "Latin"));
}

#[test]
fn test_nesting_deeper_than_labels_is_an_error() {
    let version = Version {
        title: "V".to_string(),
        language: "L".to_string(),
        division_labels: vec![DivisionLabel {
            label: "Chapter".to_string(),
            delimiter: None,
        }],
        manuscripts: vec![apparatus::Manuscript {
            abbrev: "p".to_string(),
            ..Default::default()
        }],
        content: vec![ContentNode::Division(
            Division::new("1").with_child(ContentNode::Division(
                Division::new("1")
                    .with_child(ContentNode::Verse(Verse::new("1").with_reading("p", "text"))),
            )),
        )],
        ..Default::default()
    };

    let result = render_version(&version, "p");
    assert!(matches!(
        result,
        Err(Error::DivisionLabelMismatch { depth: 1, labels: 1 })
    ));
}

// ============================================================================
// Output stability and serialization
// ============================================================================

#[test]
fn test_rendering_is_idempotent() {
    let document = load_fixture();

    let first = render_document(&document, "Ethiopic", "q").unwrap();
    let second = render_document(&document, "Ethiopic", "q").unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_serialized_nodes_are_tagged() {
    let document = load_fixture();
    let rendered = render_document(&document, "Ethiopic", "p").unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&rendered).unwrap()).unwrap();

    let chapter = &json["children"][0];
    assert_eq!(chapter["type"], "section");
    assert_eq!(chapter["label"], "Chapter 1");

    let verse = &chapter["children"][0];
    assert_eq!(verse["type"], "verse");
    assert_eq!(verse["number"], "1");
    assert_eq!(verse["variants"][0]["witness"], "r");
}
