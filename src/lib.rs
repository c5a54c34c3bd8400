//! # apparatus
//!
//! A library for rendering critical editions of manuscript texts: given a
//! book, one of its versions, and a chosen manuscript witness, it produces
//! a nested, section-structured rendering in which each verse shows the
//! reading attested by that witness and surfaces the competing readings
//! as structured variant records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use apparatus::{read_document, render_document};
//!
//! let document = read_document("1En.xml").unwrap();
//! let rendered = render_document(&document, "Ethiopic", "p").unwrap();
//!
//! println!("{}", serde_json::to_string_pretty(&rendered).unwrap());
//! ```
//!
//! ## Model
//!
//! A [`Document`] owns ordered [`Version`]s; each version declares its
//! manuscripts and division labels and holds a content tree of
//! [`ContentNode`]s. Divisions nest arbitrarily deep; verses hold the
//! mutually exclusive [`Reading`]s of the tradition. Rendering is a pure
//! projection: the source model is never mutated, and rendering the same
//! selection twice yields identical output.

pub mod document;
pub mod error;
pub mod render;
pub mod witness;

pub use document::{
    ContentNode, Division, DivisionLabel, Document, Manuscript, Reading, Verse, Version,
    parse_document, read_document,
};
pub use error::{Error, Result};
pub use render::{
    RenderedNode, RenderedSection, RenderedVerse, Variant, render_document, render_version,
};
