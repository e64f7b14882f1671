/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! WordprocessingML-shaped document object model for docweave.
//!
//! This crate defines the mutable tree the template renderer operates over:
//!
//! - [`Document`]: body element sequence plus registered media parts
//! - [`Element`]: paragraph, table, or opaque raw fragment
//! - [`Paragraph`] / [`Run`] / [`Text`]: text content with flattened
//!   reading ([`Paragraph::text`]) and first-wins write-back
//!   ([`Paragraph::set_text`])
//! - [`Table`] / [`Row`] / [`Cell`]: grid content; cells own paragraphs
//!   and nested tables
//! - [`Drawing`] / [`MediaPart`]: inline images backed by registered bytes
//!
//! # Architecture
//!
//! The tree has plain value semantics: every node type is `Clone`, and
//! cloning is always deep, so a cloned subtree never aliases its source.
//! Package-format concerns (archive parsing, XML serialization) live
//! elsewhere; this crate only models the in-memory shapes and their
//! construction primitives.

pub mod document;
pub mod drawing;
pub mod element;
pub mod paragraph;
pub mod table;

// Re-export main types at crate root
pub use document::Document;
pub use drawing::{Drawing, MediaId, MediaKind, MediaPart, EMU_PER_INCH, EMU_PER_PIXEL};
pub use element::{Element, RawFragment};
pub use paragraph::{
    Justification, Paragraph, ParagraphChild, ParagraphProperties, Run, RunChild, RunProperties,
    Text,
};
pub use table::{Cell, CellProperties, Row, RowProperties, Table, TableProperties};
