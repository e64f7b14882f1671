/*
 * element.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Body-level document elements.

use serde::{Deserialize, Serialize};

use crate::paragraph::Paragraph;
use crate::table::Table;

/// A node in a document's body sequence.
///
/// Paragraphs and tables are the elements the template renderer interprets;
/// raw fragments are preserved verbatim and never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Paragraph(Paragraph),
    Table(Table),
    Raw(RawFragment),
}

impl Element {
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Element::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Element::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Opaque body markup carried through rendering untouched (section
/// properties, bookmarks and the like).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    pub xml: String,
}

impl RawFragment {
    pub fn new(xml: impl Into<String>) -> Self {
        RawFragment { xml: xml.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_paragraph() {
        let element = Element::Paragraph(Paragraph::with_text("hello"));
        assert!(element.as_paragraph().is_some());
        assert!(element.as_table().is_none());

        let raw = Element::Raw(RawFragment::new("<w:sectPr/>"));
        assert!(raw.as_paragraph().is_none());
    }
}
