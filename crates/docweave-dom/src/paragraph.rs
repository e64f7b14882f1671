/*
 * paragraph.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Paragraphs and their run/text children.
//!
//! A paragraph's visible text is the concatenation of the [`Text`] nodes
//! inside its runs, in document order ([`Paragraph::text`]). Writing text
//! back ([`Paragraph::set_text`]) follows the first-wins rule: the full
//! string lands in the first text node and every later text node in the
//! paragraph is blanked. Formatting carried by later runs is lost; a
//! paragraph with no text nodes at all is left untouched.

use serde::{Deserialize, Serialize};

use crate::drawing::Drawing;
use crate::element::RawFragment;

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justification {
    Left,
    Center,
    Right,
    Justified,
}

/// Properties applied to a whole paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    /// Named style identifier, when the paragraph references one.
    pub style: Option<String>,
    pub justification: Option<Justification>,
}

/// Character-level formatting for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points.
    pub size: Option<u32>,
}

/// A literal text node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunChild {
    Text(Text),
    Drawing(Drawing),
}

/// A run of uniformly formatted content inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub properties: RunProperties,
    pub children: Vec<RunChild>,
}

impl Run {
    pub fn new() -> Self {
        Run::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Run {
            properties: RunProperties::default(),
            children: vec![RunChild::Text(Text::new(text))],
        }
    }

    /// Concatenation of the text nodes in this run.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let RunChild::Text(t) = child {
                out.push_str(&t.text);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParagraphChild {
    Run(Run),
    /// Non-run paragraph content (hyperlink wrappers, field codes).
    Raw(RawFragment),
}

/// A paragraph of document content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub properties: ParagraphProperties,
    pub children: Vec<ParagraphChild>,
}

impl Paragraph {
    pub fn new() -> Self {
        Paragraph::default()
    }

    /// A paragraph holding a single run with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Paragraph {
            properties: ParagraphProperties::default(),
            children: vec![ParagraphChild::Run(Run::with_text(text))],
        }
    }

    /// Appends a new run containing `text` and returns it for property
    /// adjustments.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Run {
        self.children.push(ParagraphChild::Run(Run::with_text(text)));
        match self.children.last_mut() {
            Some(ParagraphChild::Run(run)) => run,
            _ => unreachable!("just pushed a run"),
        }
    }

    /// Appends a new run containing an inline drawing.
    pub fn add_drawing(&mut self, drawing: Drawing) -> &mut Run {
        self.children.push(ParagraphChild::Run(Run {
            properties: RunProperties::default(),
            children: vec![RunChild::Drawing(drawing)],
        }));
        match self.children.last_mut() {
            Some(ParagraphChild::Run(run)) => run,
            _ => unreachable!("just pushed a run"),
        }
    }

    /// The flattened text of the paragraph: every text node across every
    /// run, concatenated in order. Drawings and raw children contribute
    /// nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let ParagraphChild::Run(run) = child {
                for node in &run.children {
                    if let RunChild::Text(t) = node {
                        out.push_str(&t.text);
                    }
                }
            }
        }
        out
    }

    /// Writes `text` into the paragraph with first-wins collapsing: the
    /// first text node receives the whole string, all subsequent text nodes
    /// are blanked. Has no effect on a paragraph without text nodes.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let mut remaining = Some(text.into());
        for child in &mut self.children {
            if let ParagraphChild::Run(run) = child {
                for node in &mut run.children {
                    if let RunChild::Text(t) = node {
                        t.text = remaining.take().unwrap_or_default();
                    }
                }
            }
        }
    }
}
