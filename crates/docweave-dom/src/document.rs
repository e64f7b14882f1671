/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The document root: a body element sequence plus registered media parts.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drawing::{MediaId, MediaKind, MediaPart};
use crate::element::Element;
use crate::paragraph::Paragraph;
use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub body: Vec<Element>,
    pub media: Vec<MediaPart>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Appends an empty paragraph to the body and returns it.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.body.push(Element::Paragraph(Paragraph::new()));
        match self.body.last_mut() {
            Some(Element::Paragraph(p)) => p,
            _ => unreachable!("just pushed a paragraph"),
        }
    }

    /// Appends a `rows` x `cols` table to the body and returns it.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        self.body.push(Element::Table(Table::new(rows, cols)));
        match self.body.last_mut() {
            Some(Element::Table(t)) => t,
            _ => unreachable!("just pushed a table"),
        }
    }

    /// Registers a media part and returns its identifier. Identifiers are
    /// assigned sequentially starting at 1.
    pub fn add_media(&mut self, kind: MediaKind, data: Vec<u8>) -> MediaId {
        let id = MediaId(self.media.len() + 1);
        self.media.push(MediaPart { id, kind, data });
        id
    }

    /// Reads an image file and registers it as a media part, inferring the
    /// kind from the file extension.
    pub fn add_media_from_path(&mut self, path: impl AsRef<Path>) -> io::Result<MediaId> {
        let path = path.as_ref();
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaKind::from_extension)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unsupported image extension: {}", path.display()),
                )
            })?;
        let data = fs::read(path)?;
        Ok(self.add_media(kind, data))
    }

    pub fn media(&self, id: MediaId) -> Option<&MediaPart> {
        self.media.iter().find(|part| part.id == id)
    }

    /// Plain-text rendering of the body: one line per paragraph, tables as
    /// tab-separated cell text. Raw fragments contribute nothing. Intended
    /// for verification and debugging, not fidelity.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for element in &self.body {
            match element {
                Element::Paragraph(p) => {
                    out.push_str(&p.text());
                    out.push('\n');
                }
                Element::Table(t) => {
                    out.push_str(&t.text());
                    out.push('\n');
                }
                Element::Raw(_) => {}
            }
        }
        out
    }
}
