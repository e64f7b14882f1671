/*
 * drawing.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Inline drawings and the media parts they reference.
//!
//! Image bytes live in the document's media part list; a [`Drawing`] run
//! child references its part by [`MediaId`] and carries display extents in
//! English Metric Units.

use serde::{Deserialize, Serialize};

/// English Metric Units per pixel at 96 dpi.
pub const EMU_PER_PIXEL: u64 = 9525;

/// English Metric Units per inch.
pub const EMU_PER_INCH: u64 = 914_400;

/// Identifier of a media part within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<MediaKind> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(MediaKind::Png),
            "jpg" | "jpeg" => Some(MediaKind::Jpeg),
            "gif" => Some(MediaKind::Gif),
            "bmp" => Some(MediaKind::Bmp),
            _ => None,
        }
    }
}

/// A binary payload registered with a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPart {
    pub id: MediaId,
    pub kind: MediaKind,
    pub data: Vec<u8>,
}

/// An inline drawing referencing a registered media part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub media: MediaId,
    /// Display width in EMU.
    pub width: u64,
    /// Display height in EMU.
    pub height: u64,
}

impl Drawing {
    pub fn new(media: MediaId, width: u64, height: u64) -> Self {
        Drawing { media, width, height }
    }
}
