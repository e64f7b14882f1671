/*
 * injector.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The injector extension point and the stock image injector.
//!
//! Injectors travel inside the data context as [`crate::Value::Injector`]
//! and are invoked through the template's `{{ inject .value }}` call. They
//! are the only place a render can touch the outside world.

use std::io;
use std::path::Path;

use docweave_dom::{Document, Drawing, Element, MediaKind, Paragraph};

use crate::error::BoxError;

/// A caller-supplied capability that replaces a paragraph's rendered output
/// with externally produced elements.
pub trait Injector: Send + Sync {
    /// Diagnostic name used in log events and error messages.
    fn name(&self) -> &str {
        "injector"
    }

    /// Invoked when a rendered paragraph contains this injector's
    /// placeholder token. May mutate `paragraph` and register media on
    /// `doc`. Returning a non-empty vector replaces the paragraph with
    /// those elements; returning an empty vector keeps the (possibly
    /// mutated) paragraph, with the token text removed.
    fn inject(&self, doc: &mut Document, paragraph: &mut Paragraph)
        -> Result<Vec<Element>, BoxError>;
}

/// Embeds an image into the paragraph that carried the `inject` call.
///
/// The image bytes are registered as a document media part and an inline
/// drawing run is appended to the paragraph, which itself survives.
#[derive(Debug, Clone)]
pub struct ImageInjector {
    kind: MediaKind,
    data: Vec<u8>,
    width: u64,
    height: u64,
}

impl ImageInjector {
    /// Extents are in EMU; see [`docweave_dom::EMU_PER_PIXEL`].
    pub fn new(kind: MediaKind, data: Vec<u8>, width: u64, height: u64) -> Self {
        ImageInjector { kind, data, width, height }
    }

    /// Reads the image from disk, inferring its kind from the extension.
    pub fn from_path(path: impl AsRef<Path>, width: u64, height: u64) -> io::Result<Self> {
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
        let data = std::fs::read(path)?;
        Ok(ImageInjector::new(kind, data, width, height))
    }
}

impl Injector for ImageInjector {
    fn name(&self) -> &str {
        "image"
    }

    fn inject(
        &self,
        doc: &mut Document,
        paragraph: &mut Paragraph,
    ) -> Result<Vec<Element>, BoxError> {
        let media = doc.add_media(self.kind, self.data.clone());
        paragraph.add_drawing(Drawing::new(media, self.width, self.height));
        Ok(Vec::new())
    }
}
