/*
 * matcher.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Matching block openers to their closing directives.

use docweave_dom::Element;

use crate::error::{RenderError, RenderResult};

/// The closing directive family to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTag {
    Endfor,
    Endif,
}

impl EndTag {
    pub fn text(self) -> &'static str {
        match self {
            EndTag::Endfor => "{{endfor}}",
            EndTag::Endif => "{{endif}}",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EndTag::Endfor => "endfor",
            EndTag::Endif => "endif",
        }
    }
}

/// Scans forward from `start` for the closing directive matching the block
/// opened just before it, tracking nesting depth.
///
/// Openers of either family (`{{for ...}}`, `{{if ...}}`) push depth; end tags
/// of either family pop it. The searched tag matches only at depth 0, so
/// inner blocks of the other family cannot steal the close. End tags match
/// on exact trimmed paragraph text; non-paragraph elements never
/// participate.
pub fn find_block_end(elements: &[Element], start: usize, end_tag: EndTag) -> RenderResult<usize> {
    let mut depth: usize = 0;
    for (index, element) in elements.iter().enumerate().skip(start) {
        let Some(paragraph) = element.as_paragraph() else {
            continue;
        };
        let text = paragraph.text();
        let trimmed = text.trim();
        if trimmed.starts_with("{{for ") || trimmed.starts_with("{{if ") {
            depth += 1;
            continue;
        }
        if trimmed == end_tag.text() && depth == 0 {
            return Ok(index);
        }
        if trimmed == EndTag::Endfor.text() || trimmed == EndTag::Endif.text() {
            depth = depth.saturating_sub(1);
        }
    }
    Err(RenderError::UnterminatedBlock {
        tag: end_tag.name().to_string(),
    })
}
