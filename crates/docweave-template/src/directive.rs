/*
 * directive.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive classification over paragraph text.
//!
//! Block directives (`{{for ...}}`, `{{if ...}}`) must be the entire trimmed
//! text of their paragraph. The row-level range directive is deliberately
//! looser: it may appear anywhere inside the first paragraph of a row's
//! first cell, alongside other text.

/// A matched `{{for <var> in <expr>}}` block opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForDirective {
    pub var: String,
    pub source: String,
}

/// A matched `{{if <expr>}}` block opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfDirective {
    pub condition: String,
}

/// A matched row-level `{{ range <expr>}}` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDirective {
    pub source: String,
    /// The exact directive substring as it appears in the paragraph, kept
    /// so it can be stripped from cloned rows.
    pub raw: String,
}

/// Classifies `text` as a for-block opener. The variable and source are
/// separated by the literal token ` in `; if splitting on it does not give
/// exactly two parts the pattern is rejected even though the prefix and
/// suffix matched.
pub fn parse_for(text: &str) -> Option<ForDirective> {
    let inner = text.trim().strip_prefix("{{for ")?.strip_suffix("}}")?;
    let parts: Vec<&str> = inner.split(" in ").collect();
    let [var, source] = parts.as_slice() else {
        return None;
    };
    Some(ForDirective {
        var: var.trim().to_string(),
        source: source.trim().to_string(),
    })
}

/// Classifies `text` as an if-block opener.
pub fn parse_if(text: &str) -> Option<IfDirective> {
    let inner = text.trim().strip_prefix("{{if ")?.strip_suffix("}}")?;
    Some(IfDirective {
        condition: inner.trim().to_string(),
    })
}

/// Finds a `{{ range <expr>}}` directive anywhere inside `text`. Note the
/// mandatory space after the braces, which distinguishes row-range syntax
/// from the block forms.
pub fn parse_row_range(text: &str) -> Option<RangeDirective> {
    const OPEN: &str = "{{ range";
    let start = text.find(OPEN)?;
    let rest = &text[start..];
    let end = rest.find("}}")?;
    let raw = &rest[..end + 2];
    let source = rest[OPEN.len()..end].trim();
    Some(RangeDirective {
        source: source.to_string(),
        raw: raw.to_string(),
    })
}
