/*
 * rows.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Row-range expansion for tables.
//!
//! A row whose first cell carries a `{{ range <expr>}}` directive is cloned
//! once per element of the resolved sequence, with the directive substring
//! stripped from each clone before its cells render against that element.
//! Rows without a directive render in place against the unchanged context.

use docweave_dom::{Document, Element, Row, Table};

use crate::directive::{parse_row_range, RangeDirective};
use crate::engine::RenderPass;
use crate::error::{RenderError, RenderResult};
use crate::eval::evaluate_path;
use crate::value::Value;

impl RenderPass<'_> {
    /// Rewrites the table's row list in place, expanding row-range
    /// directives and substituting cell text.
    pub(crate) fn process_table(
        &mut self,
        doc: &mut Document,
        table: &mut Table,
        data: &Value,
    ) -> RenderResult<()> {
        if self.depth >= self.max_depth {
            return Err(RenderError::NestingTooDeep { max_depth: self.max_depth });
        }
        self.depth += 1;
        let result = self.expand_rows(doc, table, data);
        self.depth -= 1;
        result
    }

    fn expand_rows(
        &mut self,
        doc: &mut Document,
        table: &mut Table,
        data: &Value,
    ) -> RenderResult<()> {
        let rows = std::mem::take(&mut table.rows);
        let mut output = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(range) = row_range_directive(&row) else {
                let mut row = row;
                self.process_row(doc, &mut row, data)?;
                output.push(row);
                continue;
            };
            let source = evaluate_path(&range.source, data)?;
            let Some(items) = source.as_list() else {
                tracing::debug!(
                    source = %range.source,
                    "row range source is not a sequence, dropping row"
                );
                continue;
            };
            tracing::debug!(source = %range.source, rows = items.len(), "expanding row range");
            for item in items {
                let mut cloned = row.clone();
                strip_range_directive(&mut cloned, &range.raw);
                self.process_row(doc, &mut cloned, item)?;
                output.push(cloned);
            }
        }
        table.rows = output;
        Ok(())
    }

    /// Renders every paragraph in every cell against `data`, then recurses
    /// into nested tables. Injector replacements keep only their paragraph
    /// elements; a cell's paragraph list cannot hold anything else.
    fn process_row(&mut self, doc: &mut Document, row: &mut Row, data: &Value) -> RenderResult<()> {
        for cell in &mut row.cells {
            let paragraphs = std::mem::take(&mut cell.paragraphs);
            for mut paragraph in paragraphs {
                match self.substitute_paragraph(doc, &mut paragraph, data)? {
                    Some(replacement) => {
                        for element in replacement {
                            if let Element::Paragraph(kept) = element {
                                cell.paragraphs.push(kept);
                            }
                        }
                    }
                    None => cell.paragraphs.push(paragraph),
                }
            }
            for nested in &mut cell.tables {
                self.process_table(doc, nested, data)?;
            }
        }
        Ok(())
    }
}

/// The range directive governing a row, if any: first cell, first paragraph,
/// substring match.
fn row_range_directive(row: &Row) -> Option<RangeDirective> {
    let cell = row.cells.first()?;
    let paragraph = cell.paragraphs.first()?;
    parse_row_range(&paragraph.text())
}

/// Removes the first occurrence of the raw directive text from a cloned
/// row, leaving any surrounding text in place.
fn strip_range_directive(row: &mut Row, raw: &str) {
    let Some(cell) = row.cells.first_mut() else { return };
    let Some(paragraph) = cell.paragraphs.first_mut() else { return };
    let stripped = paragraph.text().replacen(raw, "", 1);
    paragraph.set_text(stripped);
}
