/*
 * table.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tables, rows, and cells.
//!
//! Cells own paragraphs and, recursively, nested tables. Cloning any table
//! type deep-clones everything it owns, so a cloned row never aliases its
//! source's cells, paragraphs, or nested tables.

use serde::{Deserialize, Serialize};

use crate::paragraph::Paragraph;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProperties {
    /// Preferred table width in twentieths of a point.
    pub width: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowProperties {
    /// Row height in twentieths of a point.
    pub height: Option<u64>,
    /// Repeat this row as a header when the table splits across pages.
    pub header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellProperties {
    /// Preferred cell width in twentieths of a point.
    pub width: Option<u64>,
}

/// A table cell: an ordered list of paragraphs plus any nested tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub properties: CellProperties,
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
}

impl Cell {
    /// A new cell, pre-seeded with one empty paragraph.
    pub fn new() -> Self {
        Cell {
            properties: CellProperties::default(),
            paragraphs: vec![Paragraph::new()],
            tables: Vec::new(),
        }
    }

    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::new());
        match self.paragraphs.last_mut() {
            Some(p) => p,
            None => unreachable!("just pushed a paragraph"),
        }
    }

    /// Flattened text of the cell: paragraph texts joined with newlines,
    /// followed by the text of any nested tables.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = self.paragraphs.iter().map(|p| p.text()).collect();
        for table in &self.tables {
            lines.push(table.text());
        }
        lines.join("\n")
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub properties: RowProperties,
    pub cells: Vec<Cell>,
}

impl Row {
    /// A row with `cols` freshly seeded cells.
    pub fn new(cols: usize) -> Self {
        Row {
            properties: RowProperties::default(),
            cells: (0..cols).map(|_| Cell::new()).collect(),
        }
    }
}

/// A table: an ordered list of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub properties: TableProperties,
    pub rows: Vec<Row>,
}

impl Table {
    /// A `rows` x `cols` grid of empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Table {
            properties: TableProperties::default(),
            rows: (0..rows).map(|_| Row::new(cols)).collect(),
        }
    }

    /// Tab-separated cell text, one line per row.
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| cell.text())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
