//! Result tables: one two-column table per n-gram order, and the wide table
//! that places them side by side.

use serde::Serialize;

use crate::error::{NgramError, Result};
use crate::ngrams::NgramCount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub term: String,
    pub frequency: u32,
}

/// Ranked n-grams of a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub order: usize,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn term_header(&self) -> String {
        format!("{}-gram", self.order)
    }

    pub fn frequency_header(&self) -> String {
        format!("{}-gram frequency", self.order)
    }

    pub fn headers(&self) -> [String; 2] {
        [self.term_header(), self.frequency_header()]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the table for `order` from ranked counts. An empty ranking is an error.
pub fn build_table(order: usize, ranked: &[NgramCount]) -> Result<ResultTable> {
    let rows = ranked
        .iter()
        .map(|c| TableRow {
            term: c.term(),
            frequency: c.count,
        })
        .collect();
    let table = ResultTable { order, rows };
    if table.is_empty() {
        return Err(NgramError::EmptyResults { order });
    }
    Ok(table)
}

/// A cell of the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Term(&'a str),
    Frequency(u32),
    Missing,
}

/// Several result tables aligned by row position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedTable {
    tables: Vec<ResultTable>,
}

impl CombinedTable {
    pub fn tables(&self) -> &[ResultTable] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<ResultTable> {
        self.tables
    }

    /// Rows of the longest table; shorter tables pad with [`Cell::Missing`].
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(ResultTable::len).max().unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.tables.len() * 2
    }

    pub fn headers(&self) -> Vec<String> {
        self.tables.iter().flat_map(ResultTable::headers).collect()
    }

    pub fn row(&self, index: usize) -> Vec<Cell<'_>> {
        let mut cells = Vec::with_capacity(self.column_count());
        for table in &self.tables {
            match table.rows.get(index) {
                Some(row) => {
                    cells.push(Cell::Term(&row.term));
                    cells.push(Cell::Frequency(row.frequency));
                }
                None => {
                    cells.push(Cell::Missing);
                    cells.push(Cell::Missing);
                }
            }
        }
        cells
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell<'_>>> + '_ {
        (0..self.row_count()).map(move |i| self.row(i))
    }
}

impl From<ResultTable> for CombinedTable {
    fn from(table: ResultTable) -> Self {
        CombinedTable {
            tables: vec![table],
        }
    }
}

/// Places tables side by side, in the order given. Nothing is truncated.
pub fn combine_tables(tables: Vec<ResultTable>) -> CombinedTable {
    CombinedTable { tables }
}
