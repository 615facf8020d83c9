//! CSV tables driving the mockup and translation batches.
//!
//! The format is deliberately naive: one record per line, cells split on
//! every `,`, no quoting or escaping. Cells are kept verbatim because they
//! name files and layers exactly.

use thiserror::Error;

/// Errors raised while reading a batch table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Malformed table: the header row is empty")]
    EmptyHeader,

    #[error("Malformed table: expected a header and at least one data row, found {rows} row(s)")]
    TooFewRows { rows: usize },

    #[error("Malformed table: line {line} has {found} column(s), the header has {expected}")]
    ColumnMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Malformed table: expected at least {expected} columns, the header has {found}")]
    TooFewColumns { expected: usize, found: usize },
}

/// A header row plus data rows, all with the same column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse comma-separated text.
    ///
    /// Blank lines and trailing `\r` are ignored. The first remaining line
    /// is the header.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut records = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.is_empty());

        let Some((_, header_line)) = records.next() else {
            return Err(TableError::TooFewRows { rows: 0 });
        };
        let header = split_cells(header_line);
        if header.iter().all(String::is_empty) {
            return Err(TableError::EmptyHeader);
        }

        let rows = records
            .map(|(line, text)| {
                let cells = split_cells(text);
                if cells.len() != header.len() {
                    return Err(TableError::ColumnMismatch {
                        line,
                        expected: header.len(),
                        found: cells.len(),
                    });
                }
                Ok(cells)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Err(TableError::TooFewRows { rows: 1 });
        }

        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn require_columns(&self, expected: usize) -> Result<(), TableError> {
        if self.header.len() < expected {
            return Err(TableError::TooFewColumns {
                expected,
                found: self.header.len(),
            });
        }
        Ok(())
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

/// One mockup batch row: which design to paste and the fill color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockupRow {
    pub design: String,
    pub color: String,
}

impl MockupRow {
    /// Read `[design_file_name, hex_color, ...]` rows. Extra columns are ignored.
    pub fn from_table(table: &Table) -> Result<Vec<Self>, TableError> {
        table.require_columns(2)?;
        Ok(table
            .rows()
            .iter()
            .map(|cells| MockupRow {
                design: cells[0].clone(),
                color: cells[1].clone(),
            })
            .collect())
    }
}

/// One translation row: a language tag and one text per target layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRow {
    pub language: String,
    pub texts: Vec<String>,
}

/// Translation table: header `[*, layer_1, ...]`, rows `[language, text_1, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    pub layer_names: Vec<String>,
    pub rows: Vec<TranslationRow>,
}

impl TranslationTable {
    pub fn from_table(table: &Table) -> Result<Self, TableError> {
        table.require_columns(2)?;
        let layer_names = table.header()[1..].to_vec();
        let rows = table
            .rows()
            .iter()
            .map(|cells| TranslationRow {
                language: cells[0].clone(),
                texts: cells[1..].to_vec(),
            })
            .collect();
        Ok(Self { layer_names, rows })
    }

    pub fn parse(text: &str) -> Result<Self, TableError> {
        Self::from_table(&Table::parse(text)?)
    }
}
