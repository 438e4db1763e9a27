//! Core plate data model: tagged spreadsheet cells and the 96-well grid.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Plate geometry: 8 rows (A-H) by 12 columns (1-12).
pub const PLATE_ROWS: usize = 8;
pub const PLATE_COLS: usize = 12;
pub const WELL_COUNT: usize = PLATE_ROWS * PLATE_COLS;

/// Exact, case-sensitive header labels required in the data range.
pub const WELL_HEADER: &str = "Well";
pub const CONFLUENCE_HEADER: &str = "% confluence";

/// Fixed data block within the first sheet (B5:E101), zero-based
/// (row, col) inclusive bounds. Row 0 of the block is the header row.
pub const DATA_RANGE_START: (u32, u32) = (4, 1);
pub const DATA_RANGE_END: (u32, u32) = (100, 4);

/// A single spreadsheet cell value, decoupled from the reader library.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One row of the data range, in source column order.
pub type ParsedRow = Vec<Cell>;

impl Cell {
    /// Text content of the cell. Numeric and boolean cells are not
    /// coerced; a well id must arrive as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content of the cell. Text cells must parse fully as a
    /// float after trimming; booleans and empty cells never do.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// One of the 96 wells, keyed by (row, col).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    /// Canonical identifier, row letter + 1-based column ("A1".."H12").
    pub id: String,
    /// Zero-based row index (A = 0).
    pub row: usize,
    /// Zero-based column index (1 = 0).
    pub col: usize,
    pub row_label: char,
    pub col_label: u32,
    /// Percent confluence; 0 for wells absent from the source data.
    pub value: f64,
}

impl WellRecord {
    /// Parse a source well id into a record. The first character
    /// (case-normalized) is the row letter, the remainder the 1-based
    /// column number. Returns None for ids outside the 8x12 plate or
    /// ids that do not parse cleanly.
    pub fn parse(raw_id: &str, value: f64) -> Option<Self> {
        if raw_id.len() < 2 {
            return None;
        }
        let row_label = raw_id.chars().next()?.to_ascii_uppercase();
        if !('A'..='H').contains(&row_label) {
            return None;
        }
        let col_label: u32 = raw_id[1..].parse().ok()?;
        if !(1..=PLATE_COLS as u32).contains(&col_label) {
            return None;
        }
        let row = (row_label as u8 - b'A') as usize;
        let col = (col_label - 1) as usize;
        Some(Self {
            id: well_id(row, col),
            row,
            col,
            row_label,
            col_label,
            value,
        })
    }

    /// Placeholder record for a well missing from the source data.
    pub fn empty(row: usize, col: usize) -> Self {
        Self {
            id: well_id(row, col),
            row,
            col,
            row_label: (b'A' + row as u8) as char,
            col_label: col as u32 + 1,
            value: 0.0,
        }
    }
}

/// Canonical well id for zero-based coordinates.
pub fn well_id(row: usize, col: usize) -> String {
    format!("{}{}", (b'A' + row as u8) as char, col + 1)
}

/// All 96 canonical well ids in row-major order (A1..A12, .., H12).
pub static WELL_IDS: Lazy<Vec<String>> = Lazy::new(|| {
    (0..PLATE_ROWS)
        .flat_map(|row| (0..PLATE_COLS).map(move |col| well_id(row, col)))
        .collect()
});

/// The complete, normalized 96-record set for one loaded file.
///
/// Wells are stored in canonical row-major order, so the record for
/// (row, col) sits at index `row * 12 + col`. A fresh set replaces the
/// previous one on every load; records are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateData {
    pub wells: Vec<WellRecord>,
}

impl PlateData {
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.wells[row * PLATE_COLS + col].value
    }

    pub fn min_value(&self) -> f64 {
        self.wells.iter().map(|w| w.value).fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.wells
            .iter()
            .map(|w| w.value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
