//! Header validation over the fixed data range.

use super::error::{PlateError, Result};
use super::types::{CONFLUENCE_HEADER, ParsedRow, WELL_HEADER};

/// Positions of the two required columns plus the data rows that follow
/// the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub well_idx: usize,
    pub confluence_idx: usize,
    pub rows: Vec<ParsedRow>,
}

/// Validate the header row of the fixed data range and locate the
/// well-id and confluence columns.
///
/// Row 0 of `rows` is the header; header labels must match
/// [`WELL_HEADER`] and [`CONFLUENCE_HEADER`] exactly (case-sensitive).
/// If either is absent the whole file is rejected with
/// [`PlateError::MissingColumns`] naming the missing label(s).
pub fn extract(rows: &[ParsedRow]) -> Result<ExtractedTable> {
    let empty = ParsedRow::new();
    let header = rows.first().unwrap_or(&empty);
    let find = |label: &str| header.iter().position(|c| c.as_text() == Some(label));

    match (find(WELL_HEADER), find(CONFLUENCE_HEADER)) {
        (Some(well_idx), Some(confluence_idx)) => Ok(ExtractedTable {
            well_idx,
            confluence_idx,
            rows: rows[1..].to_vec(),
        }),
        (well, confluence) => {
            let mut missing = Vec::new();
            if well.is_none() {
                missing.push(WELL_HEADER);
            }
            if confluence.is_none() {
                missing.push(CONFLUENCE_HEADER);
            }
            Err(PlateError::MissingColumns(missing.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::types::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_extract_finds_columns() {
        let rows = vec![
            vec![text("Image"), text("Well"), text("Object count"), text("% confluence")],
            vec![text("img_001"), text("A1"), Cell::Number(120.0), Cell::Number(45.5)],
        ];
        let table = extract(&rows).unwrap();
        assert_eq!(table.well_idx, 1);
        assert_eq!(table.confluence_idx, 3);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_extract_missing_confluence() {
        let rows = vec![vec![text("Well"), text("confluence")]];
        let err = extract(&rows).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("% confluence"), "unexpected message: {msg}");
        assert!(!msg.contains("Well,"));
    }

    #[test]
    fn test_extract_header_is_case_sensitive() {
        let rows = vec![vec![text("well"), text("% Confluence")]];
        let err = extract(&rows).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Well"));
        assert!(msg.contains("% confluence"));
    }

    #[test]
    fn test_extract_empty_range() {
        let err = extract(&[]).unwrap_err();
        assert!(matches!(err, PlateError::MissingColumns(_)));
    }

    #[test]
    fn test_extract_header_only() {
        let rows = vec![vec![text("Well"), text("% confluence")]];
        let table = extract(&rows).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_extract_ignores_non_text_header_cells() {
        let rows = vec![vec![Cell::Number(1.0), text("Well"), text("% confluence")]];
        let table = extract(&rows).unwrap();
        assert_eq!(table.well_idx, 1);
        assert_eq!(table.confluence_idx, 2);
    }
}
