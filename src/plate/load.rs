//! Workbook loading: opens a plate-reader export, slices the fixed data
//! range out of the first sheet and runs extraction + normalization.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use log::info;

use super::error::{PlateError, Result};
use super::extract::extract;
use super::normalize::normalize;
use super::types::{Cell, DATA_RANGE_END, DATA_RANGE_START, ParsedRow, PlateData};

/// Whether the file has a supported plate-reader export extension.
pub fn is_supported_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls")
    )
}

/// Load one plate-reader export into a normalized 96-well plate.
///
/// Only the first sheet is read, restricted to the fixed B5:E101 block.
/// The file is rejected before parsing if its extension is unsupported.
pub fn load_plate_file(path: &Path) -> Result<PlateData> {
    if !is_supported_file(path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        return Err(PlateError::UnsupportedFileType(name));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(PlateError::EmptyWorkbook)??;

    let rows = data_range_rows(&range);
    let table = extract(&rows)?;
    let plate = normalize(&table.rows, table.well_idx, table.confluence_idx);

    info!(
        "loaded {}: {} non-zero wells",
        path.display(),
        plate.wells.iter().filter(|w| w.value > 0.0).count()
    );
    Ok(plate)
}

/// Slice the fixed data block out of the sheet's used range. Cells the
/// sheet never populated read as empty.
pub fn data_range_rows(range: &Range<Data>) -> Vec<ParsedRow> {
    let (start_row, start_col) = DATA_RANGE_START;
    let (end_row, end_col) = DATA_RANGE_END;
    (start_row..=end_row)
        .map(|row| {
            (start_col..=end_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(convert_cell)
                        .unwrap_or(Cell::Empty)
                })
                .collect()
        })
        .collect()
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::types::WELL_COUNT;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_file(Path::new("scan.xlsx")));
        assert!(is_supported_file(Path::new("scan.xls")));
        assert!(is_supported_file(Path::new("SCAN.XLSX")));
        assert!(!is_supported_file(Path::new("scan.csv")));
        assert!(!is_supported_file(Path::new("scan.xlsx.bak")));
        assert!(!is_supported_file(Path::new("scan")));
    }

    #[test]
    fn test_unsupported_file_rejected_before_parsing() {
        let err = load_plate_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, PlateError::UnsupportedFileType(_)));
        assert!(err.to_string().contains("notes.txt"));
    }

    fn sheet_with_block() -> Range<Data> {
        let mut range = Range::new((0, 0), (120, 10));
        // Decoy header outside the fixed block; must be ignored
        range.set_value((0, 0), Data::String("Well".into()));
        range.set_value((0, 1), Data::String("% confluence".into()));
        // Real header at B5:E5
        range.set_value((4, 1), Data::String("Well".into()));
        range.set_value((4, 2), Data::String("Object count".into()));
        range.set_value((4, 3), Data::String("% confluence".into()));
        // Data rows
        range.set_value((5, 1), Data::String("A1".into()));
        range.set_value((5, 3), Data::Float(42.5));
        range.set_value((6, 1), Data::String("H12".into()));
        range.set_value((6, 3), Data::Int(90));
        // Row below the block end; must be ignored
        range.set_value((101, 1), Data::String("B2".into()));
        range.set_value((101, 3), Data::Float(10.0));
        range
    }

    #[test]
    fn test_range_slicing_and_normalization() {
        let rows = data_range_rows(&sheet_with_block());
        assert_eq!(rows.len(), 97); // header + 96 data rows
        assert_eq!(rows[0][0], Cell::Text("Well".into()));

        let table = extract(&rows).unwrap();
        assert_eq!(table.well_idx, 0);
        assert_eq!(table.confluence_idx, 2);

        let plate = normalize(&table.rows, table.well_idx, table.confluence_idx);
        assert_eq!(plate.wells.len(), WELL_COUNT);
        assert_eq!(plate.value_at(0, 0), 42.5);
        assert_eq!(plate.value_at(7, 11), 90.0);
        // Decoys outside the block contributed nothing
        assert_eq!(plate.value_at(1, 1), 0.0);
    }
}
