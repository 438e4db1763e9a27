//! Tabular exports: the normalized plate as a grid-shaped CSV or XLSX
//! document (header row 1..12, one row per plate letter A-H).

use std::path::Path;

use rust_xlsxwriter::Workbook;

use super::error::Result;
use super::types::{PLATE_COLS, PLATE_ROWS, PlateData};

/// Sheet name used for the XLSX export.
pub const EXPORT_SHEET_NAME: &str = "PlateData";

/// Arrange the record set as an 8x12 value grid keyed by coordinates.
fn value_grid(plate: &PlateData) -> [[Option<f64>; PLATE_COLS]; PLATE_ROWS] {
    let mut grid = [[None; PLATE_COLS]; PLATE_ROWS];
    for well in &plate.wells {
        grid[well.row][well.col] = Some(well.value);
    }
    grid
}

/// Format a value the way the CSV/grid exports print it: integers
/// without a decimal point, everything else in shortest float form.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Render the plate as CSV text: header `,1,2,...,12`, then one row per
/// letter A-H in alphabetical order.
pub fn to_csv_string(plate: &PlateData) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![String::new()];
    header.extend((1..=PLATE_COLS).map(|c| c.to_string()));
    writer.write_record(&header)?;

    let grid = value_grid(plate);
    for (row, values) in grid.iter().enumerate() {
        let mut record = vec![((b'A' + row as u8) as char).to_string()];
        record.extend(
            values
                .iter()
                .map(|v| v.map(format_value).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().expect("csv writer into_inner");
    Ok(String::from_utf8(bytes).expect("csv output is utf-8"))
}

/// Write the CSV grid to a file.
pub fn write_csv(plate: &PlateData, path: &Path) -> Result<()> {
    std::fs::write(path, to_csv_string(plate)?)?;
    Ok(())
}

/// Write the same grid shape as a single-sheet XLSX workbook.
pub fn write_xlsx(plate: &PlateData, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for col in 0..PLATE_COLS {
        sheet.write_number(0, col as u16 + 1, (col + 1) as f64)?;
    }
    let grid = value_grid(plate);
    for (row, values) in grid.iter().enumerate() {
        let sheet_row = row as u32 + 1;
        sheet.write_string(sheet_row, 0, ((b'A' + row as u8) as char).to_string())?;
        for (col, value) in values.iter().enumerate() {
            if let Some(v) = *value {
                sheet.write_number(sheet_row, col as u16 + 1, v)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
