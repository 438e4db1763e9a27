//! Row-to-well normalization: maps extracted data rows onto the full
//! 96-well grid.

use std::collections::BTreeMap;

use super::types::{PLATE_COLS, PLATE_ROWS, ParsedRow, PlateData, WellRecord};

/// Normalize extracted data rows into a complete 96-record plate.
///
/// Malformed rows are dropped, never reported: rows too short to contain
/// both columns, ids that are not text or fall outside A1..H12, and
/// values that are not numeric. When the same well id appears more than
/// once the later row wins. Wells absent from the input are filled with
/// zero-value placeholders, so the result always holds exactly one
/// record per (row, col) pair, in canonical row-major order.
pub fn normalize(rows: &[ParsedRow], well_idx: usize, confluence_idx: usize) -> PlateData {
    let needed = well_idx.max(confluence_idx) + 1;

    let mut parsed: BTreeMap<(usize, usize), WellRecord> = BTreeMap::new();
    for row in rows {
        if row.len() < needed {
            continue;
        }
        let Some(raw_id) = row[well_idx].as_text() else {
            continue;
        };
        let Some(value) = row[confluence_idx].as_number() else {
            continue;
        };
        if let Some(record) = WellRecord::parse(raw_id, value) {
            // Last write wins on duplicate ids
            parsed.insert((record.row, record.col), record);
        }
    }

    let mut wells = Vec::with_capacity(PLATE_ROWS * PLATE_COLS);
    for row in 0..PLATE_ROWS {
        for col in 0..PLATE_COLS {
            let record = parsed
                .remove(&(row, col))
                .unwrap_or_else(|| WellRecord::empty(row, col));
            wells.push(record);
        }
    }

    PlateData { wells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::types::{Cell, WELL_COUNT, well_id};

    fn data_row(id: &str, value: f64) -> ParsedRow {
        vec![Cell::Text(id.to_string()), Cell::Number(value)]
    }

    fn assert_complete(plate: &PlateData) {
        assert_eq!(plate.wells.len(), WELL_COUNT);
        for (i, w) in plate.wells.iter().enumerate() {
            assert_eq!((w.row, w.col), (i / PLATE_COLS, i % PLATE_COLS));
            assert_eq!(w.id, well_id(w.row, w.col));
        }
    }

    #[test]
    fn test_normalize_fills_missing_wells() {
        let rows = vec![data_row("A1", 55.0), data_row("H12", 80.5)];
        let plate = normalize(&rows, 0, 1);

        assert_complete(&plate);
        assert_eq!(plate.value_at(0, 0), 55.0);
        assert_eq!(plate.value_at(7, 11), 80.5);
        let non_zero = plate.wells.iter().filter(|w| w.value > 0.0).count();
        assert_eq!(non_zero, 2);
    }

    #[test]
    fn test_normalize_empty_input_is_all_zero() {
        let plate = normalize(&[], 0, 1);
        assert_complete(&plate);
        assert!(plate.wells.iter().all(|w| w.value == 0.0));
    }

    #[test]
    fn test_normalize_drops_malformed_rows() {
        let rows = vec![
            data_row("A1", 10.0),
            data_row("I1", 99.0),                                  // row label out of range
            data_row("A13", 99.0),                                 // column out of range
            data_row("A0", 99.0),                                  // column not positive
            vec![Cell::Text("B2".into())],                         // too short
            vec![Cell::Number(3.0), Cell::Number(50.0)],           // id not text
            vec![Cell::Text("B3".into()), Cell::Text("n/a".into())], // value not numeric
            vec![Cell::Empty, Cell::Number(50.0)],                 // id absent
        ];
        let plate = normalize(&rows, 0, 1);

        assert_complete(&plate);
        assert_eq!(plate.value_at(0, 0), 10.0);
        let non_zero = plate.wells.iter().filter(|w| w.value > 0.0).count();
        assert_eq!(non_zero, 1);
    }

    #[test]
    fn test_normalize_duplicate_id_last_write_wins() {
        let rows = vec![
            data_row("C5", 20.0),
            data_row("c5", 35.0),
            data_row("C5", 60.0),
        ];
        let plate = normalize(&rows, 0, 1);

        assert_complete(&plate);
        assert_eq!(plate.value_at(2, 4), 60.0);
    }

    #[test]
    fn test_normalize_respects_column_indices() {
        // Well ids in column 2, values in column 0
        let rows = vec![vec![
            Cell::Number(42.0),
            Cell::Text("ignored".into()),
            Cell::Text("D7".into()),
        ]];
        let plate = normalize(&rows, 2, 0);

        assert_complete(&plate);
        assert_eq!(plate.value_at(3, 6), 42.0);
    }

    #[test]
    fn test_normalize_accepts_text_values() {
        let rows = vec![vec![Cell::Text("E2".into()), Cell::Text("73.25".into())]];
        let plate = normalize(&rows, 0, 1);
        assert_eq!(plate.value_at(4, 1), 73.25);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let rows = vec![data_row("A1", 12.5), data_row("F9", 91.0)];
        let first = normalize(&rows, 0, 1);

        // Round-trip the normalized output back through the normalizer
        let rerows: Vec<ParsedRow> = first
            .wells
            .iter()
            .map(|w| data_row(&w.id, w.value))
            .collect();
        let second = normalize(&rerows, 0, 1);

        assert_eq!(first, second);
    }
}
