//! Plate data core: fixed-range extraction, 96-well normalization,
//! threshold statistics and tabular export.

pub mod error;
pub mod export;
pub mod extract;
pub mod load;
pub mod normalize;
pub mod stats;
pub mod types;

pub use error::{PlateError, Result};
pub use export::{format_value, to_csv_string, write_csv, write_xlsx};
pub use extract::{ExtractedTable, extract};
pub use load::{is_supported_file, load_plate_file};
pub use normalize::normalize;
pub use stats::{BatchStats, HitBand, PlateStats, batch_stats, plate_stats};
pub use types::{
    CONFLUENCE_HEADER, Cell, PLATE_COLS, PLATE_ROWS, ParsedRow, PlateData, WELL_COUNT,
    WELL_HEADER, WellRecord,
};
