//! Threshold statistics: hit counts per plate and across a batch.

use super::types::WellRecord;

/// Hit statistics for one plate against a threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateStats {
    /// Wells with min <= value <= max.
    pub wells_in_threshold: usize,
    /// Wells with a value above zero.
    pub non_zero_wells: usize,
    /// round(wells_in_threshold / non_zero_wells * 100), 0 when no
    /// non-zero wells exist.
    pub hit_percentage: u32,
}

/// Fixed color bands for hit percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitBand {
    /// No hits (0%).
    None,
    /// Above zero, below 20%.
    Low,
    /// 20% to 49%.
    Medium,
    /// 50% and up.
    High,
}

impl HitBand {
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= 50 {
            HitBand::High
        } else if pct >= 20 {
            HitBand::Medium
        } else if pct > 0 {
            HitBand::Low
        } else {
            HitBand::None
        }
    }
}

/// Compute hit statistics for one record set.
pub fn plate_stats(wells: &[WellRecord], min: f64, max: f64) -> PlateStats {
    let wells_in_threshold = wells
        .iter()
        .filter(|w| w.value >= min && w.value <= max)
        .count();
    let non_zero_wells = wells.iter().filter(|w| w.value > 0.0).count();
    let hit_percentage = if non_zero_wells > 0 {
        (wells_in_threshold as f64 / non_zero_wells as f64 * 100.0).round() as u32
    } else {
        0
    };
    PlateStats {
        wells_in_threshold,
        non_zero_wells,
        hit_percentage,
    }
}

/// Totals across a multi-file batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub files: usize,
    pub total_wells: usize,
    pub wells_in_threshold: usize,
    pub non_zero_wells: usize,
    pub hit_percentage: u32,
}

/// Sum hit statistics across all loaded plates using one shared
/// threshold band.
pub fn batch_stats<'a, I>(plates: I, min: f64, max: f64) -> BatchStats
where
    I: IntoIterator<Item = &'a [WellRecord]>,
{
    let mut files = 0;
    let mut total_wells = 0;
    let mut wells_in_threshold = 0;
    let mut non_zero_wells = 0;
    for wells in plates {
        let s = plate_stats(wells, min, max);
        files += 1;
        total_wells += wells.len();
        wells_in_threshold += s.wells_in_threshold;
        non_zero_wells += s.non_zero_wells;
    }
    let hit_percentage = if non_zero_wells > 0 {
        (wells_in_threshold as f64 / non_zero_wells as f64 * 100.0).round() as u32
    } else {
        0
    };
    BatchStats {
        files,
        total_wells,
        wells_in_threshold,
        non_zero_wells,
        hit_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wells(values: &[f64]) -> Vec<WellRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut w = WellRecord::empty(i / 12, i % 12);
                w.value = v;
                w
            })
            .collect()
    }

    #[test]
    fn test_stats_example() {
        let w = wells(&[0.0, 10.0, 20.0, 30.0]);
        let s = plate_stats(&w, 10.0, 20.0);
        assert_eq!(s.wells_in_threshold, 2);
        assert_eq!(s.non_zero_wells, 3);
        assert_eq!(s.hit_percentage, 67); // round(2/3 * 100)
    }

    #[test]
    fn test_stats_no_non_zero_wells() {
        let w = wells(&[0.0, 0.0, 0.0]);
        let s = plate_stats(&w, 0.0, 100.0);
        assert_eq!(s.non_zero_wells, 0);
        assert_eq!(s.hit_percentage, 0);
    }

    #[test]
    fn test_stats_threshold_bounds_inclusive() {
        let w = wells(&[10.0, 20.0, 20.01]);
        let s = plate_stats(&w, 10.0, 20.0);
        assert_eq!(s.wells_in_threshold, 2);
    }

    #[test]
    fn test_hit_bands() {
        assert_eq!(HitBand::from_percentage(0), HitBand::None);
        assert_eq!(HitBand::from_percentage(1), HitBand::Low);
        assert_eq!(HitBand::from_percentage(19), HitBand::Low);
        assert_eq!(HitBand::from_percentage(20), HitBand::Medium);
        assert_eq!(HitBand::from_percentage(49), HitBand::Medium);
        assert_eq!(HitBand::from_percentage(50), HitBand::High);
        assert_eq!(HitBand::from_percentage(100), HitBand::High);
    }

    #[test]
    fn test_batch_totals() {
        let a = wells(&[0.0, 15.0, 40.0]);
        let b = wells(&[15.0, 15.0]);
        let totals = batch_stats([a.as_slice(), b.as_slice()], 10.0, 20.0);
        assert_eq!(totals.files, 2);
        assert_eq!(totals.total_wells, 5);
        assert_eq!(totals.wells_in_threshold, 3);
        assert_eq!(totals.non_zero_wells, 4);
        assert_eq!(totals.hit_percentage, 75);
    }
}
