use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{NumericField, StudentDataset};

// ---------------------------------------------------------------------------
// Range filter: inclusive bounds on one numeric column
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` bound pair. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFilter {
    low: f64,
    high: f64,
}

impl RangeFilter {
    /// Build a filter, reordering the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            RangeFilter { low: a, high: b }
        } else {
            RangeFilter { low: b, high: a }
        }
    }

    /// Build a filter from user input clamped to the observed `(min, max)`.
    pub fn clamped(a: f64, b: f64, (min, max): (f64, f64)) -> Self {
        Self::new(a.clamp(min, max), b.clamp(min, max))
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Active range per numeric field. A field absent from the map is unconstrained.
pub type FilterState = BTreeMap<NumericField, RangeFilter>;

/// Initialise a [`FilterState`] spanning the full observed range of every field.
pub fn init_filter_state(dataset: &StudentDataset) -> FilterState {
    NumericField::ALL
        .iter()
        .map(|&field| {
            let (min, max) = dataset.bounds(field);
            (field, RangeFilter::new(min, max))
        })
        .collect()
}

/// Return indices of students whose value lies within every active range.
pub fn filtered_indices(dataset: &StudentDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            filters
                .iter()
                .all(|(&field, range)| range.contains(rec.value(field)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Indices passing a single field's range.
pub fn filter_by_field(
    dataset: &StudentDataset,
    field: NumericField,
    range: RangeFilter,
) -> Vec<usize> {
    let mut filters = FilterState::new();
    filters.insert(field, range);
    filtered_indices(dataset, &filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, StudentRecord};

    fn dataset() -> StudentDataset {
        let rows = [
            (3.9, 0.0, 15.0, 1),
            (2.0, 12.0, 4.5, 0),
            (3.0, 5.0, 10.0, 1),
            (3.0, 7.0, 9.9, 0),
            (1.1, 29.0, 0.2, 0),
        ];
        let records = rows
            .iter()
            .map(|&(gpa, absences, study, status)| StudentRecord {
                gpa,
                absences,
                study_time_weekly: study,
                graduation_status: CellValue::Integer(status),
                features: BTreeMap::new(),
            })
            .collect();
        StudentDataset::from_records(records, Vec::new())
    }

    #[test]
    fn test_range_reorders() {
        let r = RangeFilter::new(5.0, 1.0);
        assert_eq!((r.low(), r.high()), (1.0, 5.0));
    }

    #[test]
    fn test_clamped_to_bounds() {
        let r = RangeFilter::clamped(-3.0, 100.0, (0.0, 4.0));
        assert_eq!((r.low(), r.high()), (0.0, 4.0));
    }

    #[test]
    fn test_subset_matches_mask() {
        let ds = dataset();
        for (lo, hi) in [(1.5, 3.0), (3.0, 3.9), (0.0, 1.0), (2.5, 2.6)] {
            let range = RangeFilter::new(lo, hi);
            let expected: Vec<usize> = ds
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.gpa >= lo && r.gpa <= hi)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(filter_by_field(&ds, NumericField::Gpa, range), expected);
        }
    }

    #[test]
    fn test_full_range_is_identity() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), (0..ds.len()).collect::<Vec<_>>());

        let (min, max) = ds.bounds(NumericField::Gpa);
        let gpa = filter_by_field(&ds, NumericField::Gpa, RangeFilter::new(min, max));
        assert_eq!(gpa.len(), ds.len());
    }

    #[test]
    fn test_single_point() {
        let ds = dataset();
        let idx = filter_by_field(&ds, NumericField::Gpa, RangeFilter::new(3.0, 3.0));
        assert_eq!(idx, vec![2, 3]);
    }

    #[test]
    fn test_combined_filters() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.insert(NumericField::Gpa, RangeFilter::new(2.5, 4.0));
        filters.insert(NumericField::Absences, RangeFilter::new(0.0, 6.0));
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);
    }

    #[test]
    fn test_combined_filters_match_mask() {
        let ds = dataset();
        let mut filters = FilterState::new();
        filters.insert(NumericField::Absences, RangeFilter::new(0.0, 12.0));
        filters.insert(NumericField::StudyTimeWeekly, RangeFilter::new(4.5, 10.0));
        let expected: Vec<usize> = ds
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                (0.0..=12.0).contains(&r.absences) && (4.5..=10.0).contains(&r.study_time_weekly)
            })
            .map(|(i, _)| i)
            .collect();
        assert_eq!(expected, vec![1, 2, 3]);
        assert_eq!(filtered_indices(&ds, &filters), expected);
    }

    #[test]
    fn test_everything_excluded() {
        let ds = dataset();
        let idx = filter_by_field(&ds, NumericField::StudyTimeWeekly, RangeFilter::new(20.0, 30.0));
        assert!(idx.is_empty());
    }
}
