use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single categorical cell (graduation status)
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, as guessed from CSV text.
/// Used as a `BTreeMap` / `BTreeSet` key so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw CSV cell.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            // `1.0` and `1` must land in the same group.
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return CellValue::Integer(f as i64);
            }
            return CellValue::Float(f);
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// NumericField – the three columns the range sliders act on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NumericField {
    Gpa,
    Absences,
    StudyTimeWeekly,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [
        NumericField::Gpa,
        NumericField::Absences,
        NumericField::StudyTimeWeekly,
    ];

    /// Column header in the CSV file.
    pub fn column(self) -> &'static str {
        match self {
            NumericField::Gpa => "GPA",
            NumericField::Absences => "Absences",
            NumericField::StudyTimeWeekly => "StudyTimeWeekly",
        }
    }

    /// Label shown next to the range slider.
    pub fn label(self) -> &'static str {
        match self {
            NumericField::Gpa => "GPA range",
            NumericField::Absences => "Absence range",
            NumericField::StudyTimeWeekly => "Weekly study time range",
        }
    }

    /// Slider step. `None` means continuous.
    pub fn step(self) -> Option<f64> {
        match self {
            NumericField::Gpa => None,
            NumericField::Absences => Some(1.0),
            NumericField::StudyTimeWeekly => Some(0.1),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Column header of the categorical outcome.
pub const STATUS_COLUMN: &str = "GraduationStatus";

// ---------------------------------------------------------------------------
// StudentRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single student (one row of the source CSV).
#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub gpa: f64,
    pub absences: f64,
    pub study_time_weekly: f64,
    pub graduation_status: CellValue,
    /// Every other column, `None` where the cell was empty.
    pub features: BTreeMap<String, Option<f64>>,
}

impl StudentRecord {
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Gpa => self.gpa,
            NumericField::Absences => self.absences,
            NumericField::StudyTimeWeekly => self.study_time_weekly,
        }
    }
}

// ---------------------------------------------------------------------------
// StudentDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed bounds and status values.
#[derive(Debug, Clone)]
pub struct StudentDataset {
    /// All students (rows).
    pub records: Vec<StudentRecord>,
    /// Extra numeric columns in file order (excludes the four required ones).
    pub feature_names: Vec<String>,
    /// Sorted set of distinct graduation status values.
    pub status_values: BTreeSet<CellValue>,
    /// Observed `(min, max)` per numeric field. Absent when there are no rows.
    pub bounds: BTreeMap<NumericField, (f64, f64)>,
}

impl StudentDataset {
    /// Build the status index and field bounds from loaded records.
    pub fn from_records(records: Vec<StudentRecord>, feature_names: Vec<String>) -> Self {
        let status_values: BTreeSet<CellValue> = records
            .iter()
            .map(|r| r.graduation_status.clone())
            .collect();

        let mut bounds = BTreeMap::new();
        for field in NumericField::ALL {
            let mut values = records.iter().map(|r| r.value(field));
            if let Some(first) = values.next() {
                let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
                bounds.insert(field, (min, max));
            }
        }

        StudentDataset {
            records,
            feature_names,
            status_values,
            bounds,
        }
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed bounds for a field, `(0, 0)` for an empty dataset.
    pub fn bounds(&self, field: NumericField) -> (f64, f64) {
        self.bounds.get(&field).copied().unwrap_or((0.0, 0.0))
    }

    /// Numeric encoding of the graduation status used for correlation.
    ///
    /// Numeric cells map to themselves; text labels map to their rank among
    /// the sorted text labels. Null cells have no encoding.
    pub fn status_code(&self, value: &CellValue) -> Option<f64> {
        match value {
            CellValue::Null => None,
            CellValue::Text(_) => self
                .status_values
                .iter()
                .filter(|v| matches!(v, CellValue::Text(_)))
                .position(|v| v == value)
                .map(|rank| rank as f64),
            other => other.as_f64(),
        }
    }

    /// Every numeric column usable for correlation, as `(name, values)`.
    /// The three slider fields come first, then extra features in file order.
    pub fn numeric_columns(&self) -> Vec<(String, Vec<Option<f64>>)> {
        let mut out: Vec<(String, Vec<Option<f64>>)> = NumericField::ALL
            .iter()
            .map(|&field| {
                let values = self.records.iter().map(|r| Some(r.value(field))).collect();
                (field.column().to_string(), values)
            })
            .collect();

        for name in &self.feature_names {
            let values = self
                .records
                .iter()
                .map(|r| r.features.get(name).copied().flatten())
                .collect();
            out.push((name.clone(), values));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gpa: f64, status: CellValue) -> StudentRecord {
        StudentRecord {
            gpa,
            absences: 3.0,
            study_time_weekly: 10.0,
            graduation_status: status,
            features: BTreeMap::new(),
        }
    }

    #[test]
    fn test_cell_value_parse() {
        assert_eq!(CellValue::parse("1"), CellValue::Integer(1));
        assert_eq!(CellValue::parse(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("1.0"), CellValue::Integer(1));
        assert_eq!(CellValue::parse("-0.0"), CellValue::Integer(0));
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("Lulus"), CellValue::Text("Lulus".into()));
    }

    #[test]
    fn test_bounds() {
        let ds = StudentDataset::from_records(
            vec![
                record(2.0, CellValue::Integer(0)),
                record(3.5, CellValue::Integer(1)),
                record(1.2, CellValue::Integer(0)),
            ],
            Vec::new(),
        );
        assert_eq!(ds.bounds(NumericField::Gpa), (1.2, 3.5));
        assert_eq!(ds.status_values.len(), 2);
    }

    #[test]
    fn test_empty_dataset_bounds() {
        let ds = StudentDataset::from_records(Vec::new(), Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.bounds(NumericField::Absences), (0.0, 0.0));
    }

    #[test]
    fn test_text_status_encoding() {
        let ds = StudentDataset::from_records(
            vec![
                record(2.0, CellValue::Text("Yes".into())),
                record(3.0, CellValue::Text("No".into())),
            ],
            Vec::new(),
        );
        assert_eq!(ds.status_code(&CellValue::Text("No".into())), Some(0.0));
        assert_eq!(ds.status_code(&CellValue::Text("Yes".into())), Some(1.0));
        assert_eq!(ds.status_code(&CellValue::Null), None);
        assert_eq!(ds.status_code(&CellValue::Integer(1)), Some(1.0));
    }
}
