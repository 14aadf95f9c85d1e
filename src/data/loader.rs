use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{CellValue, NumericField, STATUS_COLUMN, StudentDataset, StudentRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the student dataset from a CSV file.
///
/// CSV layout: header row with column names. Required columns are
/// `GraduationStatus`, `GPA`, `Absences` and `StudyTimeWeekly`; every other
/// column is kept as a numeric feature for the correlation ranking.
pub fn load_file(path: &Path) -> Result<StudentDataset> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    load_csv(reader).with_context(|| format!("loading {}", path.display()))
}

/// Load the dataset from any CSV source (used by tests with in-memory text).
pub fn load_reader<R: Read>(source: R) -> Result<StudentDataset> {
    load_csv(csv::Reader::from_reader(source))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<StudentDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };

    let status_idx = position(STATUS_COLUMN)?;
    let gpa_idx = position(NumericField::Gpa.column())?;
    let absences_idx = position(NumericField::Absences.column())?;
    let study_idx = position(NumericField::StudyTimeWeekly.column())?;
    let required = [status_idx, gpa_idx, absences_idx, study_idx];

    let feature_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !required.contains(i))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut non_numeric: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let gpa = parse_required(record.get(gpa_idx), row_no, NumericField::Gpa.column())?;
        let absences =
            parse_required(record.get(absences_idx), row_no, NumericField::Absences.column())?;
        let study_time_weekly = parse_required(
            record.get(study_idx),
            row_no,
            NumericField::StudyTimeWeekly.column(),
        )?;
        let graduation_status = CellValue::parse(record.get(status_idx).unwrap_or(""));

        let mut features = BTreeMap::new();
        for (col_idx, name) in &feature_cols {
            let cell = record.get(*col_idx).unwrap_or("").trim();
            let value = if cell.is_empty() {
                None
            } else {
                match cell.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        non_numeric.insert(name.clone());
                        None
                    }
                }
            };
            features.insert(name.clone(), value);
        }

        records.push(StudentRecord {
            gpa,
            absences,
            study_time_weekly,
            graduation_status,
            features,
        });
    }

    for name in &non_numeric {
        log::warn!("Column '{name}' has non-numeric values; excluded from correlation");
        for rec in &mut records {
            rec.features.remove(name);
        }
    }

    let feature_names: Vec<String> = feature_cols
        .into_iter()
        .map(|(_, name)| name)
        .filter(|name| !non_numeric.contains(name))
        .collect();

    Ok(StudentDataset::from_records(records, feature_names))
}

fn parse_required(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let raw = cell.unwrap_or("").trim();
    if raw.is_empty() {
        bail!("Row {row}: '{col}' is empty");
    }
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{raw}' is not a number"))?;
    if !value.is_finite() {
        bail!("Row {row}, {col}: '{raw}' is not finite");
    }
    Ok(value)
}
