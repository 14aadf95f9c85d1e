use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{CellValue, NumericField, StudentDataset};
use crate::metrics::{MODEL_METRICS, ModelName};
use crate::stats::{self, Bins};

// ---------------------------------------------------------------------------
// Chart descriptors
// ---------------------------------------------------------------------------

/// Kind of chart the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Histogram,
    Heatmap,
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
}

/// How bars are coloured by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColoring {
    /// One categorical colour per bar label.
    ByLabel,
    /// Continuous diverging scale on the bar value.
    ByValue,
}

/// Counts of one group over shared bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramGroup {
    pub name: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSeries {
    Bars {
        bars: Vec<BarEntry>,
        coloring: BarColoring,
        /// Decimal places for value labels on top of bars, if shown.
        value_decimals: Option<usize>,
    },
    Histogram {
        bin_start: f64,
        bin_width: f64,
        /// Stacked groups; empty when no rows pass the filter.
        groups: Vec<HistogramGroup>,
        /// Optional density curve in count units.
        overlay: Vec<[f64; 2]>,
    },
    Heatmap {
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        cells: Vec<Vec<u32>>,
    },
}

/// The `(kind, data, labels)` triple handed to the renderer. The same
/// descriptors are what "Export view" writes as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: ChartSeries,
}

impl ChartDescriptor {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.series {
            ChartSeries::Bars { bars, .. } => bars.is_empty(),
            ChartSeries::Histogram { groups, .. } => groups.is_empty(),
            ChartSeries::Heatmap { cells, .. } => cells.is_empty(),
        }
    }

    /// Total number of rows counted in a histogram.
    pub fn histogram_total(&self) -> usize {
        match &self.series {
            ChartSeries::Histogram { groups, .. } => {
                groups.iter().flat_map(|g| g.counts.iter()).sum()
            }
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Accuracy of every model, one bar each.
pub fn accuracy_comparison() -> ChartDescriptor {
    let bars = MODEL_METRICS
        .iter()
        .map(|m| BarEntry {
            label: m.model.label().to_string(),
            value: m.accuracy,
        })
        .collect();

    ChartDescriptor {
        kind: ChartKind::Bar,
        title: "Model accuracy comparison".into(),
        x_label: "Model".into(),
        y_label: "Accuracy".into(),
        series: ChartSeries::Bars {
            bars,
            coloring: BarColoring::ByLabel,
            value_decimals: Some(3),
        },
    }
}

/// Confusion matrix heatmap for the selected model.
pub fn confusion_heatmap(model: ModelName) -> ChartDescriptor {
    let grid = model.metrics().confusion.grid();
    ChartDescriptor {
        kind: ChartKind::Heatmap,
        title: format!("Confusion Matrix - {model}"),
        x_label: "Predicted".into(),
        y_label: "Actual".into(),
        series: ChartSeries::Heatmap {
            row_labels: vec!["0".into(), "1".into()],
            col_labels: vec!["0".into(), "1".into()],
            cells: grid.iter().map(|row| row.to_vec()).collect(),
        },
    }
}

/// Number of students per graduation status.
pub fn graduation_distribution(dataset: &StudentDataset) -> ChartDescriptor {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for rec in &dataset.records {
        *counts.entry(&rec.graduation_status).or_default() += 1;
    }

    let bars = counts
        .into_iter()
        .map(|(status, n)| BarEntry {
            label: status.to_string(),
            value: n as f64,
        })
        .collect();

    ChartDescriptor {
        kind: ChartKind::Bar,
        title: "Student graduation distribution".into(),
        x_label: "Graduation status".into(),
        y_label: "Count".into(),
        series: ChartSeries::Bars {
            bars,
            coloring: BarColoring::ByLabel,
            value_decimals: Some(0),
        },
    }
}

/// Feature correlation with graduation status, sorted ascending.
pub fn correlation_ranking(dataset: &StudentDataset) -> ChartDescriptor {
    let bars = stats::status_correlations(dataset)
        .into_iter()
        .map(|(label, value)| BarEntry { label, value })
        .collect();

    ChartDescriptor {
        kind: ChartKind::Bar,
        title: "Feature correlation with graduation".into(),
        x_label: "Feature".into(),
        y_label: "Correlation".into(),
        series: ChartSeries::Bars {
            bars,
            coloring: BarColoring::ByValue,
            value_decimals: None,
        },
    }
}

/// Histogram of `field` over the rows in `indices`, stacked by graduation status.
pub fn feature_histogram(
    dataset: &StudentDataset,
    indices: &[usize],
    field: NumericField,
    bins: usize,
) -> ChartDescriptor {
    let values: Vec<f64> = indices
        .iter()
        .map(|&i| dataset.records[i].value(field))
        .collect();

    let (bin_start, bin_width, groups) = match Bins::covering(&values, bins) {
        Some(b) => {
            let mut by_status: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();
            for &i in indices {
                let rec = &dataset.records[i];
                by_status
                    .entry(&rec.graduation_status)
                    .or_default()
                    .push(rec.value(field));
            }
            let groups = by_status
                .into_iter()
                .map(|(status, vals)| HistogramGroup {
                    name: status.to_string(),
                    counts: b.counts(&vals),
                })
                .collect();
            (b.start, b.width, groups)
        }
        None => (0.0, 0.0, Vec::new()),
    };

    let title = match field {
        NumericField::Gpa => "GPA distribution by graduation status",
        NumericField::Absences => "Absence distribution by graduation status",
        NumericField::StudyTimeWeekly => "Weekly study time distribution by graduation status",
    };

    ChartDescriptor {
        kind: ChartKind::Histogram,
        title: title.into(),
        x_label: field.column().into(),
        y_label: "Count".into(),
        series: ChartSeries::Histogram {
            bin_start,
            bin_width,
            groups,
            overlay: Vec::new(),
        },
    }
}

/// Bins for the unfiltered study-time histogram with density overlay.
pub const STUDY_TIME_BINS: usize = 20;
const KDE_POINTS: usize = 200;

/// Unfiltered weekly study time histogram with a KDE curve.
pub fn study_time_density(dataset: &StudentDataset) -> ChartDescriptor {
    let values: Vec<f64> = dataset
        .records
        .iter()
        .map(|r| r.study_time_weekly)
        .collect();

    let (bin_start, bin_width, groups, overlay) = match Bins::covering(&values, STUDY_TIME_BINS) {
        Some(b) => {
            let overlay = stats::gaussian_kde(&values, KDE_POINTS, values.len() as f64 * b.width);
            let group = HistogramGroup {
                name: "Students".into(),
                counts: b.counts(&values),
            };
            (b.start, b.width, vec![group], overlay)
        }
        None => (0.0, 0.0, Vec::new(), Vec::new()),
    };

    ChartDescriptor {
        kind: ChartKind::Histogram,
        title: "Weekly study time distribution".into(),
        x_label: "Study time (hours/week)".into(),
        y_label: "Number of students".into(),
        series: ChartSeries::Histogram {
            bin_start,
            bin_width,
            groups,
            overlay,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{RangeFilter, filter_by_field};
    use crate::data::loader::load_reader;

    const CSV: &str = "\
GPA,Absences,StudyTimeWeekly,Tutoring,GraduationStatus
3.5,1,12.0,1,1
3.1,3,10.5,1,1
2.2,14,5.0,0,0
1.4,26,1.5,0,0
2.9,8,7.0,1,1
2.9,10,6.0,0,0
";

    fn dataset() -> StudentDataset {
        load_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_accuracy_bars() {
        let chart = accuracy_comparison();
        assert_eq!(chart.kind, ChartKind::Bar);
        let ChartSeries::Bars { bars, .. } = &chart.series else {
            panic!("expected bars");
        };
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Decision Tree C4.5", "Random Forest", "SVM"]);
        assert_eq!(bars[1].value, 0.9520);
    }

    #[test]
    fn test_confusion_heatmap() {
        let chart = confusion_heatmap(ModelName::DecisionTreeC45);
        assert_eq!(chart.title, "Confusion Matrix - Decision Tree C4.5");
        let ChartSeries::Heatmap { cells, .. } = &chart.series else {
            panic!("expected heatmap");
        };
        assert_eq!(cells, &vec![vec![321, 4], vec![20, 134]]);
    }

    #[test]
    fn test_graduation_counts() {
        let chart = graduation_distribution(&dataset());
        let ChartSeries::Bars { bars, .. } = &chart.series else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), 2);
        assert_eq!((bars[0].label.as_str(), bars[0].value), ("0", 3.0));
        assert_eq!((bars[1].label.as_str(), bars[1].value), ("1", 3.0));
    }

    #[test]
    fn test_integral_float_status_is_one_group() {
        let csv = "GPA,Absences,StudyTimeWeekly,GraduationStatus\n\
                   3.0,2,10.0,1\n\
                   2.5,4,8.0,1.0\n\
                   1.5,20,2.0,0\n";
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.status_values.len(), 2);

        let chart = graduation_distribution(&ds);
        let ChartSeries::Bars { bars, .. } = &chart.series else {
            panic!("expected bars");
        };
        let bars: Vec<(&str, f64)> = bars.iter().map(|b| (b.label.as_str(), b.value)).collect();
        assert_eq!(bars, vec![("0", 1.0), ("1", 2.0)]);

        let all: Vec<usize> = (0..ds.len()).collect();
        let hist = feature_histogram(&ds, &all, NumericField::Gpa, 5);
        let ChartSeries::Histogram { groups, .. } = &hist.series else {
            panic!("expected histogram");
        };
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["0", "1"]);
    }

    #[test]
    fn test_full_range_histogram_counts_every_row() {
        let ds = dataset();
        let (min, max) = ds.bounds(NumericField::Gpa);
        let idx = filter_by_field(&ds, NumericField::Gpa, RangeFilter::new(min, max));
        let chart = feature_histogram(&ds, &idx, NumericField::Gpa, 10);
        assert_eq!(chart.histogram_total(), ds.len());
        let ChartSeries::Histogram { groups, .. } = &chart.series else {
            panic!("expected histogram");
        };
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_empty_subset_histogram() {
        let ds = dataset();
        let chart = feature_histogram(&ds, &[], NumericField::Absences, 10);
        assert!(chart.is_empty());
        assert_eq!(chart.histogram_total(), 0);
    }

    #[test]
    fn test_single_point_histogram() {
        let ds = dataset();
        let idx = filter_by_field(&ds, NumericField::Gpa, RangeFilter::new(2.9, 2.9));
        let chart = feature_histogram(&ds, &idx, NumericField::Gpa, 10);
        let ChartSeries::Histogram { groups, .. } = &chart.series else {
            panic!("expected histogram");
        };
        assert!(groups.iter().all(|g| g.counts.len() == 1));
        assert_eq!(chart.histogram_total(), 2);
    }

    #[test]
    fn test_study_time_density() {
        let chart = study_time_density(&dataset());
        assert_eq!(chart.histogram_total(), 6);
        let ChartSeries::Histogram { overlay, groups, .. } = &chart.series else {
            panic!("expected histogram");
        };
        assert_eq!(groups[0].counts.len(), STUDY_TIME_BINS);
        assert_eq!(overlay.len(), KDE_POINTS);
    }

    #[test]
    fn test_correlation_chart_sorted() {
        let chart = correlation_ranking(&dataset());
        let ChartSeries::Bars { bars, coloring, .. } = &chart.series else {
            panic!("expected bars");
        };
        assert_eq!(*coloring, BarColoring::ByValue);
        assert_eq!(bars.len(), 4);
        assert!(bars.windows(2).all(|w| w[0].value <= w[1].value));
    }

    #[test]
    fn test_descriptor_serializes() {
        let json = serde_json::to_value(confusion_heatmap(ModelName::Svm)).unwrap();
        assert_eq!(json["kind"], "heatmap");
        assert_eq!(json["series"]["type"], "heatmap");
        assert_eq!(json["series"]["cells"][0][1], 15);
    }
}
