use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::charts::{self, ChartDescriptor};
use crate::color::ColorMap;
use crate::data::filter::{
    FilterState, RangeFilter, filter_by_field, filtered_indices, init_filter_state,
};
use crate::data::model::{NumericField, StudentDataset};
use crate::metrics::{ModelMetrics, ModelName};

// ---------------------------------------------------------------------------
// Selection – everything the sidebar controls
// ---------------------------------------------------------------------------

/// First and last date offered by the date picker.
pub fn date_bounds() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub date: NaiveDate,
    pub model: ModelName,
    pub filters: FilterState,
    /// Apply every range to every histogram instead of one range per chart.
    pub link_filters: bool,
}

impl Selection {
    pub fn new(dataset: &StudentDataset) -> Self {
        Self {
            date: date_bounds().0,
            model: ModelName::default(),
            filters: init_filter_state(dataset),
            link_filters: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Render pass output
// ---------------------------------------------------------------------------

/// Charts that depend only on the dataset, built once.
#[derive(Debug, Clone, Serialize)]
pub struct StaticCharts {
    pub accuracy: ChartDescriptor,
    pub distribution: ChartDescriptor,
    pub correlation: ChartDescriptor,
    pub study_density: ChartDescriptor,
}

impl StaticCharts {
    pub fn build(dataset: &StudentDataset) -> Self {
        Self {
            accuracy: charts::accuracy_comparison(),
            distribution: charts::graduation_distribution(dataset),
            correlation: charts::correlation_ranking(dataset),
            study_density: charts::study_time_density(dataset),
        }
    }
}

/// One range-filtered histogram panel.
#[derive(Debug, Clone, Serialize)]
pub struct FeaturePanel {
    pub field: NumericField,
    pub range: RangeFilter,
    pub visible_rows: usize,
    pub chart: ChartDescriptor,
}

/// Charts that follow the selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub date: NaiveDate,
    pub model: ModelName,
    pub metrics: ModelMetrics,
    pub confusion: ChartDescriptor,
    pub panels: Vec<FeaturePanel>,
}

impl DashboardView {
    /// Run the render pass for the current selection.
    pub fn build(dataset: &StudentDataset, selection: &Selection, bins: usize) -> Self {
        let linked = selection
            .link_filters
            .then(|| filtered_indices(dataset, &selection.filters));

        let panels = NumericField::ALL
            .iter()
            .map(|&field| {
                let range = selection
                    .filters
                    .get(&field)
                    .copied()
                    .unwrap_or_else(|| {
                        let (min, max) = dataset.bounds(field);
                        RangeFilter::new(min, max)
                    });
                let indices = match &linked {
                    Some(all) => all.clone(),
                    None => filter_by_field(dataset, field, range),
                };
                FeaturePanel {
                    field,
                    range,
                    visible_rows: indices.len(),
                    chart: charts::feature_histogram(dataset, &indices, field, bins),
                }
            })
            .collect();

        DashboardView {
            date: selection.date,
            model: selection.model,
            metrics: *selection.model.metrics(),
            confusion: charts::confusion_heatmap(selection.model),
            panels,
        }
    }

    pub fn panel(&self, field: NumericField) -> Option<&FeaturePanel> {
        self.panels.iter().find(|p| p.field == field)
    }
}

#[derive(Serialize)]
struct ExportedView<'a> {
    rows: usize,
    selection: &'a Selection,
    view: &'a DashboardView,
    charts: &'a StaticCharts,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: StudentDataset,

    pub selection: Selection,

    pub static_charts: StaticCharts,

    /// Output of the last render pass.
    pub view: DashboardView,

    /// Colours for graduation status groups.
    pub status_colors: ColorMap,

    /// Colours for model bars.
    pub model_colors: ColorMap,

    pub histogram_bins: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: StudentDataset, histogram_bins: usize) -> Self {
        let selection = Selection::new(&dataset);
        let static_charts = StaticCharts::build(&dataset);
        let view = DashboardView::build(&dataset, &selection, histogram_bins);
        let status_colors = ColorMap::new(dataset.status_values.iter().map(|v| v.to_string()));
        let model_colors = ColorMap::new(ModelName::ALL.iter().map(|m| m.label()));

        Self {
            dataset,
            selection,
            static_charts,
            view,
            status_colors,
            model_colors,
            histogram_bins,
            status_message: None,
        }
    }

    /// Recompute the selection-dependent charts.
    pub fn refresh(&mut self) {
        self.view = DashboardView::build(&self.dataset, &self.selection, self.histogram_bins);
        log::debug!(
            "Render pass: model={}, rows visible {:?}",
            self.selection.model,
            self.view
                .panels
                .iter()
                .map(|p| (p.field.column(), p.visible_rows))
                .collect::<Vec<_>>()
        );
    }

    pub fn set_model(&mut self, model: ModelName) {
        if self.selection.model != model {
            self.selection.model = model;
            self.refresh();
        }
    }

    /// Set the date, clamped into the offered range.
    pub fn set_date(&mut self, date: NaiveDate) {
        let (first, last) = date_bounds();
        let date = date.clamp(first, last);
        if self.selection.date != date {
            self.selection.date = date;
            self.refresh();
        }
    }

    /// Set a field's range from raw slider input.
    pub fn set_range(&mut self, field: NumericField, a: f64, b: f64) {
        let range = RangeFilter::clamped(a, b, self.dataset.bounds(field));
        if self.selection.filters.get(&field) != Some(&range) {
            self.selection.filters.insert(field, range);
            self.refresh();
        }
    }

    pub fn set_link_filters(&mut self, linked: bool) {
        if self.selection.link_filters != linked {
            self.selection.link_filters = linked;
            self.refresh();
        }
    }

    /// Restore every range to the full observed span.
    pub fn reset_filters(&mut self) {
        self.selection.filters = init_filter_state(&self.dataset);
        self.refresh();
    }

    /// Current selection and all chart descriptors as pretty JSON.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ExportedView {
            rows: self.dataset.len(),
            selection: &self.selection,
            view: &self.view,
            charts: &self.static_charts,
        })
    }

    pub fn write_export(&self, path: &Path) -> Result<()> {
        let json = self.export_json().context("serializing dashboard view")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSeries;
    use crate::data::loader::load_reader;

    const CSV: &str = "\
GPA,Absences,StudyTimeWeekly,GraduationStatus
3.6,0,14.0,1
3.0,4,9.5,1
2.4,11,6.0,0
1.9,20,3.2,0
1.2,28,0.5,0
";

    fn state() -> AppState {
        AppState::new(load_reader(CSV.as_bytes()).unwrap(), 10)
    }

    #[test]
    fn test_initial_view_shows_everything() {
        let st = state();
        for panel in &st.view.panels {
            assert_eq!(panel.visible_rows, 5);
            assert_eq!(panel.chart.histogram_total(), 5);
        }
        assert_eq!(st.view.model, ModelName::DecisionTreeC45);
        assert_eq!(st.selection.date, date_bounds().0);
    }

    #[test]
    fn test_independent_ranges() {
        let mut st = state();
        st.set_range(NumericField::Gpa, 2.0, 4.0);
        assert_eq!(st.view.panel(NumericField::Gpa).unwrap().visible_rows, 3);
        assert_eq!(st.view.panel(NumericField::Absences).unwrap().visible_rows, 5);
    }

    #[test]
    fn test_linked_ranges() {
        let mut st = state();
        st.set_range(NumericField::Gpa, 2.0, 4.0);
        st.set_range(NumericField::Absences, 0.0, 5.0);
        st.set_link_filters(true);
        for panel in &st.view.panels {
            assert_eq!(panel.visible_rows, 2);
        }
        st.reset_filters();
        assert_eq!(st.view.panel(NumericField::Gpa).unwrap().visible_rows, 5);
    }

    #[test]
    fn test_range_clamped_and_reordered() {
        let mut st = state();
        st.set_range(NumericField::StudyTimeWeekly, 99.0, -4.0);
        let range = st.selection.filters[&NumericField::StudyTimeWeekly];
        assert_eq!((range.low(), range.high()), (0.5, 14.0));
    }

    #[test]
    fn test_empty_selection_does_not_panic() {
        let mut st = state();
        st.set_range(NumericField::Gpa, 3.1, 3.5);
        let panel = st.view.panel(NumericField::Gpa).unwrap();
        assert_eq!(panel.visible_rows, 0);
        assert!(panel.chart.is_empty());
    }

    #[test]
    fn test_model_switch_updates_heatmap() {
        let mut st = state();
        st.set_model(ModelName::Svm);
        let ChartSeries::Heatmap { cells, .. } = &st.view.confusion.series else {
            panic!("expected heatmap");
        };
        assert_eq!(cells, &vec![vec![310, 15], vec![19, 135]]);
        assert_eq!(st.view.metrics.accuracy, 0.9290);
    }

    #[test]
    fn test_date_clamped() {
        let mut st = state();
        st.set_date(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap());
        assert_eq!(st.selection.date, date_bounds().1);
        st.set_date(NaiveDate::from_ymd_opt(2019, 2, 3).unwrap());
        assert_eq!(st.selection.date, date_bounds().0);
        st.set_date(NaiveDate::from_ymd_opt(2024, 8, 17).unwrap());
        assert_eq!(st.view.date, NaiveDate::from_ymd_opt(2024, 8, 17).unwrap());
    }

    #[test]
    fn test_export_json() {
        let st = state();
        let json: serde_json::Value = serde_json::from_str(&st.export_json().unwrap()).unwrap();
        assert_eq!(json["rows"], 5);
        assert_eq!(json["view"]["model"], "DecisionTreeC45");
        assert_eq!(json["view"]["panels"].as_array().unwrap().len(), 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        st.write_export(&path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("Confusion Matrix"));
    }
}
