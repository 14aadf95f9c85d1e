use eframe::egui::{RichText, ScrollArea, Ui};

use crate::data::model::NumericField;
use crate::state::AppState;
use crate::ui::{narrative, plot};

// ---------------------------------------------------------------------------
// Central panel – charts and narrative, top to bottom
// ---------------------------------------------------------------------------

/// Render every chart of the current view.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let charts = &state.static_charts;
    let view = &state.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            section(ui, "📊 Model accuracy comparison");
            plot::chart(ui, "accuracy", &charts.accuracy, &state.model_colors);
            ui.label(narrative::ACCURACY);

            section(ui, &format!("📊 Confusion Matrix - {}", view.model));
            plot::chart(ui, "confusion", &view.confusion, &state.model_colors);
            ui.label(RichText::new(narrative::model_summary(&view.metrics)).monospace());
            ui.label(narrative::CONFUSION);

            section(ui, "📊 Student graduation distribution");
            plot::chart(ui, "distribution", &charts.distribution, &state.status_colors);
            ui.label(narrative::DISTRIBUTION);

            section(ui, "📊 Feature correlation with graduation");
            plot::chart(ui, "correlation", &charts.correlation, &state.status_colors);
            ui.label(narrative::CORRELATION);

            section(ui, "📊 Feature analysis by graduation status");
            ui.columns(2, |cols| {
                feature_panel(&mut cols[0], state, NumericField::Gpa, narrative::GPA);
                feature_panel(&mut cols[1], state, NumericField::Absences, narrative::ABSENCES);
            });

            ui.add_space(8.0);
            ui.label(narrative::STUDY_TIME);
            feature_panel(ui, state, NumericField::StudyTimeWeekly, "");

            section(ui, "📊 Weekly study time distribution");
            ui.label(narrative::STUDY_DENSITY);
            plot::chart(ui, "study_density", &charts.study_density, &state.status_colors);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.separator();
}

fn feature_panel(ui: &mut Ui, state: &AppState, field: NumericField, text: &str) {
    let Some(panel) = state.view.panel(field) else {
        return;
    };
    plot::chart(ui, field.column(), &panel.chart, &state.status_colors);
    ui.label(
        RichText::new(format!(
            "{} in [{:.2}, {:.2}] · {} students",
            field,
            panel.range.low(),
            panel.range.high(),
            panel.visible_rows
        ))
        .small()
        .weak(),
    );
    if !text.is_empty() {
        ui.label(text);
    }
}
