use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::NumericField;
use crate::metrics::ModelName;
use crate::state::AppState;
use crate::ui::narrative;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left sidebar: date, model and range filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(narrative::TITLE);
    ui.label(RichText::new(narrative::SUBTITLE).strong());
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date ----
            ui.strong("📅 Date");
            let mut date = state.selection.date;
            let picker = ui.add(DatePickerButton::new(&mut date).id_salt("selected_date"));
            // Out-of-range picks are clamped by `set_date`.
            if picker.changed() {
                state.set_date(date);
            }
            ui.label(format!("📌 Selected date: {}", state.selection.date));
            ui.separator();

            // ---- Model ----
            ui.strong("📊 Model");
            let mut model = state.selection.model;
            egui::ComboBox::from_id_salt("model_select")
                .selected_text(model.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in ModelName::ALL {
                        ui.selectable_value(&mut model, m, m.label());
                    }
                });
            state.set_model(model);
            ui.separator();

            // ---- Range filters ----
            ui.strong("Filters");
            for field in NumericField::ALL {
                range_slider(ui, state, field);
            }

            let mut linked = state.selection.link_filters;
            if ui
                .checkbox(&mut linked, "Apply all ranges to every histogram")
                .changed()
            {
                state.set_link_filters(linked);
            }
            if ui.small_button("Reset ranges").clicked() {
                state.reset_filters();
            }
        });
}

/// Low/high slider pair for one numeric field.
fn range_slider(ui: &mut Ui, state: &mut AppState, field: NumericField) {
    let (min, max) = state.dataset.bounds(field);
    let Some(current) = state.selection.filters.get(&field).copied() else {
        return;
    };
    let (mut low, mut high) = (current.low(), current.high());

    let icon = match field {
        NumericField::Gpa => "🎓",
        NumericField::Absences => "📅",
        NumericField::StudyTimeWeekly => "📚",
    };

    egui::CollapsingHeader::new(RichText::new(format!("{icon} {}", field.label())).strong())
        .id_salt(field.column())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let mut changed = false;
            let mut from = egui::Slider::new(&mut low, min..=max).text("from");
            let mut to = egui::Slider::new(&mut high, min..=max).text("to");
            if let Some(step) = field.step() {
                from = from.step_by(step);
                to = to.step_by(step);
            }
            changed |= ui.add(from).changed();
            changed |= ui.add(to).changed();

            if changed {
                state.set_range(field, low, high);
            }

            if let Some(panel) = state.view.panel(field) {
                let text = format!("{} of {} students", panel.visible_rows, state.dataset.len());
                ui.label(RichText::new(text).small().weak());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export view…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} students loaded, {} feature columns",
            state.dataset.len(),
            state.dataset.feature_names.len() + NumericField::ALL.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .set_file_name("dashboard_view.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.write_export(&path) {
            Ok(()) => {
                log::info!("Exported dashboard view to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
