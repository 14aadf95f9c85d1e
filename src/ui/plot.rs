use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::charts::{BarColoring, BarEntry, ChartDescriptor, ChartSeries, HistogramGroup};
use crate::color::{self, ColorMap};

const PLOT_HEIGHT: f32 = 280.0;
const HEATMAP_CELL: f32 = 110.0;
const HEATMAP_MARGIN: f32 = 48.0;

// ---------------------------------------------------------------------------
// Descriptor dispatch
// ---------------------------------------------------------------------------

/// Draw a chart descriptor with its title. `colors` resolves categorical series.
pub fn chart(ui: &mut Ui, id: &str, desc: &ChartDescriptor, colors: &ColorMap) {
    ui.strong(&desc.title);

    if desc.is_empty() {
        ui.label(RichText::new("No rows match the current filter.").italics().weak());
        // Keep the layout steady while the filter is too narrow.
        empty_plot(ui, id, desc);
        return;
    }

    match &desc.series {
        ChartSeries::Bars {
            bars,
            coloring,
            value_decimals,
        } => bar_plot(ui, id, desc, bars, *coloring, *value_decimals, colors),
        ChartSeries::Histogram {
            bin_start,
            bin_width,
            groups,
            overlay,
        } => histogram_plot(ui, id, desc, *bin_start, *bin_width, groups, overlay, colors),
        ChartSeries::Heatmap {
            row_labels,
            col_labels,
            cells,
        } => heatmap(ui, desc, row_labels, col_labels, cells),
    }
}

fn empty_plot(ui: &mut Ui, id: &str, desc: &ChartDescriptor) {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(desc.x_label.clone())
        .y_axis_label(desc.y_label.clone())
        .allow_scroll(false)
        .show(ui, |_| {});
}

// ---------------------------------------------------------------------------
// Bar charts (categorical x axis)
// ---------------------------------------------------------------------------

fn bar_plot(
    ui: &mut Ui,
    id: &str,
    desc: &ChartDescriptor,
    entries: &[BarEntry],
    coloring: BarColoring,
    value_decimals: Option<usize>,
    colors: &ColorMap,
) {
    let labels: Vec<String> = entries.iter().map(|e| e.label.clone()).collect();
    let formatter =
        move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark.value);

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let fill = match coloring {
                BarColoring::ByLabel => colors.color_for(&e.label),
                BarColoring::ByValue => color::diverging(e.value),
            };
            Bar::new(i as f64, e.value)
                .name(&e.label)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(desc.x_label.clone())
        .y_axis_label(desc.y_label.clone())
        .allow_scroll(false)
        .x_axis_formatter(formatter)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));

            if let Some(decimals) = value_decimals {
                for (i, e) in entries.iter().enumerate() {
                    let text = RichText::new(format!("{:.*}", decimals, e.value)).strong();
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, e.value), text)
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}

/// Axis label for an integer tick on a categorical axis.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histograms (stacked by group, optional density overlay)
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn histogram_plot(
    ui: &mut Ui,
    id: &str,
    desc: &ChartDescriptor,
    bin_start: f64,
    bin_width: f64,
    groups: &[HistogramGroup],
    overlay: &[[f64; 2]],
    colors: &ColorMap,
) {
    let single = groups.len() == 1;

    let charts: Vec<BarChart> = groups
        .iter()
        .map(|group| {
            let fill = if single && !overlay.is_empty() {
                Color32::from_rgb(70, 110, 200)
            } else {
                colors.color_for(&group.name)
            };
            let bars = group
                .counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    Bar::new(bin_start + (i as f64 + 0.5) * bin_width, n as f64)
                        .width(bin_width)
                        .fill(fill)
                        .stroke(Stroke::new(0.5, Color32::from_gray(40)))
                })
                .collect();
            BarChart::new(bars).name(&group.name).color(fill)
        })
        .collect();

    // Stack each group on all groups before it.
    let mut stacked: Vec<BarChart> = Vec::with_capacity(charts.len());
    for chart in charts {
        let below: Vec<&BarChart> = stacked.iter().collect();
        let chart = chart.stack_on(&below);
        stacked.push(chart);
    }

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(desc.x_label.clone())
        .y_axis_label(desc.y_label.clone())
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
            if !overlay.is_empty() {
                let points: PlotPoints = overlay.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name("density")
                        .color(Color32::from_rgb(20, 40, 120))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap (annotated grid painted directly)
// ---------------------------------------------------------------------------

fn heatmap(
    ui: &mut Ui,
    desc: &ChartDescriptor,
    row_labels: &[String],
    col_labels: &[String],
    cells: &[Vec<u32>],
) {
    let n_rows = cells.len();
    let n_cols = cells.iter().map(Vec::len).max().unwrap_or(0);
    let max = cells.iter().flatten().copied().max().unwrap_or(0).max(1) as f32;
    let min = cells.iter().flatten().copied().min().unwrap_or(0) as f32;

    let size = egui::vec2(
        HEATMAP_MARGIN + n_cols as f32 * HEATMAP_CELL,
        HEATMAP_MARGIN + n_rows as f32 * HEATMAP_CELL,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + egui::vec2(HEATMAP_MARGIN, 0.0);
    let text_color = ui.visuals().text_color();

    for (r, row) in cells.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let t = if max > min { (value as f32 - min) / (max - min) } else { 0.0 };
            let fill = color::blues(t);
            let rect = egui::Rect::from_min_size(
                origin + egui::vec2(c as f32 * HEATMAP_CELL, r as f32 * HEATMAP_CELL),
                egui::vec2(HEATMAP_CELL, HEATMAP_CELL),
            );
            painter.rect_filled(rect.shrink(1.0), 0.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                value.to_string(),
                FontId::proportional(18.0),
                color::contrast_text(fill),
            );
        }
    }

    // Axis tick labels.
    for (r, label) in row_labels.iter().enumerate() {
        painter.text(
            origin + egui::vec2(-8.0, (r as f32 + 0.5) * HEATMAP_CELL),
            Align2::RIGHT_CENTER,
            label,
            FontId::proportional(13.0),
            text_color,
        );
    }
    let grid_bottom = n_rows as f32 * HEATMAP_CELL;
    for (c, label) in col_labels.iter().enumerate() {
        painter.text(
            origin + egui::vec2((c as f32 + 0.5) * HEATMAP_CELL, grid_bottom + 6.0),
            Align2::CENTER_TOP,
            label,
            FontId::proportional(13.0),
            text_color,
        );
    }

    // Axis titles.
    painter.text(
        origin + egui::vec2(n_cols as f32 * HEATMAP_CELL / 2.0, grid_bottom + 26.0),
        Align2::CENTER_TOP,
        &desc.x_label,
        FontId::proportional(14.0),
        text_color,
    );
    painter.text(
        response.rect.min + egui::vec2(4.0, grid_bottom / 2.0),
        Align2::LEFT_CENTER,
        &desc.y_label,
        FontId::proportional(14.0),
        text_color,
    );
}
