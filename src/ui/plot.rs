use eframe::egui::{Align2, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points, Text};

use crate::color::ColorMap;
use crate::data::model::{MineralogyTable, SampleId};
use crate::state::AppState;
use crate::ui::tables::unavailable;

// ---------------------------------------------------------------------------
// Mineralogy: stacked bars per section
// ---------------------------------------------------------------------------

/// One stacked bar chart per section (samples on x, mineral % stacked).
pub fn mineralogy_charts(ui: &mut Ui, state: &AppState) {
    let ds = state.dataset();
    ui.heading("Semi-Quantitative Mineralogical Composition of Ceramic Artifact Samples");

    let chart_height = ((ui.available_height() - 80.0) / 2.0).max(180.0);
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        for (section, table) in [(1, &ds.mineralogy_s1), (2, &ds.mineralogy_s2)] {
            ui.strong(format!("Section {section}"));
            match table {
                Some(table) if !table.is_empty() => mineral_bars(ui, table, chart_height),
                Some(_) => unavailable(ui, &format!("Section {section} mineralogy (no samples)")),
                None => unavailable(ui, &format!("Section {section} mineralogy")),
            }
            ui.add_space(8.0);
        }
    });
}

fn mineral_bars(ui: &mut Ui, table: &MineralogyTable, height: f32) {
    let colors = ColorMap::new(&table.minerals);
    let labels: Vec<String> = table.rows.iter().map(|r| r.sample_id.to_string()).collect();

    let mut charts: Vec<BarChart> = Vec::with_capacity(table.minerals.len());
    for (m, mineral) in table.minerals.iter().enumerate() {
        let bars = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.values[m].unwrap_or(0.0))
                    .name(&labels[i])
                    .width(0.7)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(mineral)
            .color(colors.color_for(mineral))
            .stack_on(&below);
        charts.push(chart);
    }

    let axis_labels = labels;
    Plot::new(("mineralogy", table.section))
        .legend(Legend::default())
        .height(height)
        .y_axis_label("%")
        .x_axis_label("Sample")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value;
            if i.fract() == 0.0 && i >= 0.0 {
                axis_labels.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Sc-normalised ratio scatter
// ---------------------------------------------------------------------------

/// Scatter of two Sc-normalised ratios, one colour and marker per section,
/// configured call-out samples drawn hollow and labelled.
pub fn ratio_scatter(ui: &mut Ui, state: &AppState) {
    let ds = state.dataset();
    ui.heading("Sc-normalised Chemical Ratios");

    let Some(ratios) = &ds.ratios else {
        unavailable(ui, "Ratio view");
        return;
    };
    if ratios.is_empty() {
        unavailable(ui, "Ratio view (no sample has Sc > 0)");
        return;
    }
    let visible = state.visible_sample_ids();
    let (x_kind, y_kind) = (state.x_ratio, state.y_ratio);

    let mut callouts: Vec<(SampleId, [f64; 2])> = Vec::new();
    let mut groups = Vec::new();
    for (section, samples) in &ratios.groups {
        let points: Vec<[f64; 2]> = samples
            .iter()
            .filter(|s| visible.contains(&s.sample_id))
            .filter_map(|s| {
                let p = [x_kind.get(s)?, y_kind.get(s)?];
                if s.annotated {
                    callouts.push((s.sample_id, p));
                }
                Some(p)
            })
            .collect();
        groups.push((*section, points));
    }

    let callout_color = ui.visuals().strong_text_color();
    let n_points: usize = groups.iter().map(|(_, p)| p.len()).sum();
    ui.label(format!(
        "{n_points} of {} samples with Sc > 0 plotted (filters and missing ratios exclude the rest).",
        ratios.len()
    ));

    Plot::new("ratio_scatter")
        .legend(Legend::default())
        .x_axis_label(x_kind.label())
        .y_axis_label(y_kind.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (section, points) in groups {
                let group = Points::new(points)
                    .name(section.to_string())
                    .color(state.section_colors.color_for(&section))
                    .shape(state.section_colors.marker_for(&section))
                    .filled(true)
                    .radius(4.0);
                plot_ui.points(group);
            }

            if !callouts.is_empty() {
                let rings: Vec<[f64; 2]> = callouts.iter().map(|(_, p)| *p).collect();
                plot_ui.points(
                    Points::new(rings)
                        .name("call-outs")
                        .color(callout_color)
                        .filled(false)
                        .radius(8.0),
                );
                for (id, [x, y]) in callouts {
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), format!("  {id}"))
                            .anchor(Align2::LEFT_BOTTOM)
                            .color(callout_color),
                    );
                }
            }
        });
}
