use eframe::egui::{self, Color32, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Shown in place of a table or chart whose data failed to load.
pub fn unavailable(ui: &mut Ui, what: &str) {
    ui.colored_label(
        Color32::YELLOW,
        format!("⚠ {what} unavailable – see Diagnostics in the side panel."),
    );
}

pub fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v}"))
}

/// A striped, resizable grid of `n_rows` rows; `cell(row, col)` supplies text.
fn grid(ui: &mut Ui, id: &str, headers: &[String], n_rows: usize, cell: impl Fn(usize, usize) -> String) {
    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(56.0), headers.len())
                .header(22.0, |mut header| {
                    for h in headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(h.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, n_rows, |mut row| {
                        let r = row.index();
                        for c in 0..headers.len() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell(r, c));
                            });
                        }
                    });
                });
        });
    });
}

// ---------------------------------------------------------------------------
// Reference and description
// ---------------------------------------------------------------------------

pub fn reference_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Reference and Description of Ceramic Artifact Samples");
    let Some(reference) = &state.dataset().reference else {
        unavailable(ui, "Reference table");
        return;
    };

    let headers: Vec<String> = ["Sample Reference", "Section", "SU", "Type", "Sub-Type"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    grid(ui, "reference_table", &headers, reference.len(), |r, c| {
        let row = &reference.rows[r];
        match c {
            0 => row.sample_id.to_string(),
            1 => row.section.to_string(),
            2 => row.stratigraphic_unit.clone(),
            3 => row.kind.clone(),
            _ => row.sub_type.clone(),
        }
    });
}

// ---------------------------------------------------------------------------
// Chemical contents
// ---------------------------------------------------------------------------

pub fn chemistry_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Chemical Contents in Ceramic Artifact Samples");
        ui.checkbox(&mut state.element_major, "Elements as rows");
    });
    ui.label("Major elements in %, trace elements in mg/kg. Filters apply.");

    let Some(joined) = &state.dataset().joined else {
        unavailable(ui, "Chemical table");
        return;
    };
    let visible: Vec<_> = state.visible_indices.iter().map(|&i| &joined.rows[i]).collect();

    if state.element_major {
        let headers: Vec<String> = std::iter::once("Element".to_string())
            .chain(visible.iter().map(|s| s.sample_id.to_string()))
            .collect();
        grid(ui, "chemistry_elements", &headers, joined.elements.len(), |r, c| match c {
            0 => joined.elements[r].clone(),
            _ => fmt_value(visible[c - 1].values[r]),
        });
    } else {
        let headers: Vec<String> = ["Sample", "Section"]
            .iter()
            .map(|s| s.to_string())
            .chain(joined.elements.iter().cloned())
            .collect();
        grid(ui, "chemistry_samples", &headers, visible.len(), |r, c| {
            let sample = visible[r];
            match c {
                0 => sample.sample_id.to_string(),
                1 => sample.section.to_string(),
                _ => fmt_value(sample.values[c - 2]),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_value() {
        assert_eq!(fmt_value(Some(3.9)), "3.9");
        assert_eq!(fmt_value(Some(0.0)), "0");
        assert_eq!(fmt_value(None), "–");
    }
}
