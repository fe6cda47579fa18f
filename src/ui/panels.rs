use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{Attribute, unique_values};
use crate::data::loader::DatasetLoader;
use crate::data::model::{RatioKind, Severity};
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – filters, axes, diagnostics
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let loader = Arc::clone(&state.loader);
    let ds = loader.load();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filters");
            ui.separator();

            match &ds.joined {
                Some(joined) => {
                    let unique = unique_values(joined);
                    for attr in Attribute::ALL {
                        let Some(all_values) = unique.get(&attr) else {
                            continue;
                        };
                        filter_widget(ui, state, attr, all_values);
                    }
                }
                None => {
                    ui.label("No chemical samples loaded.");
                }
            }

            ui.add_space(8.0);
            ui.heading("Ratio axes");
            ui.separator();
            ratio_combo(ui, "x_ratio", "x", &mut state.x_ratio);
            ratio_combo(ui, "y_ratio", "y", &mut state.y_ratio);

            ui.add_space(4.0);
            let callouts: Vec<String> = loader.annotated().iter().map(|id| id.to_string()).collect();
            ui.label(format!(
                "Call-outs: {}",
                if callouts.is_empty() { "none".to_string() } else { callouts.join(", ") }
            ));

            ui.add_space(8.0);
            egui::CollapsingHeader::new(
                RichText::new(format!("Diagnostics ({})", ds.diagnostics.len())).strong(),
            )
            .id_salt("diagnostics")
            .default_open(ds.warning_count() > 0)
            .show(ui, |ui: &mut Ui| {
                if ds.diagnostics.is_empty() {
                    ui.label("All tables loaded cleanly.");
                }
                for diag in &ds.diagnostics {
                    let color = match diag.severity {
                        Severity::Error => Color32::RED,
                        Severity::Warning => Color32::YELLOW,
                    };
                    ui.label(RichText::new(&diag.message).color(color).small());
                }
            });
        });
}

fn filter_widget(
    ui: &mut Ui,
    state: &mut AppState,
    attr: Attribute,
    all_values: &std::collections::BTreeSet<Option<String>>,
) {
    let n_selected = state.filters.get(&attr).map_or(0, |s| s.len());
    let header_text = format!("{attr}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(attr)
        .default_open(attr == Attribute::Section)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(attr);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(attr);
                }
            });

            for val in all_values {
                let mut checked = state
                    .filters
                    .get(&attr)
                    .is_some_and(|selected| selected.contains(val));
                let label = val.as_deref().unwrap_or("<none>");
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_filter_value(attr, val);
                }
            }
        });
}

fn ratio_combo(ui: &mut Ui, id: &str, axis: &str, current: &mut RatioKind) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in RatioKind::ALL {
                ui.selectable_value(current, kind, kind.label());
            }
        });
    ui.label(format!("{axis} axis"));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(joined) = &state.dataset().joined {
            ui.label(format!(
                "{} samples loaded, {} visible",
                joined.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .set_directory(state.loader.data_dir())
        .pick_folder();

    if let Some(path) = folder {
        log::info!("Switching data directory to {}", path.display());
        let loader = Arc::new(DatasetLoader::new(path, state.loader.annotated().clone()));
        state.set_loader(loader);
    }
}
