use std::sync::Arc;

use eframe::egui;

use crate::data::loader::DatasetLoader;
use crate::state::{AppState, View};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustySherdsApp {
    pub state: AppState,
}

impl RustySherdsApp {
    pub fn new(loader: Arc<DatasetLoader>) -> Self {
        Self {
            state: AppState::new(loader),
        }
    }
}

impl eframe::App for RustySherdsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and view selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters, axes, diagnostics ----
        egui::SidePanel::left("side_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Reference => tables::reference_table(ui, &self.state),
            View::Mineralogy => plot::mineralogy_charts(ui, &self.state),
            View::Chemistry => tables::chemistry_table(ui, &mut self.state),
            View::Ratios => plot::ratio_scatter(ui, &self.state),
        });
    }
}
