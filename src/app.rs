use std::sync::Arc;

use eframe::egui;

use crate::data::store::Store;
use crate::state::AppState;
use crate::ui::map::{self, MapGeometry};
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CountyExplorerApp {
    pub state: AppState,
    geometry: MapGeometry,
}

impl CountyExplorerApp {
    pub fn new(store: Arc<Store>) -> Self {
        let geometry = MapGeometry::new(store.boundaries());
        Self {
            state: AppState::new(store),
            geometry,
        }
    }
}

impl eframe::App for CountyExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + actions ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: thresholds ----
        egui::SidePanel::left("threshold_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: matching counties ----
        egui::TopBottomPanel::bottom("matches")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| {
                table::matches_table(ui, &self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::choropleth(ui, &mut self.state, &self.geometry);
        });
    }
}
