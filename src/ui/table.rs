use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::present;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Matching counties (bottom panel)
// ---------------------------------------------------------------------------

/// Table of the counties that passed the last "Update", cheapest first.
pub fn matches_table(ui: &mut Ui, state: &AppState) {
    let matches = state.matches();
    if matches.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No county matches these settings.");
        });
        return;
    }

    let unit = state.unit;
    let span = |lo: f64, hi: f64| format!("{} – {}", unit.format(lo), unit.format(hi));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(180.0))
        .column(Column::auto())
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(110.0))
        .header(20.0, |mut header| {
            for title in ["County", "FIPS", "House price", "Monthly avg", "Annual extremes"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, matches.len(), |mut row| {
                let record = matches[row.index()];
                let hovered = state.hovered.as_ref() == Some(&record.id);
                row.col(|ui: &mut Ui| {
                    let name = RichText::new(&record.display_name);
                    ui.label(if hovered { name.strong() } else { name });
                });
                row.col(|ui: &mut Ui| {
                    ui.monospace(record.id.as_str());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(present::format_price(record.house_price));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(span(record.min_monthly_avg_temp, record.max_monthly_avg_temp));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(span(record.min_annual_temp, record.max_annual_temp));
                });
            });
        });
}
