use eframe::egui::{self, Color32, RichText, Sense, Slider, Ui, Vec2};

use crate::present::{self, TempUnit};
use crate::state::{AppState, Bound};

// ---------------------------------------------------------------------------
// Left side panel – threshold controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Where to buy a house?");
    ui.separator();

    // ---- Maximum price ----
    ui.strong("Maximum typical house cost");
    let mut price = state.pending.max_house_price;
    let changed = ui
        .add(
            Slider::new(&mut price, present::PRICE_RANGE)
                .step_by(1_000.0)
                .custom_formatter(|v, _| present::format_price(v))
                .custom_parser(|s| s.trim().trim_start_matches('$').replace(',', "").parse().ok()),
        )
        .changed();
    if changed {
        state.set_max_price(price);
    }
    tick_row(ui, present::price_ticks().into_iter().step_by(3));
    ui.add_space(8.0);

    // ---- Temperature ranges ----
    let unit = state.unit;
    ui.strong("Monthly low / high temperature");
    let range = state.pending.monthly_range;
    let (low, high) = range_controls(ui, "monthly", unit, range.low, range.high);
    if let Some(v) = low {
        state.set_monthly(Bound::Low, v);
    }
    if let Some(v) = high {
        state.set_monthly(Bound::High, v);
    }
    ui.add_space(8.0);

    ui.strong("Annual extreme temperatures");
    let range = state.pending.annual_range;
    let (low, high) = range_controls(ui, "annual", unit, range.low, range.high);
    if let Some(v) = low {
        state.set_annual(Bound::Low, v);
    }
    if let Some(v) = high {
        state.set_annual(Bound::High, v);
    }
    tick_row(ui, present::temp_ticks(unit).into_iter().step_by(4));

    ui.add_space(12.0);
    ui.separator();
    legend(ui, state);
}

/// Low/high slider pair. Returns the new value of whichever end moved.
fn range_controls(
    ui: &mut Ui,
    id: &str,
    unit: TempUnit,
    mut low: f64,
    mut high: f64,
) -> (Option<f64>, Option<f64>) {
    let slider = |ui: &mut Ui, value: &mut f64, text: &str| {
        ui.add(
            Slider::new(value, present::TEMP_RANGE)
                .step_by(1.0)
                .text(text)
                .custom_formatter(move |v, _| unit.format(v))
                .custom_parser(move |s| present::parse_temp(unit, s)),
        )
        .changed()
    };

    ui.push_id(id, |ui: &mut Ui| {
        let low_changed = slider(ui, &mut low, "low");
        let high_changed = slider(ui, &mut high, "high");
        (low_changed.then_some(low), high_changed.then_some(high))
    })
    .inner
}

/// A wrapped row of small tick labels.
fn tick_row(ui: &mut Ui, ticks: impl Iterator<Item = (f64, String)>) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (_, label) in ticks {
            ui.label(RichText::new(label).small().weak());
        }
    });
}

/// Colour bar for the house price scale.
fn legend(ui: &mut Ui, state: &AppState) {
    ui.strong("House price");
    let entries = state.color_scale.legend_entries(48);
    let width = ui.available_width().min(240.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 14.0), Sense::hover());
    let step = width / entries.len().max(1) as f32;
    for (i, (_, color)) in entries.iter().enumerate() {
        let x0 = rect.left() + i as f32 * step;
        let cell = egui::Rect::from_min_max(
            egui::pos2(x0, rect.top()),
            egui::pos2(x0 + step + 0.5, rect.bottom()),
        );
        ui.painter().rect_filled(cell, 0.0, *color);
    }
    let (lo, hi) = state.color_scale.domain();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(present::format_price(lo)).small());
        ui.add_space((width - 150.0).max(8.0));
        ui.label(RichText::new(format!("{}+", present::format_price(hi))).small());
    });
    ui.label(RichText::new("Counties without fill do not match.").small().weak());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export matches…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Change unit").clicked() {
            state.toggle_unit();
        }

        let update = if state.is_dirty() {
            egui::Button::new(RichText::new("Update").strong()).fill(Color32::DARK_GREEN)
        } else {
            egui::Button::new("Update")
        };
        if ui.add(update).clicked() {
            state.apply();
            state.status_message = None;
        }

        ui.separator();

        ui.label(format!(
            "{} counties loaded, {} match",
            state.store.len(),
            state.matching_count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export matching counties")
        .add_filter("CSV", &["csv"])
        .set_file_name("matches.csv")
        .save_file();

    if let Some(path) = file {
        let result = crate::export::write_matches(&path, &state.matches());
        match result {
            Ok(n) => {
                log::info!("Exported {n} counties to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
