use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::{SiteSelection, ALL_SITES};
use crate::data::model::Outcome;
use crate::state::{AppState, InputEvent};

// ---------------------------------------------------------------------------
// Left side panel – input controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Launch Site");
    ui.separator();

    site_dropdown(ui, state);
    ui.add_space(8.0);

    ui.strong("Payload range (Kg):");
    payload_sliders(ui, state);
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Outcomes");
            outcome_table(ui, state);
            ui.separator();

            ui.strong("Booster Version Category");
            for (category, color) in state.colors.legend_entries() {
                ui.label(RichText::new(format!("● {category}")).color(color));
            }
        });
}

fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let current = state.dashboard.input().site.clone();
    let mut picked: Option<String> = None;

    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current == SiteSelection::All, "All Sites")
                .clicked()
            {
                picked = Some(ALL_SITES.to_string());
            }
            for site in state.dashboard.dataset().sites() {
                if ui
                    .selectable_label(current.value() == site, site)
                    .clicked()
                {
                    picked = Some(site.clone());
                }
            }
        });

    if let Some(site) = picked {
        state.handle(InputEvent::SiteChanged(site));
    }
}

/// Two sliders stand in for a range slider.  Dragging `Min` past `Max`
/// produces an inverted range, which the dashboard rejects; the sliders then
/// snap back to the last valid state on the next frame.
fn payload_sliders(ui: &mut Ui, state: &mut AppState) {
    let range = state.dashboard.input().payload;
    let ceiling = state.dashboard.ceiling();
    let (mut low, mut high) = (range.low(), range.high());

    let mut changed = false;
    changed |= ui
        .add(
            Slider::new(&mut low, 0.0..=ceiling)
                .step_by(state.slider_step)
                .text("Min"),
        )
        .changed();
    changed |= ui
        .add(
            Slider::new(&mut high, 0.0..=ceiling)
                .step_by(state.slider_step)
                .text("Max"),
        )
        .changed();

    if changed {
        state.handle(InputEvent::PayloadRangeChanged { low, high });
    }
}

fn outcome_table(ui: &mut Ui, state: &AppState) {
    let agg = state.dashboard.aggregation();

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("class");
            });
            header.col(|ui| {
                ui.strong("Count");
            });
            header.col(|ui| {
                ui.strong("Share");
            });
        })
        .body(|mut body| {
            for outcome in Outcome::ALL {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(format!("{} ({})", outcome, outcome.label()));
                    });
                    row.col(|ui| {
                        ui.label(agg.count(outcome).to_string());
                    });
                    row.col(|ui| {
                        let share = agg
                            .share(outcome)
                            .map(|s| format!("{s:.1}%"))
                            .unwrap_or_else(|| "–".to_string());
                        ui.label(share);
                    });
                });
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} launches loaded, {} in scatter",
            state
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            state.dashboard.dataset().len(),
            state.dashboard.scatter().len()
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

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match state.load_dataset(&path) {
            Ok(()) => log::info!(
                "Switched to {} ({} launches)",
                path.display(),
                state.dashboard.dataset().len()
            ),
            Err(e) => log::debug!("Keeping {} after failed load: {e}", state.source.display()),
        }
    }
}
