use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{distribution_measures, SortOrder};
use crate::data::summary::{format_mean, format_rate, format_total};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the dashboard controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard controls");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Measure for the boxplot ----
            ui.strong("Measure for boxplot");
            let measures = distribution_measures(&dataset.provinces);
            let current = state.selection.distribution_measure.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("distribution_measure")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &measures {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.selection.distribution_measure = Some(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Sort order of the ranked bar charts ----
            ui.strong("Sort bar charts");
            ui.horizontal(|ui: &mut Ui| {
                for order in [SortOrder::Descending, SortOrder::Ascending] {
                    ui.radio_value(&mut state.selection.sort_order, order, order.label());
                }
            });
            ui.separator();

            // ---- Poverty range ----
            if let Some((min, max)) = state.poverty_bounds() {
                ui.strong("Poor population range (thousands)");
                let (mut low, mut high) = state.selection.poverty_range.unwrap_or((min, max));
                let low_changed = ui
                    .add(egui::Slider::new(&mut low, min..=max).text("from"))
                    .changed();
                let high_changed = ui
                    .add(egui::Slider::new(&mut high, min..=max).text("to"))
                    .changed();
                if low_changed || high_changed {
                    state.set_poverty_range(low, high);
                }
                ui.separator();
            }

            // ---- Province multi-select ----
            let names = dataset.province_names();
            let n_selected = state.selection.selected_provinces.len();
            let header_text = format!("Provinces  ({n_selected}/{})", names.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("province_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_provinces();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_provinces();
                        }
                    });
                    if state.selection.selected_provinces.is_empty() {
                        ui.label(RichText::new("Nothing selected: showing all provinces").italics());
                    }
                    for name in &names {
                        let mut checked = state.selection.selected_provinces.contains(name);
                        if ui.checkbox(&mut checked, name).changed() {
                            state.toggle_province(name);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered view…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match (&state.dataset, &state.load_error) {
            (Some(ds), _) => {
                ui.label(
                    RichText::new(format!("Loaded from {}", state.source_path.display()))
                        .color(Color32::from_rgb(0x15, 0x57, 0x24)),
                );
                ui.separator();
                ui.label(format!(
                    "{} provinces, {} shown",
                    ds.provinces.len(),
                    state.filtered.len()
                ));
            }
            (None, Some(err)) => {
                ui.label(RichText::new(err.to_string()).color(Color32::RED));
            }
            (None, None) => {}
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Three metric cards over the filtered table.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    if state.filtered.is_empty() {
        ui.label("No provinces match the current filters.");
        return;
    }
    let s = &state.summary;
    let cards = [
        ("Total poor population", format_total(s.total_poverty)),
        ("Mean poverty", format_mean(s.mean_poverty)),
        ("Mean unemployment rate", format_rate(s.mean_unemployment_rate)),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style())
                .fill(Color32::from_rgb(0x09, 0x84, 0xe3))
                .show(col, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(label).color(Color32::WHITE));
                        ui.label(RichText::new(value).heading().strong().color(Color32::WHITE));
                    });
                });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dashboard workbook")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered view")
        .add_filter("CSV", &["csv"])
        .set_file_name("provinsi_filtered.csv")
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}
