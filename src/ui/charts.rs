use std::f32::consts::TAU;

use anyhow::{bail, Result};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points, Text,
};

use crate::color::{generate_palette, ColorScale};
use crate::data::labor::labor_participation;
use crate::data::model::ProvinceRecord;
use crate::data::regency::{regency_detail, regency_provinces};
use crate::data::resolve::Concept;
use crate::data::school::extract_age_brackets;
use crate::data::series::{map_points, pie_slices, ranked};
use crate::data::summary::BoxStats;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Tab dispatch with a failure boundary per view
// ---------------------------------------------------------------------------

/// Render the active tab. An error in one view is logged and shown inline
/// in that view; the rest of the dashboard keeps working.
pub fn active_tab(ui: &mut Ui, state: &mut AppState) {
    let tab = state.active_tab;
    ui.heading(tab.title());
    ui.add_space(4.0);

    let result = match tab {
        Tab::PovertyMap => poverty_map(ui, state),
        Tab::Unemployment => unemployment_ranking(ui, state),
        Tab::LaborParticipation => labor_lines(ui, state),
        Tab::Poverty => poverty_ranking(ui, state),
        Tab::Boxplot => distribution_box(ui, state),
        Tab::SchoolParticipation => school_pie(ui, state),
    };

    if let Err(e) = result {
        log::error!("{} view failed: {e:#}", tab.title());
        ui.label(RichText::new(format!("Error in {}: {e:#}", tab.title())).color(Color32::RED));
    }
}

/// Axis formatter showing category names on integer grid marks.
fn category_formatter(names: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if (v - v.round()).abs() > 1e-6 || v < 0.0 {
            return String::new();
        }
        names.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

// ---------------------------------------------------------------------------
// 1. Poverty map
// ---------------------------------------------------------------------------

fn poverty_map(ui: &mut Ui, state: &AppState) -> Result<()> {
    let Some(ds) = &state.dataset else {
        bail!("province data not available");
    };
    let missing = ds
        .province_columns
        .missing(&[Concept::Latitude, Concept::Longitude, Concept::Poverty]);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        bail!(
            "coordinate or poverty column not found ({}); available columns: {}",
            names.join(", "),
            ds.provinces.columns.join(", ")
        );
    }

    let points = map_points(&state.filtered, &ds.province_columns);
    if points.is_empty() {
        ui.label("No valid rows to show on the map.");
        return Ok(());
    }

    let scale = ColorScale::poverty_map();
    let (min, max) = value_range(points.iter().map(|p| p.poverty));
    ui.label(format!("Poverty map of Indonesia: {} provinces", points.len()));

    Plot::new("poverty_map")
        .height(560.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .include_x(94.0)
        .include_x(142.0)
        .include_y(-11.0)
        .include_y(6.5)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for p in &points {
                let t = if max > min { (p.poverty - min) / (max - min) } else { 1.0 };
                let name = match p.unemployment_rate {
                    Some(rate) => format!(
                        "{}: {:.1} thousand poor, unemployment {rate:.2}%",
                        p.province, p.poverty
                    ),
                    None => format!("{}: {:.1} thousand poor", p.province, p.poverty),
                };
                plot_ui.points(
                    Points::new(vec![[p.longitude, p.latitude]])
                        .radius(4.0 + 20.0 * t.sqrt() as f32)
                        .color(scale.for_value(p.poverty, min, max).gamma_multiply(0.8))
                        .filled(true)
                        .name(name),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(p.longitude, p.latitude),
                        RichText::new(&p.province).small(),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
    Ok(())
}

// ---------------------------------------------------------------------------
// 2 & 4. Ranked bar charts
// ---------------------------------------------------------------------------

fn ranked_bars(ui: &mut Ui, id: &str, pairs: &[(String, f64)], scale: &ColorScale, value_label: &str) {
    let (min, max) = value_range(pairs.iter().map(|(_, v)| *v));
    // First-ranked bar at the top.
    let names: Vec<String> = pairs.iter().rev().map(|(n, _)| n.clone()).collect();
    let bars: Vec<Bar> = pairs
        .iter()
        .rev()
        .enumerate()
        .map(|(i, (name, value))| {
            Bar::new(i as f64, *value)
                .name(format!("{name}: {value:.2}"))
                .fill(scale.for_value(*value, min.min(0.0), max))
        })
        .collect();

    Plot::new(id)
        .height(420.0)
        .x_axis_label(value_label)
        .y_axis_formatter(category_formatter(names))
        .y_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
        });
}

fn unemployment_ranking(ui: &mut Ui, state: &AppState) -> Result<()> {
    let Some(ds) = &state.dataset else {
        bail!("province data not available");
    };
    let Some(col) = ds.province_columns.get(Concept::UnemploymentRate) else {
        ui.label("Unemployment rate column (TPT) not found.");
        return Ok(());
    };
    let pairs = ranked(
        &state.filtered,
        &ds.province_columns,
        col,
        state.selection.sort_order,
        state.config.top_n,
    );
    ui.label(format!("Top {} provinces by {col}", pairs.len()));
    ranked_bars(ui, "unemployment_bars", &pairs, &ColorScale::reds(), col);
    Ok(())
}

fn poverty_ranking(ui: &mut Ui, state: &mut AppState) -> Result<()> {
    let Some(ds) = state.dataset.clone() else {
        bail!("province data not available");
    };
    let Some(col) = ds.province_columns.get(Concept::Poverty) else {
        ui.label("Poverty column not found.");
        return Ok(());
    };
    let pairs = ranked(
        &state.filtered,
        &ds.province_columns,
        col,
        state.selection.sort_order,
        state.config.top_n,
    );
    ui.label(format!("Top {} provinces by {col}", pairs.len()));
    ranked_bars(ui, "poverty_bars", &pairs, &ColorScale::blues(), col);

    ui.separator();
    ui.strong("Regency/city detail");
    if ds.regencies.is_empty() {
        ui.label("Regency/city data not available.");
        return Ok(());
    }
    let provinces = regency_provinces(&ds.regencies, &ds.regency_columns);
    if provinces.is_empty() {
        ui.label("Regency/city data has no province column.");
        return Ok(());
    }
    let selected = match &state.regency_province {
        Some(p) if provinces.contains(p) => p.clone(),
        _ => provinces[0].clone(),
    };
    egui::ComboBox::from_id_salt("regency_province")
        .selected_text(&selected)
        .show_ui(ui, |ui: &mut Ui| {
            for p in &provinces {
                if ui.selectable_label(*p == selected, p).clicked() {
                    state.regency_province = Some(p.clone());
                }
            }
        });

    let records = regency_detail(
        &ds.regencies,
        &ds.regency_columns,
        &selected,
        state.config.regency_limit,
    );
    if records.is_empty() {
        ui.label(format!("No regency/city data for {selected}."));
        return Ok(());
    }

    ui.label(format!(
        "Poverty in regencies/cities of {} (top {})",
        records[0].province,
        records.len()
    ));
    let scale = ColorScale::reds();
    let (min, max) = value_range(records.iter().map(|r| r.poverty));
    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    let bars: Vec<Bar> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.poverty)
                .name(format!("{}: {:.1}", r.name, r.poverty))
                .fill(scale.for_value(r.poverty, min.min(0.0), max))
        })
        .collect();
    Plot::new("regency_bars")
        .height(300.0)
        .x_axis_formatter(category_formatter(names))
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7));
        });

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(200.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Regency/city");
            });
            header.col(|ui| {
                ui.strong("Poverty");
            });
        })
        .body(|mut body| {
            for r in &records {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", r.poverty));
                    });
                });
            }
        });
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Labour participation by sex
// ---------------------------------------------------------------------------

fn labor_lines(ui: &mut Ui, state: &AppState) -> Result<()> {
    let Some(ds) = &state.dataset else {
        bail!("province data not available");
    };
    if ds.labor.is_empty() {
        ui.label("Labour participation data not available.");
        return Ok(());
    }
    let records = labor_participation(&ds.labor, &ds.labor_columns)?;

    let names: Vec<String> = records.iter().map(|r| r.province.clone()).collect();
    let male: Vec<[f64; 2]> = records.iter().enumerate().map(|(i, r)| [i as f64, r.male]).collect();
    let female: Vec<[f64; 2]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| [i as f64, r.female])
        .collect();
    let (male_color, female_color) = (Color32::from_rgb(0x34, 0x98, 0xdb), Color32::from_rgb(0xe7, 0x4c, 0x3c));

    Plot::new("labor_lines")
        .height(480.0)
        .legend(Legend::default())
        .x_axis_label("Province")
        .y_axis_label("Participation (%)")
        .x_axis_formatter(category_formatter(names))
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (label, series, color) in [("Male", male, male_color), ("Female", female, female_color)] {
                plot_ui.line(
                    Line::new(PlotPoints::from(series.clone()))
                        .name(label)
                        .color(color)
                        .width(3.0),
                );
                plot_ui.points(Points::new(series).name(label).color(color).radius(4.0));
            }
        });
    Ok(())
}

// ---------------------------------------------------------------------------
// 5. Distribution boxplot
// ---------------------------------------------------------------------------

fn distribution_box(ui: &mut Ui, state: &AppState) -> Result<()> {
    let Some(measure) = &state.selection.distribution_measure else {
        ui.label("Pick a measure in the side panel to show its distribution.");
        return Ok(());
    };
    let values = state.filtered.numeric_values(measure);
    let Some(stats) = BoxStats::from_values(&values) else {
        ui.label(format!("{measure} has no numeric values in the current selection."));
        return Ok(());
    };

    ui.label(format!(
        "n = {}   min {:.2}   Q1 {:.2}   median {:.2}   Q3 {:.2}   max {:.2}   mean {:.2}",
        stats.count, stats.min, stats.q1, stats.median, stats.q3, stats.max, stats.mean
    ));
    let color = Color32::from_rgb(0x74, 0xb9, 0xff);
    let outliers: Vec<[f64; 2]> = stats.outliers(&values).into_iter().map(|v| [0.0, v]).collect();

    Plot::new("distribution_box")
        .height(400.0)
        .y_axis_label(measure.as_str())
        .show_x(false)
        .include_x(-1.0)
        .include_x(1.0)
        .show(ui, |plot_ui| {
            let elem = BoxElem::new(
                0.0,
                BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                ),
            )
            .name(measure.as_str())
            .box_width(0.5)
            .fill(color.gamma_multiply(0.5))
            .stroke(Stroke::new(1.5, color));
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(measure.as_str()));
            if !outliers.is_empty() {
                plot_ui.points(Points::new(outliers).color(color).radius(3.0).name("outliers"));
            }
        });
    Ok(())
}

// ---------------------------------------------------------------------------
// 6. School participation pie
// ---------------------------------------------------------------------------

fn school_pie(ui: &mut Ui, state: &mut AppState) -> Result<()> {
    let Some(ds) = state.dataset.clone() else {
        bail!("province data not available");
    };
    let Some(name_col) = ds.province_columns.get(Concept::Province) else {
        bail!("province column not found");
    };
    let mut provinces: Vec<String> = (0..state.filtered.len())
        .filter_map(|row| state.filtered.text(row, name_col))
        .collect();
    provinces.sort();
    provinces.dedup();
    if provinces.is_empty() {
        ui.label("No provinces match the current filters.");
        return Ok(());
    }

    let selected = match &state.school_province {
        Some(p) if provinces.contains(p) => p.clone(),
        _ => provinces[0].clone(),
    };
    egui::ComboBox::from_id_salt("school_province")
        .selected_text(&selected)
        .show_ui(ui, |ui: &mut Ui| {
            for p in &provinces {
                if ui.selectable_label(*p == selected, p).clicked() {
                    state.school_province = Some(p.clone());
                }
            }
        });

    let Some(record) = (0..state.filtered.len())
        .filter_map(|row| ProvinceRecord::from_row(&state.filtered, &ds.province_columns, row))
        .find(|r| r.name == selected)
    else {
        ui.label(format!("Province '{selected}' not found."));
        return Ok(());
    };

    let slices = pie_slices(&extract_age_brackets(&record));
    if slices.is_empty() {
        ui.label("No school participation data for the selected province.");
        return Ok(());
    }

    ui.label(format!("School participation: {}", record.name));
    let colors = generate_palette(slices.len());
    let size = Vec2::new(ui.available_width(), 360.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let radius = (rect.height() * 0.45).min(rect.width() * 0.3);
    let center = Pos2::new(rect.left() + radius + 16.0, rect.center().y);

    let mut start = -TAU / 4.0;
    for (slice, color) in slices.iter().zip(&colors) {
        let sweep = slice.fraction as f32 * TAU;
        for shape in wedge(center, radius, start, sweep, *color) {
            painter.add(shape);
        }
        if slice.fraction >= 0.04 {
            let mid = start + sweep / 2.0;
            let at = center + Vec2::angled(mid) * radius * 0.65;
            painter.text(
                at,
                Align2::CENTER_CENTER,
                format!("{:.1}%", slice.fraction * 100.0),
                FontId::proportional(13.0),
                Color32::BLACK,
            );
        }
        start += sweep;
    }

    // Legend to the right of the pie.
    let mut y = rect.top() + 12.0;
    let x = center.x + radius + 32.0;
    for (slice, color) in slices.iter().zip(&colors) {
        painter.rect_filled(
            egui::Rect::from_min_size(Pos2::new(x, y), Vec2::splat(12.0)),
            2.0,
            *color,
        );
        painter.text(
            Pos2::new(x + 18.0, y + 6.0),
            Align2::LEFT_CENTER,
            format!("{}  ({:.1})", slice.label, slice.value),
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );
        y += 20.0;
    }
    Ok(())
}

/// Filled circular sector, split so every polygon stays convex.
fn wedge(center: Pos2, radius: f32, start: f32, sweep: f32, fill: Color32) -> Vec<Shape> {
    let parts = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
    let step = sweep / parts as f32;
    (0..parts)
        .map(|p| {
            let a0 = start + step * p as f32;
            let segments = ((step / TAU) * 96.0).ceil().max(2.0) as usize;
            let mut points = Vec::with_capacity(segments + 2);
            points.push(center);
            for s in 0..=segments {
                let a = a0 + step * s as f32 / segments as f32;
                points.push(center + Vec2::angled(a) * radius);
            }
            Shape::convex_polygon(points, fill, Stroke::new(1.0, Color32::WHITE))
        })
        .collect()
}
