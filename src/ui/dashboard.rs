//! Dashboard panel with headline stats, navigation cards and activity log.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHART_PIE, COOKING_POT, FILE_XLS};

use super::app::{App, LogLevel, Panel};
use super::components::{colors, dashboard_card, section, stat_card};
use crate::models::BatchStatus;

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let currency = app.currency().to_string();

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        ui.label(RichText::new("ShroomTrack").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Procurement, Processing and Sales").size(14.0).weak());

        ui.add_space(30.0);

        let processing = app
            .batches
            .iter()
            .filter(|b| b.status == BatchStatus::Processing)
            .count();
        let profit_color = if app.summary.is_profitable() {
            colors::SUCCESS
        } else {
            colors::ERROR
        };

        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 700.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(
                ui,
                "Revenue",
                &format!("{currency} {:.2}", app.summary.revenue),
                "Delivered sales",
                None,
            );
            stat_card(
                ui,
                "Net Profit",
                &format!("{currency} {:.2}", app.summary.net_profit),
                "Revenue minus outflow",
                Some(profit_color),
            );
            stat_card(
                ui,
                "On the Floor",
                &app.batches.len().to_string(),
                &format!("{processing} processing"),
                None,
            );
            stat_card(ui, "Recipes", &app.recipes.len().to_string(), "In the library", None);
        });

        ui.add_space(30.0);

        let available = ui.available_width();
        let num_cards = 2.0;
        let spacing = 30.0;
        let card_width = ((available - spacing) / num_cards).clamp(150.0, 250.0);
        let card_size = egui::vec2(card_width, card_width * 0.75);
        let start_offset = ((available - card_width * num_cards - spacing) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if dashboard_card(ui, "Finance", "Procurement, sales and costs", CHART_PIE, card_size).clicked() {
                next_panel = Some(Panel::Finance);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Processing", "Batch floor and recipes", COOKING_POT, card_size).clicked() {
                next_panel = Some(Panel::Processing);
            }
        });

        ui.add_space(30.0);
    });

    let column_width = (ui.available_width() - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);
            section(ui, "Quick Actions", |ui| {
                ui.set_min_width(column_width - 30.0);

                if ui.button(format!("{ARROWS_CLOCKWISE} Refresh All")).clicked() {
                    app.refresh_all();
                }
                ui.add_space(5.0);
                if ui.button(format!("{FILE_XLS} Export Cost Log")).clicked() {
                    app.export_cost_log();
                }
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!("Data source: {}", app.backend_name()))
                        .small()
                        .weak(),
                );
            });
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);
            section(ui, "Recent Activity", |ui| {
                ui.set_min_width(column_width - 30.0);

                ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                    if app.log_messages.is_empty() {
                        ui.label(RichText::new("No recent activity").weak());
                    }
                    for entry in app.log_messages.iter().rev().take(10) {
                        let color = match entry.level {
                            LogLevel::Info => Color32::GRAY,
                            LogLevel::Success => colors::SUCCESS,
                            LogLevel::Warning => colors::WARNING,
                            LogLevel::Error => colors::ERROR,
                        };

                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                    .small()
                                    .color(Color32::DARK_GRAY),
                            );
                            ui.label(RichText::new(&entry.message).color(color));
                        });
                    }
                });
            });
        });
    });

    next_panel
}
