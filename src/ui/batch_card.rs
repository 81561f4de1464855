//! Timer card for one batch on the processing floor.

use chrono::Utc;
use eframe::egui::{self, Color32, CornerRadius, Margin, ProgressBar, RichText, Ui};
use egui_phosphor::regular::{ARROWS_LEFT_RIGHT, FAST_FORWARD, PLAY};

use super::app::{App, RecipePick};
use super::components::{badge, colors};
use crate::models::{BatchStatus, MushroomBatch, RecipeType};
use crate::processing::{Stage, WastageReason, active_recipe, format_countdown, status_at};

fn stage_color(stage: Stage) -> Color32 {
    match stage {
        Stage::Wash => colors::INFO,
        Stage::Drain => Color32::from_rgb(90, 190, 200),
        Stage::Cook => colors::WARNING,
        Stage::Complete => colors::SUCCESS,
    }
}

/// Render one batch card.
pub fn show(app: &mut App, ui: &mut Ui, batch: &MushroomBatch, width: f32) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_width(width);

            ui.horizontal(|ui| {
                ui.label(RichText::new(&batch.id).strong());
                ui.label(RichText::new(&batch.source_farm).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.2} kg", batch.input_weight_kg()));
                });
            });
            ui.add_space(8.0);

            match batch.status {
                BatchStatus::Received => received(app, ui, batch),
                _ => running(app, ui, batch),
            }
        });
}

fn received(app: &mut App, ui: &mut Ui, batch: &MushroomBatch) {
    badge(ui, "READY TO PROCESS", colors::NEUTRAL);
    ui.add_space(10.0);
    if ui
        .button(RichText::new(format!("{PLAY} Start Processing")).size(15.0))
        .clicked()
    {
        app.request_start(&batch.id);
    }
}

fn running(app: &mut App, ui: &mut Ui, batch: &MushroomBatch) {
    let recipe = active_recipe(batch, &app.recipes);
    let Some(config) = batch.active_config() else {
        ui.colored_label(colors::ERROR, "No process configuration");
        return;
    };
    let status = status_at(config, Utc::now());
    let recipe_type: RecipeType = recipe.recipe_type;
    let color = stage_color(status.stage);

    ui.horizontal(|ui| {
        ui.label(RichText::new(&recipe.name).strong());
        badge(ui, recipe_type.name(), colors::NEUTRAL);
        ui.label(RichText::new(format!("{:.0}°C", recipe.temperature)).weak());
    });
    ui.add_space(6.0);

    ui.label(RichText::new(status.stage.label(recipe_type)).size(18.0).strong().color(color));
    ui.colored_label(color, status.stage.warning(recipe_type));
    ui.add_space(6.0);

    if status.stage.is_complete() {
        qc_form(app, ui, batch);
        return;
    }

    ui.label(
        RichText::new(format_countdown(status.time_left_secs))
            .size(32.0)
            .monospace(),
    );
    ui.add(
        ProgressBar::new((status.progress / 100.0) as f32)
            .desired_width(ui.available_width())
            .fill(color),
    );
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.small_button(format!("{ARROWS_LEFT_RIGHT} Switch Recipe")).clicked() {
            app.recipe_pick = Some(RecipePick::Switch(batch.id.clone()));
        }
        if ui
            .small_button(format!("{FAST_FORWARD} Speed Up"))
            .on_hover_text("Skip to the end of the cycle")
            .clicked()
        {
            app.speed_up(&batch.id);
        }
    });
}

fn qc_form(app: &mut App, ui: &mut Ui, batch: &MushroomBatch) {
    let input = batch.input_weight_kg();
    ui.label(format!("Quality check: input {input:.2} kg"));
    ui.add_space(6.0);

    let form = app.qc_form(&batch.id);
    egui::Grid::new(("qc_grid", &batch.id))
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Good (kg):");
            ui.add(
                egui::TextEdit::singleline(&mut form.good_weight)
                    .desired_width(80.0)
                    .hint_text("0.00"),
            );
            ui.end_row();

            ui.label("Wastage (kg):");
            ui.add(egui::TextEdit::singleline(&mut form.wastage_weight).desired_width(80.0));
            ui.end_row();

            if form.needs_reason() {
                ui.label("Reason:");
                egui::ComboBox::from_id_salt(("qc_reason", &batch.id))
                    .width(180.0)
                    .selected_text(form.reason.map(|r| r.label()).unwrap_or("Select reason..."))
                    .show_ui(ui, |ui| {
                        for reason in WastageReason::ALL {
                            ui.selectable_value(&mut form.reason, Some(reason), reason.label());
                        }
                    });
                ui.end_row();

                if form.reason == Some(WastageReason::Other) {
                    ui.label("Details:");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.custom_reason)
                            .desired_width(180.0)
                            .hint_text("Describe the issue"),
                    );
                    ui.end_row();
                }
            }
        });

    let can_submit = form.can_submit();
    let tolerance = app.qc_tolerance();
    let problem = if can_submit {
        app.qc_form(&batch.id).validate(input, tolerance).err()
    } else {
        None
    };
    if let Some(problem) = &problem {
        ui.colored_label(colors::ERROR, problem.to_string());
    }

    ui.add_space(8.0);
    let button = egui::Button::new(RichText::new("Finish & Log").color(Color32::WHITE)).fill(colors::SUCCESS);
    if ui.add_enabled(can_submit, button).clicked()
        && let Err(e) = app.complete_batch(&batch.id)
    {
        app.log_warning(format!("QC rejected for {}: {e}", batch.id));
    }
}
