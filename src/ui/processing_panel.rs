//! Processing panel: batch floor and recipe library.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, BROOM, CLOUD, HARD_DRIVES, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget, ProcessingTab, RecipeForm, RecipePick};
use super::batch_card;
use super::components::{
    action_button, back_button, badge, colors, danger_action_button, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon, tab_bar,
};
use crate::models::RecipeType;

const CARD_WIDTH: f32 = 300.0;

/// Show the processing panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Processing");

    ui.horizontal(|ui| {
        let tabs = [
            (ProcessingTab::Floor, "Processing Floor"),
            (ProcessingTab::Recipes, "Recipe Library"),
        ];
        if let Some(tab) = tab_bar(ui, app.processing_tab, &tabs) {
            app.processing_tab = tab;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if app.backend_name() == "Cloud" {
                badge(ui, &format!("{CLOUD} Cloud"), colors::SUCCESS);
            } else {
                badge(ui, &format!("{HARD_DRIVES} Local"), colors::WARNING);
            }
        });
    });

    ui.add_space(15.0);

    match app.processing_tab {
        ProcessingTab::Floor => show_floor(app, ui),
        ProcessingTab::Recipes => show_recipes(app, ui),
    }

    go_back
}

fn show_floor(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(format!("{} batch(es) on the floor", app.batches.len()));
        ui.add_space(10.0);
        if app.batches_loading {
            ui.spinner();
        } else if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_batches();
            app.load_recipes();
        }
    });
    ui.add_space(10.0);

    if app.batches.is_empty() {
        ui.label(RichText::new("No batches waiting. Received lots appear here.").weak());
        return;
    }

    let batches = app.batches.clone();
    ScrollArea::vertical().id_salt("floor_scroll").show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for batch in &batches {
                batch_card::show(app, ui, batch, CARD_WIDTH);
            }
        });
    });
}

fn show_recipes(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "New Recipe").clicked() {
            app.recipe_form = RecipeForm::create();
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, BROOM, "Remove Duplicates").clicked() {
            app.remove_duplicate_recipes();
        }
        ui.add_space(10.0);
        let clear = ui.add_enabled(
            !app.recipes.is_empty(),
            egui::Button::new(RichText::new(format!("{TRASH} Clear All")).color(colors::ERROR)),
        );
        if clear.clicked() {
            app.delete_target = Some(DeleteTarget::AllRecipes);
            app.show_delete_confirm = true;
        }
    });

    ui.add_space(15.0);

    if app.recipes.is_empty() {
        ui.label(RichText::new("No recipes yet. Create one before starting a batch.").weak());
        return;
    }

    let mut edit = None;
    let mut delete = None;
    ScrollArea::vertical().id_salt("recipe_scroll").show(ui, |ui| {
        egui::Grid::new("recipes_grid")
            .num_columns(7)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("ID");
                ui.strong("Name");
                ui.strong("Type");
                ui.strong("Base");
                ui.strong("Cook");
                ui.strong("Temp");
                ui.strong("");
                ui.end_row();

                for recipe in &app.recipes {
                    ui.label(RichText::new(recipe.short_id()).monospace().weak());
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&recipe.name).strong());
                        if !recipe.notes.is_empty() {
                            ui.label(RichText::new(&recipe.notes).small().weak());
                        }
                        if !recipe.image_url.is_empty() {
                            ui.hyperlink_to(RichText::new("Image").small(), &recipe.image_url);
                        }
                    });
                    let type_color = match recipe.recipe_type {
                        RecipeType::Chips => colors::WARNING,
                        RecipeType::Dried => colors::INFO,
                    };
                    badge(ui, recipe.recipe_type.name(), type_color);
                    ui.label(format!("{} kg", recipe.base_weight_kg));
                    ui.label(format!("{} min", recipe.cook_time_minutes));
                    ui.label(format!("{:.0}°C", recipe.temperature));
                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit = Some(RecipeForm::edit(recipe));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete = Some(DeleteTarget::Recipe(recipe.id.clone(), recipe.name.clone()));
                        }
                    });
                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit {
        app.recipe_form = form;
    }
    if let Some(target) = delete {
        app.delete_target = Some(target);
        app.show_delete_confirm = true;
    }
}

/// Recipe editor and recipe picker windows.
pub fn show_modals(app: &mut App, ctx: &egui::Context) {
    if app.recipe_form.is_open {
        recipe_editor(app, ctx);
    }
    if let Some(pick) = app.recipe_pick.clone() {
        recipe_picker(app, ctx, pick);
    }
}

fn recipe_editor(app: &mut App, ctx: &egui::Context) {
    let title = if app.recipe_form.is_editing {
        "Edit Recipe"
    } else {
        "New Recipe"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(450.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            let form = &mut app.recipe_form;

            egui::Grid::new("recipe_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Type:");
                    ui.horizontal(|ui| {
                        for kind in RecipeType::ALL {
                            ui.radio_value(&mut form.recipe_type, kind, kind.name());
                        }
                    });
                    ui.end_row();

                    ui.label("Base weight (kg):");
                    ui.add(egui::TextEdit::singleline(&mut form.base_weight).desired_width(80.0));
                    ui.end_row();

                    ui.label("Cook time (min):");
                    ui.add(egui::TextEdit::singleline(&mut form.cook_time).desired_width(80.0));
                    ui.end_row();

                    ui.label("Temperature (°C):");
                    ui.add(egui::TextEdit::singleline(&mut form.temperature).desired_width(80.0));
                    ui.end_row();

                    ui.label("Image URL:");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.image_url)
                            .desired_width(250.0)
                            .hint_text("Optional"),
                    );
                    ui.end_row();

                    ui.label("Notes:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.notes)
                            .desired_width(250.0)
                            .desired_rows(3),
                    );
                    ui.end_row();
                });

            if !form.image_url.trim().is_empty() {
                ui.add_space(10.0);
                ui.add(
                    egui::Image::new(form.image_url.trim().to_string())
                        .max_height(120.0)
                        .corner_radius(6),
                );
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.recipe_form.reset();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save Recipe").clicked() {
                        app.save_recipe();
                    }
                });
            });
        });
}

fn recipe_picker(app: &mut App, ctx: &egui::Context, pick: RecipePick) {
    let title = match pick {
        RecipePick::Start(_) => "Select Recipe",
        RecipePick::Switch(_) => "Switch Recipe",
    };

    let mut chosen = None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("Batch {}", pick.batch_id())).weak());
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for recipe in &app.recipes {
                    let text = format!(
                        "{}  ({}, {} min / {} kg)",
                        recipe.name,
                        recipe.recipe_type.name(),
                        recipe.cook_time_minutes,
                        recipe.base_weight_kg
                    );
                    if ui.button(text).clicked() {
                        chosen = Some(recipe.id.clone());
                    }
                }
            });

            ui.add_space(10.0);
            if styled_button(ui, "Cancel").clicked() {
                app.recipe_pick = None;
            }
        });

    if let Some(recipe_id) = chosen {
        app.pick_recipe(pick, &recipe_id);
    }
}
