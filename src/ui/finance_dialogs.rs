//! Modal windows opened from the finance panel.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{CHECK, FILE_XLS, TRUCK, WARNING_CIRCLE};

use super::app::{App, FinanceDialog};
use super::components::{badge, colors, primary_button_with_icon, styled_button};
use crate::finance::catalog::po_units;
use crate::finance::drafts::GENERIC_SUPPLIER;
use crate::models::procurement::resolution;
use crate::models::{ItemSubtype, ItemType, SaleStatus, SalesRecord};

/// Show whichever finance dialog is open.
pub fn show(app: &mut App, ctx: &egui::Context) {
    let Some(dialog) = app.finance_dialog.clone() else {
        return;
    };

    match dialog {
        FinanceDialog::NewOrder => new_order(app, ctx),
        FinanceDialog::ReceiveOrder(id) => receive_order(app, ctx, id),
        FinanceDialog::Complaint { order_id, reason } => complaint(app, ctx, order_id, reason),
        FinanceDialog::Resolve(id) => resolve(app, ctx, id),
        FinanceDialog::AddSupplier => add_supplier(app, ctx),
        FinanceDialog::AddCustomer => add_customer(app, ctx),
        FinanceDialog::Invoice(sale) => invoice(app, ctx, sale),
        FinanceDialog::EditCost => edit_cost(app, ctx),
        FinanceDialog::Rates { labor, raw } => rates(app, ctx, labor, raw),
    }
}

fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Cancel on the left, primary action on the right. Returns (cancel, confirm).
fn footer(ui: &mut Ui, confirm: &str) -> (bool, bool) {
    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    let mut result = (false, false);
    ui.horizontal(|ui| {
        result.0 = styled_button(ui, "Cancel").clicked();
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            result.1 = primary_button_with_icon(ui, "", confirm).clicked();
        });
    });
    result
}

fn new_order(app: &mut App, ctx: &egui::Context) {
    modal("New Purchase Order").show(ctx, |ui| {
        ui.add_space(10.0);

        egui::Grid::new("order_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Item:");
                let selected = app
                    .order_form
                    .item_id
                    .as_deref()
                    .and_then(|id| app.finance.inventory.iter().find(|i| i.id == id))
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| "Select item...".to_string());
                egui::ComboBox::from_id_salt("order_item")
                    .width(250.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for item in &app.finance.inventory {
                            let is_selected = app.order_form.item_id.as_deref() == Some(item.id.as_str());
                            if ui.selectable_label(is_selected, &item.name).clicked() {
                                app.order_form.item_id = Some(item.id.clone());
                            }
                        }
                    });
                ui.end_row();

                ui.label("Packs:");
                ui.add(egui::TextEdit::singleline(&mut app.order_form.packs).desired_width(80.0));
                ui.end_row();
            });

        let item = app
            .order_form
            .item_id
            .as_deref()
            .and_then(|id| app.finance.inventory.iter().find(|i| i.id == id));
        if let Some(item) = item {
            let packs = app.order_form.packs.trim().parse::<i64>().unwrap_or(0);
            ui.add_space(10.0);
            ui.label(
                RichText::new(format!(
                    "{} units, {} {:.2} from {}",
                    po_units(item, packs),
                    app.currency(),
                    packs.max(0) as f64 * item.unit_cost,
                    item.supplier.as_deref().unwrap_or(GENERIC_SUPPLIER),
                ))
                .weak(),
            );
        }

        let (cancel, confirm) = footer(ui, "Place Order");
        if cancel {
            app.finance_dialog = None;
        }
        if confirm {
            app.create_order();
        }
    });
}

fn receive_order(app: &mut App, ctx: &egui::Context, id: String) {
    let Some(order) = app.finance.orders.iter().find(|o| o.id == id).cloned() else {
        app.finance_dialog = None;
        return;
    };

    modal("Receive Order").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.label(RichText::new(&order.item_name).strong());
        ui.label(format!("{} packs ({} units) from {}", order.quantity, order.total_units, order.supplier));
        ui.add_space(10.0);
        ui.label("Inspect the delivery. Did it pass quality control?");
        ui.add_space(15.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancel").clicked() {
                app.finance_dialog = None;
            }
            if ui
                .button(RichText::new(format!("{WARNING_CIRCLE} QC Failed")).color(colors::ERROR))
                .clicked()
            {
                app.finance_dialog = Some(FinanceDialog::Complaint {
                    order_id: id.clone(),
                    reason: String::new(),
                });
            }
            if primary_button_with_icon(ui, CHECK, "QC Passed").clicked() {
                app.log_info(format!("Receiving {}", order.item_name));
                app.receive_order(id.clone());
            }
        });
    });
}

fn complaint(app: &mut App, ctx: &egui::Context, order_id: String, mut reason: String) {
    modal("Report Complaint").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.label("What was wrong with the delivery?");
        ui.add(
            egui::TextEdit::multiline(&mut reason)
                .desired_width(380.0)
                .desired_rows(3)
                .hint_text("Damaged packs, wrong item..."),
        );

        let (cancel, confirm) = footer(ui, "Submit Complaint");
        if cancel {
            app.finance_dialog = None;
        } else if confirm {
            app.complain_order(order_id.clone(), &reason);
        } else {
            app.finance_dialog = Some(FinanceDialog::Complaint {
                order_id: order_id.clone(),
                reason: reason.clone(),
            });
        }
    });
}

fn resolve(app: &mut App, ctx: &egui::Context, id: String) {
    let Some(order) = app.finance.orders.iter().find(|o| o.id == id).cloned() else {
        app.finance_dialog = None;
        return;
    };

    modal("Resolve Complaint").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.label(RichText::new(&order.item_name).strong());
        ui.label(RichText::new(order.complaint_reason.as_deref().unwrap_or("-")).weak());
        ui.add_space(15.0);

        for outcome in resolution::ALL {
            if ui.button(outcome).clicked() {
                app.log_info(format!("Resolving complaint: {outcome}"));
                app.resolve_order(id.clone(), outcome);
            }
        }

        ui.add_space(10.0);
        if styled_button(ui, "Cancel").clicked() {
            app.finance_dialog = None;
        }
    });
}

fn add_supplier(app: &mut App, ctx: &egui::Context) {
    modal("Add Supplier").show(ctx, |ui| {
        ui.add_space(10.0);
        let form = &mut app.supplier_form;

        egui::Grid::new("supplier_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(250.0));
                ui.end_row();

                ui.label("Contact:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.contact)
                        .desired_width(250.0)
                        .hint_text("Phone or email"),
                );
                ui.end_row();

                ui.label("Address:");
                ui.add(egui::TextEdit::singleline(&mut form.address).desired_width(250.0));
                ui.end_row();

                ui.label("Supplies:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.item_name)
                        .desired_width(250.0)
                        .hint_text("Item name"),
                );
                ui.end_row();

                ui.label("Type:");
                ui.horizontal(|ui| {
                    for kind in ItemType::ALL {
                        ui.radio_value(&mut form.item_type, kind, kind.name());
                    }
                });
                ui.end_row();

                ui.label("Subtype:");
                ui.horizontal(|ui| {
                    for sub in ItemSubtype::ALL {
                        ui.radio_value(&mut form.item_subtype, sub, sub.name());
                    }
                });
                ui.end_row();

                ui.label("Units per pack:");
                ui.add(egui::TextEdit::singleline(&mut form.pack_size).desired_width(80.0));
                ui.end_row();

                ui.label("Cost per pack:");
                ui.add(egui::TextEdit::singleline(&mut form.unit_cost).desired_width(80.0));
                ui.end_row();
            });

        let (cancel, confirm) = footer(ui, "Save");
        if cancel {
            app.finance_dialog = None;
        }
        if confirm {
            app.add_supplier();
        }
    });
}

fn add_customer(app: &mut App, ctx: &egui::Context) {
    modal("Add Customer").show(ctx, |ui| {
        ui.add_space(10.0);
        let form = &mut app.customer_form;

        egui::Grid::new("customer_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(250.0));
                ui.end_row();

                ui.label("Email:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(250.0));
                ui.end_row();

                ui.label("Phone:");
                ui.add(egui::TextEdit::singleline(&mut form.contact).desired_width(250.0));
                ui.end_row();

                ui.label("Address:");
                ui.add(egui::TextEdit::singleline(&mut form.address).desired_width(250.0));
                ui.end_row();
            });

        let (cancel, confirm) = footer(ui, "Save");
        if cancel {
            app.finance_dialog = None;
        }
        if confirm {
            app.add_customer();
        }
    });
}

fn invoice(app: &mut App, ctx: &egui::Context, sale: SalesRecord) {
    let currency = app.currency().to_string();

    egui::Window::new(format!("Invoice #{}", sale.invoice_id))
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("Bill To").small().weak());
                    ui.label(RichText::new(&sale.customer_name).strong());
                    ui.label(&sale.customer_email);
                    ui.label(&sale.customer_phone);
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    match sale.status {
                        SaleStatus::Delivered => badge(ui, sale.status.name(), colors::SUCCESS),
                        SaleStatus::Invoiced => badge(ui, sale.status.name(), colors::INFO),
                    }
                    ui.label(sale.date_created.format("%Y-%m-%d").to_string());
                });
            });

            ui.add_space(10.0);

            egui::Grid::new("invoice_items")
                .num_columns(4)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Item");
                    ui.strong("Qty");
                    ui.strong("Price");
                    ui.strong("Total");
                    ui.end_row();

                    for item in &sale.items {
                        ui.label(format!("{} ({})", item.recipe_name, item.packaging_type));
                        ui.label(item.quantity.to_string());
                        ui.label(format!("{:.2}", item.unit_price));
                        ui.label(format!("{:.2}", item.line_total()));
                        ui.end_row();
                    }
                });

            ui.add_space(10.0);
            ui.label(
                RichText::new(format!("Total Due: {currency} {:.2}", sale.total_amount))
                    .heading()
                    .strong(),
            );
            ui.label(RichText::new(format!("Paid by {}", sale.payment_method.name())).weak());

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Close").clicked() {
                    app.finance_dialog = None;
                }
                if styled_button(ui, &format!("{FILE_XLS} Export")).clicked() {
                    app.export_invoice(&sale);
                }
                if !sale.is_delivered() && primary_button_with_icon(ui, TRUCK, "Mark Delivered").clicked() {
                    app.mark_delivered(sale.id.clone());
                }
            });
        });
}

fn edit_cost(app: &mut App, ctx: &egui::Context) {
    modal("Edit Cost Entry").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.label(RichText::new(&app.cost_form.reference_id).strong());
        ui.add_space(10.0);

        let form = &mut app.cost_form;
        egui::Grid::new("cost_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Raw material:", &mut form.raw_material_cost),
                    ("Packaging:", &mut form.packaging_cost),
                    ("Labor:", &mut form.labor_cost),
                    ("Wastage:", &mut form.wastage_cost),
                ] {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(100.0));
                    ui.end_row();
                }
            });

        ui.add_space(10.0);
        match app.cost_form.preview_total() {
            Some(total) => ui.label(format!("New total: {} {total:.2}", app.currency())),
            None => ui.colored_label(colors::ERROR, "Enter non-negative numbers"),
        };

        let (cancel, confirm) = footer(ui, "Save");
        if cancel {
            app.finance_dialog = None;
        }
        if confirm {
            app.save_cost();
        }
    });
}

fn rates(app: &mut App, ctx: &egui::Context, mut labor: String, mut raw: String) {
    modal("Rates").show(ctx, |ui| {
        ui.add_space(10.0);

        egui::Grid::new("rates_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label(format!("Labor ({} / hr):", app.currency()));
                ui.add(egui::TextEdit::singleline(&mut labor).desired_width(100.0));
                ui.end_row();

                ui.label(format!("Raw material ({} / kg):", app.currency()));
                ui.add(egui::TextEdit::singleline(&mut raw).desired_width(100.0));
                ui.end_row();
            });

        let (cancel, confirm) = footer(ui, "Save");
        if cancel {
            app.finance_dialog = None;
        } else if confirm {
            app.save_rates(&labor, &raw);
        } else {
            app.finance_dialog = Some(FinanceDialog::Rates {
                labor: labor.clone(),
                raw: raw.clone(),
            });
        }
    });
}
