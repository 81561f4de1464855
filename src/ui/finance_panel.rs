//! Finance panel: procurement, point of sale and the financial overview.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS, PENCIL, PLUS, RECEIPT, SHOPPING_CART, TRASH, WARNING};

use super::app::{App, DeleteTarget, FinanceDialog, FinanceTab};
use super::charts::{pie_chart, trend_chart};
use super::components::{
    action_button, back_button, badge, colors, danger_action_button, panel_header, primary_button_with_icon, section,
    stat_card, styled_button_with_icon, tab_bar,
};
use crate::finance::catalog::{active_orders, complaints, low_stock, sale_total};
use crate::finance::{CostDraft, OrderDraft, trend_bars};
use crate::models::{PaymentMethod, PurchaseOrderStatus, SaleStatus};

/// Show the finance panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Finance");

    ui.horizontal(|ui| {
        let tabs: Vec<_> = FinanceTab::ALL.iter().map(|t| (*t, t.name())).collect();
        if let Some(tab) = tab_bar(ui, app.finance_tab, &tabs) {
            app.finance_tab = tab;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if app.finance_loading {
                ui.spinner();
            } else if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                app.refresh_finance();
            }
        });
    });

    ui.add_space(15.0);

    ScrollArea::vertical().id_salt("finance_scroll").show(ui, |ui| match app.finance_tab {
        FinanceTab::Procurement => show_procurement(app, ui),
        FinanceTab::Sales => show_sales(app, ui),
        FinanceTab::Overview => show_overview(app, ui),
    });

    go_back
}

fn show_procurement(app: &mut App, ui: &mut Ui) {
    let low: Vec<_> = low_stock(&app.finance.inventory)
        .into_iter()
        .map(|i| format!("{} ({} left)", i.name, i.quantity))
        .collect();
    if !low.is_empty() {
        ui.colored_label(colors::WARNING, format!("{WARNING} Low stock: {}", low.join(", ")));
        ui.add_space(10.0);
    }

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "New Order").clicked() {
            app.order_form = OrderDraft::default();
            app.finance_dialog = Some(FinanceDialog::NewOrder);
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, PLUS, "Add Supplier").clicked() {
            app.finance_dialog = Some(FinanceDialog::AddSupplier);
        }
    });

    ui.add_space(15.0);

    section(ui, "Inventory", |ui| {
        let currency = app.currency().to_string();
        egui::Grid::new("inventory_grid")
            .num_columns(7)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Item");
                ui.strong("Type");
                ui.strong("Stock");
                ui.strong("Threshold");
                ui.strong("Unit Cost");
                ui.strong("Supplier");
                ui.strong("");
                ui.end_row();

                let mut order_for = None;
                for item in &app.finance.inventory {
                    ui.label(&item.name);
                    ui.label(match item.subtype {
                        Some(sub) => format!("{} / {}", item.item_type.name(), sub.name()),
                        None => item.item_type.name().to_string(),
                    });
                    let stock = format!("{} {}", item.quantity, item.unit);
                    if item.is_low_stock() {
                        ui.colored_label(colors::ERROR, stock);
                    } else {
                        ui.label(stock);
                    }
                    ui.label(item.threshold.to_string());
                    ui.label(format!("{currency} {:.2}", item.unit_cost));
                    ui.label(item.supplier.as_deref().unwrap_or("-"));
                    if action_button(ui, SHOPPING_CART, "Order").clicked() {
                        order_for = Some(item.id.clone());
                    }
                    ui.end_row();
                }

                if let Some(id) = order_for {
                    app.order_form = OrderDraft {
                        item_id: Some(id),
                        ..Default::default()
                    };
                    app.finance_dialog = Some(FinanceDialog::NewOrder);
                }
            });
    });

    ui.add_space(15.0);

    section(ui, "Active Orders", |ui| {
        let orders: Vec<_> = active_orders(&app.finance.orders).into_iter().cloned().collect();
        if orders.is_empty() {
            ui.label(RichText::new("No orders awaiting delivery").weak());
            return;
        }
        egui::Grid::new("orders_grid")
            .num_columns(6)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Item");
                ui.strong("Packs");
                ui.strong("Units");
                ui.strong("Cost");
                ui.strong("");
                ui.end_row();

                for po in orders {
                    ui.label(po.date_ordered.format("%Y-%m-%d").to_string());
                    ui.label(format!("{} ({})", po.item_name, po.supplier));
                    ui.label(po.quantity.to_string());
                    ui.label(po.total_units.to_string());
                    ui.label(format!("{} {:.2}", app.currency(), po.total_cost));
                    if ui.button("Receive / QC").clicked() {
                        app.finance_dialog = Some(FinanceDialog::ReceiveOrder(po.id.clone()));
                    }
                    ui.end_row();
                }
            });
    });

    ui.add_space(15.0);

    let open_complaints: Vec<_> = complaints(&app.finance.orders).into_iter().cloned().collect();
    if !open_complaints.is_empty() {
        section(ui, "Complaints", |ui| {
            for po in open_complaints {
                ui.horizontal(|ui| {
                    badge(ui, "COMPLAINT", colors::ERROR);
                    ui.label(format!("{} from {}", po.item_name, po.supplier));
                    ui.label(RichText::new(po.complaint_reason.as_deref().unwrap_or("-")).weak());
                    if ui.button("Resolve").clicked() {
                        app.finance_dialog = Some(FinanceDialog::Resolve(po.id.clone()));
                    }
                });
            }
        });
        ui.add_space(15.0);
    }

    let resolved: Vec<_> = app
        .finance
        .orders
        .iter()
        .filter(|po| po.status == PurchaseOrderStatus::Resolved)
        .take(5)
        .map(|po| format!("{}: {}", po.item_name, po.resolution.as_deref().unwrap_or("-")))
        .collect();
    if !resolved.is_empty() {
        ui.collapsing("Recently resolved", |ui| {
            for line in resolved {
                ui.label(line);
            }
        });
        ui.add_space(15.0);
    }

    section(ui, "Suppliers", |ui| {
        if app.finance.suppliers.is_empty() {
            ui.label(RichText::new("No suppliers yet").weak());
        }
        let mut delete = None;
        for supplier in &app.finance.suppliers {
            ui.horizontal(|ui| {
                ui.label(RichText::new(&supplier.name).strong());
                ui.label(RichText::new(&supplier.contact).weak());
                ui.label(RichText::new(&supplier.address).weak());
                if danger_action_button(ui, TRASH, "Delete").clicked() {
                    delete = Some(DeleteTarget::Supplier(supplier.id.clone(), supplier.name.clone()));
                }
            });
        }
        if let Some(target) = delete {
            app.delete_target = Some(target);
            app.show_delete_confirm = true;
        }
    });
}

fn show_sales(app: &mut App, ui: &mut Ui) {
    let currency = app.currency().to_string();

    section(ui, "Point of Sale", |ui| {
        egui::Grid::new("pos_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Customer:");
                ui.horizontal(|ui| {
                    let selected = app
                        .sale_form
                        .customer_id
                        .as_deref()
                        .and_then(|id| app.finance.customers.iter().find(|c| c.id == id))
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Select customer...".to_string());
                    egui::ComboBox::from_id_salt("pos_customer")
                        .width(250.0)
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for customer in &app.finance.customers {
                                let is_selected = app.sale_form.customer_id.as_deref() == Some(customer.id.as_str());
                                if ui.selectable_label(is_selected, &customer.name).clicked() {
                                    app.sale_form.customer_id = Some(customer.id.clone());
                                }
                            }
                        });
                    if action_button(ui, PLUS, "New customer").clicked() {
                        app.finance_dialog = Some(FinanceDialog::AddCustomer);
                    }
                });
                ui.end_row();

                ui.label("Product:");
                let selected = app
                    .sale_form
                    .selected(&app.goods)
                    .map(|g| g.option_text(&currency))
                    .unwrap_or_else(|| "Select product...".to_string());
                let mut pick = None;
                egui::ComboBox::from_id_salt("pos_product")
                    .width(350.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        if app.goods.is_empty() {
                            ui.label(RichText::new("No finished goods in stock").weak());
                        }
                        for good in &app.goods {
                            let is_selected = app.sale_form.good_key.as_deref() == Some(good.key.as_str());
                            if ui.selectable_label(is_selected, good.option_text(&currency)).clicked() {
                                pick = Some(good.clone());
                            }
                        }
                    });
                if let Some(good) = pick {
                    app.sale_form.select_good(&good);
                }
                ui.end_row();

                ui.label("Quantity:");
                ui.add(egui::TextEdit::singleline(&mut app.sale_form.quantity).desired_width(80.0));
                ui.end_row();

                ui.label(format!("Unit Price ({currency}):"));
                ui.add(egui::TextEdit::singleline(&mut app.sale_form.unit_price).desired_width(80.0));
                ui.end_row();

                ui.label("Payment:");
                ui.horizontal(|ui| {
                    for method in PaymentMethod::ALL {
                        ui.radio_value(&mut app.sale_form.payment_method, method, method.name());
                    }
                });
                ui.end_row();
            });

        ui.add_space(10.0);

        let total = sale_total(
            app.sale_form.unit_price.trim().parse().unwrap_or(0.0),
            app.sale_form.quantity.trim().parse().unwrap_or(0),
        );
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Total: {currency} {total:.2}")).heading().strong());
            ui.add_space(20.0);
            if primary_button_with_icon(ui, RECEIPT, "Create Invoice").clicked() {
                app.create_sale();
            }
        });
    });

    ui.add_space(15.0);

    section(ui, "Sales History", |ui| {
        if app.finance.sales.is_empty() {
            ui.label(RichText::new("No sales yet").weak());
            return;
        }
        let sales = app.finance.sales.clone();
        egui::Grid::new("sales_grid")
            .num_columns(6)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Invoice");
                ui.strong("Date");
                ui.strong("Customer");
                ui.strong("Amount");
                ui.strong("Status");
                ui.strong("");
                ui.end_row();

                for sale in sales {
                    ui.label(&sale.invoice_id);
                    ui.label(sale.date_created.format("%Y-%m-%d").to_string());
                    ui.label(&sale.customer_name);
                    ui.label(format!("{currency} {:.2}", sale.total_amount));
                    match sale.status {
                        SaleStatus::Delivered => badge(ui, sale.status.name(), colors::SUCCESS),
                        SaleStatus::Invoiced => badge(ui, sale.status.name(), colors::INFO),
                    }
                    ui.horizontal(|ui| {
                        if action_button(ui, RECEIPT, "View invoice").clicked() {
                            app.finance_dialog = Some(FinanceDialog::Invoice(sale.clone()));
                        }
                        if !sale.is_delivered() && ui.small_button("Mark Delivered").clicked() {
                            app.mark_delivered(sale.id.clone());
                        }
                    });
                    ui.end_row();
                }
            });
    });
}

fn show_overview(app: &mut App, ui: &mut Ui) {
    let currency = app.currency().to_string();
    let summary = app.summary;

    ui.horizontal_wrapped(|ui| {
        stat_card(
            ui,
            "Revenue",
            &format!("{currency} {:.2}", summary.revenue),
            "Delivered sales",
            None,
        );
        stat_card(
            ui,
            "Cash Outflow",
            &format!("{currency} {:.2}", summary.cash_outflow),
            "Procurement, raw material, labor",
            None,
        );
        let profit_color = if summary.is_profitable() { colors::SUCCESS } else { colors::ERROR };
        stat_card(
            ui,
            "Net Profit",
            &format!("{currency} {:.2}", summary.net_profit),
            "Revenue minus outflow",
            Some(profit_color),
        );
        stat_card(
            ui,
            "Avg Cost / Unit",
            &format!("{currency} {:.2}", summary.avg_cost_per_unit),
            &format!("{} units produced", summary.units_produced),
            None,
        );
        stat_card(
            ui,
            "Wastage Loss",
            &format!("{currency} {:.2}", summary.wastage),
            "Logged from QC",
            Some(colors::WARNING),
        );
    });

    ui.add_space(15.0);

    ui.columns(2, |columns| {
        section(&mut columns[0], "Cost Breakdown", |ui| {
            app.hovered_slice = pie_chart(ui, &app.pie_slices, &currency, 180.0);
        });
        section(&mut columns[1], "Revenue (Last 7 Days)", |ui| {
            trend_chart(ui, &trend_bars(&app.finance.weekly_revenue), &currency, 160.0);
        });
    });

    ui.add_space(15.0);

    section(ui, "Rates", |ui| {
        let rates = app.finance.rates;
        ui.horizontal(|ui| {
            ui.label(format!("Labor: {currency} {:.2} / hr", rates.labor_rate));
            ui.add_space(20.0);
            ui.label(format!("Raw material: {currency} {:.2} / kg", rates.raw_material_rate));
            ui.add_space(20.0);
            if action_button(ui, PENCIL, "Edit rates").clicked() {
                app.finance_dialog = Some(FinanceDialog::Rates {
                    labor: format!("{:.2}", rates.labor_rate),
                    raw: format!("{:.2}", rates.raw_material_rate),
                });
            }
        });
    });

    ui.add_space(15.0);

    section(ui, "Daily Cost Log", |ui| {
        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_cost_log();
        }
        ui.add_space(10.0);

        if app.finance.daily_costs.is_empty() {
            ui.label(RichText::new("No cost entries").weak());
            return;
        }

        let mut edit = None;
        egui::Grid::new("cost_log_grid")
            .num_columns(9)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for header in ["Date", "Reference", "Kg", "Hours", "Raw", "Packaging", "Labor", "Wastage", "Total"] {
                    ui.strong(header);
                }
                ui.strong("");
                ui.end_row();

                for row in &app.finance.daily_costs {
                    ui.label(row.date.format("%Y-%m-%d").to_string());
                    ui.label(&row.reference_id);
                    ui.label(format!("{:.2}", row.weight_processed));
                    ui.label(format!("{:.2}", row.processing_hours));
                    ui.label(format!("{:.2}", row.raw_material_cost));
                    ui.label(format!("{:.2}", row.packaging_cost));
                    ui.label(format!("{:.2}", row.labor_cost));
                    ui.label(format!("{:.2}", row.wastage_cost));
                    ui.label(RichText::new(format!("{:.2}", row.total_cost)).strong());
                    if action_button(ui, PENCIL, "Edit").clicked() {
                        edit = Some(CostDraft::edit(row));
                    }
                    ui.end_row();
                }
            });

        if let Some(draft) = edit {
            app.cost_form = draft;
            app.finance_dialog = Some(FinanceDialog::EditCost);
        }
    });
}
