//! Excel export functionality.

use crate::models::{DailyCostMetrics, SalesRecord};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use std::path::{Path, PathBuf};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Export the daily production cost log.
pub fn export_cost_log_to_excel(costs: &[DailyCostMetrics], currency: &str, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Cost Log")?;

    let header_format = header_format();
    let money_format = Format::new().set_num_format("#,##0.00");
    let weight_format = Format::new().set_num_format("0.00");

    let headers = [
        "Date".to_string(),
        "Reference".to_string(),
        "Processed (Kg)".to_string(),
        "Hours".to_string(),
        format!("Raw Material ({currency})"),
        format!("Packaging ({currency})"),
        format!("Labor ({currency})"),
        format!("Wastage ({currency})"),
        format!("Total ({currency})"),
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    worksheet.set_column_width(0, 12)?; // Date
    worksheet.set_column_width(1, 18)?; // Reference
    for col in 2..=8 {
        worksheet.set_column_width(col, 15)?;
    }

    for (idx, cost) in costs.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, cost.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_string(row, 1, &cost.reference_id)?;
        worksheet.write_number_with_format(row, 2, cost.weight_processed, &weight_format)?;
        worksheet.write_number_with_format(row, 3, cost.processing_hours, &weight_format)?;
        worksheet.write_number_with_format(row, 4, cost.raw_material_cost, &money_format)?;
        worksheet.write_number_with_format(row, 5, cost.packaging_cost, &money_format)?;
        worksheet.write_number_with_format(row, 6, cost.labor_cost, &money_format)?;
        worksheet.write_number_with_format(row, 7, cost.wastage_cost, &money_format)?;
        worksheet.write_number_with_format(row, 8, cost.total_cost, &money_format)?;
    }

    if !costs.is_empty() {
        let last_row = costs.len() as u32;
        worksheet.autofilter(0, 0, last_row, 8)?;

        // Totals row under the data
        let total_row = last_row + 1;
        let bold_money = Format::new().set_bold().set_num_format("#,##0.00");
        worksheet.write_string_with_format(total_row, 0, "Total", &Format::new().set_bold())?;
        let sums = [
            costs.iter().map(|c| c.raw_material_cost).sum::<f64>(),
            costs.iter().map(|c| c.packaging_cost).sum::<f64>(),
            costs.iter().map(|c| c.labor_cost).sum::<f64>(),
            costs.iter().map(|c| c.wastage_cost).sum::<f64>(),
            costs.iter().map(|c| c.total_cost).sum::<f64>(),
        ];
        for (offset, sum) in sums.iter().enumerate() {
            worksheet.write_number_with_format(total_row, 4 + offset as u16, *sum, &bold_money)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Export one invoice as a printable sheet.
pub fn export_invoice_to_excel(sale: &SalesRecord, currency: &str, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Invoice")?;

    let title_format = Format::new().set_bold().set_font_size(18);
    let label_format = Format::new().set_bold().set_font_color(Color::Gray);
    let header_format = header_format();
    let money_format = Format::new().set_num_format("#,##0.00").set_align(FormatAlign::Right);
    let total_format = Format::new()
        .set_bold()
        .set_num_format("#,##0.00")
        .set_border_top(FormatBorder::Thin);

    worksheet.set_column_width(0, 36)?;
    worksheet.set_column_width(1, 10)?;
    worksheet.set_column_width(2, 14)?;
    worksheet.set_column_width(3, 14)?;

    worksheet.write_string_with_format(0, 0, "INVOICE", &title_format)?;
    worksheet.write_string(1, 0, format!("#{}", sale.invoice_id))?;
    worksheet.write_string_with_format(0, 3, "ShroomTrack", &Format::new().set_bold())?;

    worksheet.write_string_with_format(3, 0, "Bill To", &label_format)?;
    worksheet.write_string(4, 0, &sale.customer_name)?;
    worksheet.write_string(5, 0, &sale.customer_email)?;
    worksheet.write_string(6, 0, &sale.customer_phone)?;

    let date = sale.date_created.with_timezone(&Local);
    worksheet.write_string_with_format(3, 2, "Date", &label_format)?;
    worksheet.write_string(3, 3, date.format("%Y-%m-%d").to_string())?;
    worksheet.write_string_with_format(4, 2, "Method", &label_format)?;
    worksheet.write_string(4, 3, sale.payment_method.name())?;
    worksheet.write_string_with_format(5, 2, "Status", &label_format)?;
    worksheet.write_string(5, 3, sale.status.name())?;

    let table_row = 8;
    let headers = ["Item Description", "Qty", "Price", "Total"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(table_row, col as u16, *header, &header_format)?;
    }

    for (idx, item) in sale.items.iter().enumerate() {
        let row = table_row + 1 + idx as u32;
        worksheet.write_string(row, 0, format!("{} ({})", item.recipe_name, item.packaging_type))?;
        worksheet.write_number(row, 1, item.quantity as f64)?;
        worksheet.write_number_with_format(row, 2, item.unit_price, &money_format)?;
        worksheet.write_number_with_format(row, 3, item.line_total(), &money_format)?;
    }

    let summary_row = table_row + 2 + sale.items.len() as u32;
    worksheet.write_string(summary_row, 2, "Subtotal")?;
    worksheet.write_number_with_format(summary_row, 3, sale.total_amount, &money_format)?;
    worksheet.write_string(summary_row + 1, 2, "Tax (0%)")?;
    worksheet.write_number_with_format(summary_row + 1, 3, 0.0, &money_format)?;
    worksheet.write_string_with_format(summary_row + 2, 2, format!("Total Due ({currency})"), &Format::new().set_bold())?;
    worksheet.write_number_with_format(summary_row + 2, 3, sale.total_amount, &total_format)?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, SaleItem, SaleStatus};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_export_filename_shape() {
        let name = generate_export_filename("cost_log");
        assert!(name.starts_with("cost_log_"));
        assert!(name.ends_with(".xlsx"));
        // prefix + '_' + YYYYMMDD_HHMMSS + ".xlsx"
        assert_eq!(name.len(), "cost_log_".len() + 15 + 5);
    }

    #[test]
    fn test_export_cost_log_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.xlsx");
        let costs = vec![DailyCostMetrics {
            id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            reference_id: "B-7".to_string(),
            weight_processed: 12.0,
            processing_hours: 2.0,
            raw_material_cost: 96.0,
            packaging_cost: 0.0,
            labor_cost: 25.0,
            wastage_cost: 4.0,
            total_cost: 125.0,
        }];

        export_cost_log_to_excel(&costs, "RM", &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_export_empty_cost_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        export_cost_log_to_excel(&[], "RM", &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_invoice_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.xlsx");
        let sale = SalesRecord {
            id: "sale-1".to_string(),
            invoice_id: "INV-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Cafe".to_string(),
            customer_email: "cafe@example.com".to_string(),
            customer_phone: "012".to_string(),
            items: vec![SaleItem {
                recipe_name: "Garlic".to_string(),
                packaging_type: "POUCH".to_string(),
                quantity: 3,
                unit_price: 18.0,
            }],
            total_amount: 54.0,
            payment_method: PaymentMethod::Cash,
            status: SaleStatus::Invoiced,
            date_created: Utc::now(),
        };

        export_invoice_to_excel(&sale, "RM", &path).unwrap();
        assert!(path.exists());
    }
}
