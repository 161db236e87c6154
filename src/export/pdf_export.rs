use crate::errors::{AppError, AppResult};
use crate::export::model::ExportTable;
use crate::export::notify_export_success;
use crate::export::pdf::{InvoicePage, PdfManager};
use crate::models::invoice::{Invoice, Letterhead};
use crate::ui::messages::info;
use std::io;
use std::path::Path;

fn save(pdf: PdfManager, path: &Path) -> AppResult<()> {
    pdf.save(path)
        .map_err(|e| AppError::from(io::Error::other(format!("PDF export error: {e}"))))
}

pub(crate) fn export_pdf(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let rows = table.text_rows();
    let footer_rows = usize::from(table.footer.is_some());

    let mut pdf = if table.headers.len() > 7 {
        PdfManager::new().landscape()
    } else {
        PdfManager::new()
    };
    pdf.write_table(&table.title, &table.headers, &rows, footer_rows);
    save(pdf, path)?;

    notify_export_success("PDF", path);
    Ok(())
}

/// One page per invoice, with the company letterhead on each.
pub(crate) fn export_invoices_pdf(
    invoices: &[Invoice],
    letterhead: &Letterhead,
    currency: &str,
    path: &Path,
) -> AppResult<()> {
    info(format!("Exporting invoices to PDF: {}", path.display()));

    let money = |x: f64| format!("{}{:.2}", currency, x);
    let mut pdf = PdfManager::new();

    for inv in invoices {
        let mut bill_to = vec![inv.bill_to().to_string()];
        if let Some(dir) = &inv.direccion
            && dir != inv.bill_to()
        {
            bill_to.push(dir.clone());
        }

        pdf.write_invoice(&InvoicePage {
            letterhead: letterhead.lines(),
            note: letterhead.nota.clone(),
            number: inv.numerodefactura.clone().unwrap_or_default(),
            issued: inv.fechaemision.clone().unwrap_or_default(),
            bill_to,
            item: inv.item.clone().unwrap_or_default(),
            qty: format!("{}", inv.qty),
            rate: money(inv.rate),
            amount: money(inv.amount),
            paid: inv.pago,
            paid_on: inv.fechapago.clone().filter(|d| !d.is_empty()),
            balance_due: money(inv.balance_due()),
        });
    }

    save(pdf, path)?;
    notify_export_success("PDF", path);
    Ok(())
}
