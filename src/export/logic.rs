use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::ExportTable;
use crate::export::pdf_export::{export_invoices_pdf, export_pdf};
use crate::export::xlsx::export_xlsx;
use crate::models::invoice::{Invoice, Letterhead};
use crate::ui::messages::warning;
use std::io;
use std::path::Path;

pub struct ExportLogic;

fn checked_path(file: &str, force: bool) -> AppResult<&Path> {
    let path = Path::new(file);

    if !path.is_absolute() {
        return Err(AppError::from(io::Error::other(format!(
            "Output file path must be absolute: {file}"
        ))));
    }

    ensure_writable(path, force)?;
    Ok(path)
}

impl ExportLogic {
    /// Write `table` to `file` in `format`.
    ///
    /// `file` must be an absolute path; an existing file is overwritten only
    /// with `force` or after confirmation. Returns `false` when nothing was
    /// written because the table is empty.
    pub fn export(table: &ExportTable, format: ExportFormat, file: &str, force: bool) -> AppResult<bool> {
        let path = checked_path(file, force)?;

        if table.is_empty() {
            warning(format!("⚠️  Nothing to export for \"{}\".", table.title));
            return Ok(false);
        }

        match format {
            ExportFormat::Csv => export_csv(table, path)?,
            ExportFormat::Json => export_json(table, path)?,
            ExportFormat::Xlsx => export_xlsx(table, path)?,
            ExportFormat::Pdf => export_pdf(table, path)?,
        }

        Ok(true)
    }

    /// Printable invoices, one per page.
    pub fn export_invoices(
        invoices: &[Invoice],
        letterhead: &Letterhead,
        currency: &str,
        file: &str,
        force: bool,
    ) -> AppResult<bool> {
        let path = checked_path(file, force)?;

        if invoices.is_empty() {
            warning("⚠️  No invoices to print.");
            return Ok(false);
        }

        export_invoices_pdf(invoices, letterhead, currency, path)?;
        Ok(true)
    }
}
