use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::model::cell_text;
use crate::export::{ExportTable, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use serde_json::Value;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Excel caps sheet names at 31 characters.
const SHEET_NAME_MAX: usize = 31;

/// Export XLSX with a styled header, banded rows and fitted columns.
pub(crate) fn export_xlsx(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let sheet_name: String = table
        .title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(SHEET_NAME_MAX)
        .collect();
    if !sheet_name.trim().is_empty() {
        worksheet.set_name(sheet_name.trim()).map_err(to_export_error)?;
    }

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header.as_str(), &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);
    let footer_bg = Color::RGB(0xD9D9D9);

    // ---------------------------
    // Rows
    // ---------------------------
    let n_data = table.rows.len();
    for (row_index, values) in table.all_rows().enumerate() {
        let row = (row_index + 1) as u32;
        let is_footer = row_index >= n_data;
        let band_color = if is_footer {
            footer_bg
        } else if row_index % 2 == 0 {
            band1
        } else {
            band2
        };

        for (col, value) in values.iter().enumerate() {
            write_xlsx_cell(worksheet, row, col as u16, value, band_color, is_footer)?;

            if let Some(w) = col_widths.get_mut(col) {
                *w = (*w).max(UnicodeWidthStr::width(cell_text(value).as_str()));
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Write one cell: numbers as numbers, date strings as Excel dates, the
/// rest as text.
fn write_xlsx_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    bg: Color,
    bold: bool,
) -> AppResult<()> {
    let mut fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    if bold {
        fmt = fmt.set_bold();
    }

    match value {
        Value::Number(n) => {
            let num = n.as_f64().unwrap_or(0.0);
            let fmt = fmt.set_align(FormatAlign::Right).set_num_format("#,##0.##");
            worksheet
                .write_with_format(row, col, num, &fmt)
                .map_err(to_export_error)?;
        }
        Value::Bool(b) => {
            worksheet
                .write_with_format(row, col, *b, &fmt)
                .map_err(to_export_error)?;
        }
        other => {
            let s = cell_text(other);
            if let Some((num_format, serial)) = parse_to_excel_date(&s) {
                let fmt = fmt.set_num_format(num_format);
                worksheet
                    .write_with_format(row, col, serial, &fmt)
                    .map_err(to_export_error)?;
            } else {
                worksheet
                    .write_with_format(row, col, s.as_str(), &fmt)
                    .map_err(to_export_error)?;
            }
        }
    }

    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
