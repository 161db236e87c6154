use crate::errors::{AppError, AppResult};
use crate::export::{ExportTable, notify_export_success};
use crate::ui::messages::info;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed: title, rows keyed by header, and totals.
pub(crate) fn export_json(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let totals = table.footer.as_ref().map(|f| {
        Value::Object(
            table
                .headers
                .iter()
                .cloned()
                .zip(f.iter().cloned())
                .collect(),
        )
    });

    let doc = json!({
        "title": table.title,
        "rows": table.json_rows(),
        "totals": totals,
    });

    let json_data = serde_json::to_string_pretty(&doc)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV with a header line.
pub(crate) fn export_csv(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(&table.headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in table.text_rows() {
        wtr.write_record(&row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
