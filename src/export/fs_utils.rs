use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, warning};
use std::io;
use std::path::Path;

/// Whether the export may write to `path`: a new file, `force`, or the
/// user agreeing to overwrite.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    if confirm("Overwrite")? {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::from(io::Error::other(
            "Export cancelled: existing file not overwritten",
        )))
    }
}
