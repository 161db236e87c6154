//! Client-directory derived fields on the day sheets.
//!
//! Writing a job's `direccion`, or setting its `servicio`, refreshes the
//! job's defaults from the client with that exact address. The directory is
//! a cache filled one way: later client edits never reach existing jobs.

use crate::errors::AppResult;
use crate::models::value::as_text;
use crate::store::{Collection, CollectionStore, Fields, Record, fields};
use crate::ui::messages::info;
use serde_json::Value;

/// Which client defaults a sheet copies into its jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// `cubicos` only.
    Basic,
    /// `cubicos`, `valor` and `anombrede`.
    Extended,
}

impl LookupMode {
    /// The today sheet is the full service sheet; the planning sheets only
    /// track volume.
    pub fn for_sheet(sheet: Collection) -> Self {
        match sheet {
            Collection::Today => LookupMode::Extended,
            _ => LookupMode::Basic,
        }
    }

    pub fn derived_keys(&self) -> &'static [&'static str] {
        match self {
            LookupMode::Basic => &["cubicos"],
            LookupMode::Extended => &["cubicos", "valor", "anombrede"],
        }
    }
}

/// Client whose `direccion` is exactly `direccion`. An empty address
/// matches nothing.
pub fn find_client_by_address(
    store: &CollectionStore,
    direccion: &str,
) -> AppResult<Option<Record>> {
    if direccion.trim().is_empty() {
        return Ok(None);
    }

    Ok(store
        .snapshot(Collection::Clients)?
        .into_iter()
        .find(|c| c.get("direccion").and_then(Value::as_str) == Some(direccion)))
}

/// Extend `changes` with the fields derived from the client directory.
///
/// `current` is the job as stored (empty for a new job). May create a
/// client as a side effect; the job itself is not written here, so callers
/// apply the returned fields in one write.
pub fn propagate(
    store: &CollectionStore,
    mode: LookupMode,
    current: &Fields,
    changes: Fields,
) -> AppResult<Fields> {
    let mut out = changes;

    let lookup = |key: &str| -> Option<Value> {
        out.get(key).or_else(|| current.get(key)).cloned()
    };

    let direccion = lookup("direccion")
        .as_ref()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let servicio_set = out.get("servicio").map(|v| as_text(v).is_some());
    let seed_cubicos = lookup("cubicos").filter(|v| !is_blank(v));

    let address_written = out.contains_key("direccion");

    if address_written || servicio_set == Some(true) {
        match find_client_by_address(store, &direccion)? {
            Some(client) => {
                for key in mode.derived_keys() {
                    let v = client.get(key).cloned().unwrap_or(Value::Null);
                    out.insert(key.to_string(), v);
                }
            }
            None => {
                for key in mode.derived_keys() {
                    out.insert(key.to_string(), Value::Null);
                }

                if servicio_set == Some(true) && !direccion.trim().is_empty() {
                    let cubicos = seed_cubicos.unwrap_or(Value::Null);
                    store.push(
                        Collection::Clients,
                        fields([
                            ("direccion", Value::from(direccion.clone())),
                            ("cubicos", cubicos.clone()),
                        ]),
                    )?;
                    info(format!("New client added to the directory: {}", direccion));
                    out.insert("cubicos".into(), cubicos);
                }
            }
        }
    }

    if servicio_set == Some(false) {
        out.insert("cubicos".into(), Value::Null);
    }

    Ok(out)
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
