use crate::core::propagation::find_client_by_address;
use crate::errors::{AppError, AppResult};
use crate::models::client::{Client, ClientField};
use crate::models::value::{opt_number, parse_number_input};
use crate::store::{Collection, CollectionStore, Record, fields};
use crate::ui::messages::{info, success};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub direccion: String,
    pub anombrede: Option<String>,
    pub cubicos: Option<f64>,
    pub valor: Option<f64>,
    pub email: Option<String>,
}

/// Client directory (`clientes`), keyed by address by convention.
pub struct ClientsLogic;

impl ClientsLogic {
    pub fn add(store: &CollectionStore, client: &NewClient) -> AppResult<Record> {
        let direccion = client.direccion.trim();
        if direccion.is_empty() {
            return Err(AppError::Required("direccion".into()));
        }
        if find_client_by_address(store, direccion)?.is_some() {
            return Err(AppError::AlreadyExists(format!("client at '{}'", direccion)));
        }

        let text = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(Value::from)
                .unwrap_or(Value::Null)
        };

        let rec = store.push(
            Collection::Clients,
            fields([
                ("direccion", Value::from(direccion)),
                ("anombrede", text(&client.anombrede)),
                ("cubicos", opt_number(client.cubicos)),
                ("valor", opt_number(client.valor)),
                ("email", text(&client.email)),
            ]),
        )?;
        success(format!("Client '{}' added.", direccion));
        Ok(rec)
    }

    /// Clients sorted by address, optionally only those whose address or
    /// name contains `search`.
    pub fn list(store: &CollectionStore, search: Option<&str>) -> AppResult<Vec<(String, Client)>> {
        let needle = search.map(|s| s.trim().to_lowercase());

        let mut out = Vec::new();
        for rec in store.snapshot(Collection::Clients)? {
            let c: Client = rec.to_model()?;
            if let Some(n) = &needle {
                let hay = format!(
                    "{} {}",
                    c.direccion.as_deref().unwrap_or(""),
                    c.anombrede.as_deref().unwrap_or("")
                )
                .to_lowercase();
                if !hay.contains(n.as_str()) {
                    continue;
                }
            }
            out.push((rec.id, c));
        }
        out.sort_by_key(|(_, c)| c.direccion.clone().unwrap_or_default().to_lowercase());
        Ok(out)
    }

    /// Edit one field. Jobs already scheduled keep the values they copied.
    pub fn set_field(
        store: &CollectionStore,
        id: &str,
        field: ClientField,
        raw: &str,
    ) -> AppResult<Record> {
        store.require(Collection::Clients, id)?;

        let key = field.key();
        let value = if field.is_numeric() {
            parse_number_input(key, raw)?
        } else {
            let t = raw.trim();
            if field == ClientField::Direccion && t.is_empty() {
                return Err(AppError::Required("direccion".into()));
            }
            Value::from(t)
        };

        store.write(Collection::Clients, id, fields([(key, value)]))
    }

    pub fn delete(store: &CollectionStore, id: &str) -> AppResult<Record> {
        let removed = store
            .remove(Collection::Clients, id)?
            .ok_or_else(|| AppError::NotFound(format!("clientes/{}", id)))?;
        info(format!(
            "Deleted client '{}'.",
            removed.text("direccion").unwrap_or(id)
        ));
        Ok(removed)
    }
}
