use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::store::record::to_fields;
use crate::store::{Collection, CollectionStore, Record, fields};
use crate::ui::messages::{info, success};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Workers (`users`). Jobs, adjustments, cash entries and payroll rows refer
/// to them by record id.
pub struct EmployeesLogic;

impl EmployeesLogic {
    pub fn add(store: &CollectionStore, name: &str, role: Option<&str>) -> AppResult<Record> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Required("name".into()));
        }
        if Self::find_by_name(store, name)?.is_some() {
            return Err(AppError::AlreadyExists(format!("employee '{}'", name)));
        }

        let employee = Employee {
            name: Some(name.to_string()),
            role: role.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string),
            active: true,
            extra: Map::new(),
        };

        let rec = store.push(Collection::Users, to_fields(&employee)?)?;
        success(format!("Employee '{}' added (id {}).", name, rec.id));
        Ok(rec)
    }

    /// All employees sorted by name, inactive ones only when asked.
    pub fn list(store: &CollectionStore, include_inactive: bool) -> AppResult<Vec<(String, Employee)>> {
        let mut out = Vec::new();
        for rec in store.snapshot(Collection::Users)? {
            let e: Employee = rec.to_model()?;
            if include_inactive || e.active {
                out.push((rec.id, e));
            }
        }
        out.sort_by_key(|(_, e)| e.display_name().to_lowercase());
        Ok(out)
    }

    fn find_by_name(store: &CollectionStore, name: &str) -> AppResult<Option<Record>> {
        let wanted = name.trim().to_lowercase();
        Ok(store.snapshot(Collection::Users)?.into_iter().find(|r| {
            r.text("name")
                .is_some_and(|n| n.trim().to_lowercase() == wanted)
        }))
    }

    /// Look an employee up by record id, then by (case-insensitive) name.
    pub fn resolve(store: &CollectionStore, key: &str) -> AppResult<Record> {
        if let Some(rec) = store.get(Collection::Users, key)? {
            return Ok(rec);
        }
        Self::find_by_name(store, key)?
            .ok_or_else(|| AppError::NotFound(format!("employee '{}'", key)))
    }

    /// Id to display name, for rendering `realizadopor` and friends.
    pub fn names(store: &CollectionStore) -> AppResult<HashMap<String, String>> {
        Ok(store
            .snapshot(Collection::Users)?
            .into_iter()
            .map(|r| {
                let name = r.text("name").unwrap_or("").to_string();
                (r.id, name)
            })
            .collect())
    }

    /// Display name for an employee id, falling back to the id itself.
    pub fn display(names: &HashMap<String, String>, id: Option<&str>) -> String {
        match id {
            None => String::new(),
            Some(id) => names
                .get(id)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        }
    }

    pub fn rename(store: &CollectionStore, key: &str, new_name: &str) -> AppResult<Record> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::Required("name".into()));
        }
        let rec = Self::resolve(store, key)?;
        store.write(
            Collection::Users,
            &rec.id,
            fields([("name", Value::from(new_name))]),
        )
    }

    pub fn set_role(store: &CollectionStore, key: &str, role: &str) -> AppResult<Record> {
        let rec = Self::resolve(store, key)?;
        store.write(
            Collection::Users,
            &rec.id,
            fields([("role", Value::from(role.trim()))]),
        )
    }

    pub fn set_active(store: &CollectionStore, key: &str, active: bool) -> AppResult<Record> {
        let rec = Self::resolve(store, key)?;
        let out = store.write(
            Collection::Users,
            &rec.id,
            fields([("active", Value::from(active))]),
        )?;
        info(format!(
            "Employee '{}' is now {}.",
            rec.text("name").unwrap_or(&rec.id),
            if active { "active" } else { "inactive" }
        ));
        Ok(out)
    }

    pub fn delete(store: &CollectionStore, key: &str) -> AppResult<()> {
        let rec = Self::resolve(store, key)?;
        store.remove(Collection::Users, &rec.id)?;
        info(format!(
            "Deleted employee '{}'.",
            rec.text("name").unwrap_or(&rec.id)
        ));
        Ok(())
    }
}
