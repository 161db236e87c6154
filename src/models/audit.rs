use super::value::lenient;
use crate::store::record::{Fields, Record};
use serde::Deserialize;
use serde_json::Value;

pub const CREATED_TAG: &str = "CREADO";
pub const EDITED_TAG: &str = "EDITADO";
pub const DELETED_TAG: &str = "ELIMINADO";

/// Every `cambio` line starts with `Registro <TAG>`.
pub const RECORD_PREFIX: &str = "Registro";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AuditAction {
    Created,
    Edited,
    Deleted,
}

impl AuditAction {
    pub fn tag(&self) -> &'static str {
        match self {
            AuditAction::Created => CREATED_TAG,
            AuditAction::Edited => EDITED_TAG,
            AuditAction::Deleted => DELETED_TAG,
        }
    }
}

/// One immutable line of the change history (`historialdecambios`).
///
/// Stored flat: the observed record's fields first, then the audit fields,
/// which win on name clashes.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// Id of the record the change happened to.
    pub record_id: String,
    /// Source collection.
    pub lugar: String,
    pub cambio: String,
    pub fecha: String,
    pub hora: String,
    pub usuario: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    /// Record fields carried along (last known value).
    pub data: Fields,
}

#[derive(Deserialize, Default)]
struct AuditHeader {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    lugar: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    cambio: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    hora: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    usuario: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    timestamp: Option<i64>,
}

const AUDIT_KEYS: [&str; 7] = ["id", "lugar", "cambio", "fecha", "hora", "usuario", "timestamp"];

impl AuditEntry {
    pub fn to_fields(&self) -> Fields {
        let mut out = self.data.clone();
        out.insert("id".into(), Value::from(self.record_id.clone()));
        out.insert("lugar".into(), Value::from(self.lugar.clone()));
        out.insert("cambio".into(), Value::from(self.cambio.clone()));
        out.insert("fecha".into(), Value::from(self.fecha.clone()));
        out.insert("hora".into(), Value::from(self.hora.clone()));
        out.insert("usuario".into(), Value::from(self.usuario.clone()));
        out.insert("timestamp".into(), Value::from(self.timestamp));
        out
    }

    pub fn from_record(record: &Record) -> Self {
        let header: AuditHeader = record.to_model().unwrap_or_default();

        let data = record
            .fields
            .iter()
            .filter(|(k, _)| !AUDIT_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            record_id: header.id.unwrap_or_default(),
            lugar: header.lugar.unwrap_or_default(),
            cambio: header.cambio.unwrap_or_default(),
            fecha: header.fecha.unwrap_or_default(),
            hora: header.hora.unwrap_or_default(),
            usuario: header.usuario.unwrap_or_default(),
            timestamp: header.timestamp.unwrap_or(0),
            data,
        }
    }

    /// Action recovered from the tag inside `cambio`.
    pub fn action(&self) -> Option<AuditAction> {
        [AuditAction::Created, AuditAction::Edited, AuditAction::Deleted]
            .into_iter()
            .find(|a| self.cambio.starts_with(&format!("{} {}", RECORD_PREFIX, a.tag())))
    }
}
