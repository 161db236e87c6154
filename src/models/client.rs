use super::value::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client directory entry: default attributes cached by address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub anombrede: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cubicos: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClientField {
    Direccion,
    Anombrede,
    Cubicos,
    Valor,
    Email,
}

impl ClientField {
    pub fn key(&self) -> &'static str {
        match self {
            ClientField::Direccion => "direccion",
            ClientField::Anombrede => "anombrede",
            ClientField::Cubicos => "cubicos",
            ClientField::Valor => "valor",
            ClientField::Email => "email",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ClientField::Cubicos | ClientField::Valor)
    }
}
