use crate::models::value::display_value;
use serde_json::{Map, Value};

/// A computed view ready to be written in any export format.
///
/// Cells keep their JSON type so that JSON and XLSX get real numbers, while
/// CSV and PDF get the rendered text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Optional closing row (totals), written after the data rows.
    pub footer: Option<Vec<Value>>,
}

impl ExportTable {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn with_footer(mut self, footer: Vec<Value>) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows plus the footer.
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<Value>> {
        self.rows.iter().chain(self.footer.iter())
    }

    /// Every row (footer included) as text, for CSV and PDF.
    pub(crate) fn text_rows(&self) -> Vec<Vec<String>> {
        self.all_rows()
            .map(|r| r.iter().map(cell_text).collect())
            .collect()
    }

    /// Data rows as objects keyed by header, for JSON.
    pub(crate) fn json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(r.iter().cloned())
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

pub(crate) fn cell_text(v: &Value) -> String {
    match v {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() != 0.0 => format!("{:.2}", f),
            _ => display_value(Some(v)),
        },
        _ => display_value(Some(v)),
    }
}
