use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A single highlight record as returned by the API.
pub type HighlightRecord = Map<String, Value>;

/// The full API response. Opaque apart from its `data` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightPayload(Value);

impl HighlightPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `null`, `{}` and other falsy bodies carry nothing to archive or index.
    pub fn is_empty(&self) -> bool {
        !is_truthy(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Entries of the `data` list; empty when the list is missing.
    pub fn records(&self) -> &[Value] {
        self.0
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Primary key for a record: `id` if usable, otherwise `url`.
pub fn record_key(record: &HighlightRecord) -> Option<String> {
    ["id", "url"]
        .iter()
        .filter_map(|field| record.get(*field))
        .find(|value| is_truthy(value))
        .map(stringify)
}

/// Returns the key and the record stamped for indexing, or `None` if the
/// record has no usable identifier.
pub fn prepare_record(mut record: HighlightRecord, fetch_date: &str) -> Option<(String, HighlightRecord)> {
    let key = record_key(&record)?;
    record.insert("id".to_string(), Value::String(key.clone()));
    record.insert("fetch_date".to_string(), Value::String(fetch_date.to_string()));
    Some((key, record))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
