//! Embedded JSON payloads (`Attributs_JSON`, `Attributs`).
//!
//! Extracts carry a JSON object per row, sometimes still using the CSV
//! doubled-quote escape (`{""pays"":""FR""}`). Parsing is best effort: a
//! corrupt cell degrades to an empty payload so the remaining rows of the
//! batch are still processed.

use serde_json::{Map, Value};

/// Parsed payload of one row. Lookups never fail: absent keys resolve to the
/// caller's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Parse a raw payload cell.
    ///
    /// - `""` and `"{}"` yield an empty payload;
    /// - every `""` is collapsed to `"` before parsing;
    /// - malformed JSON, or JSON that is not an object, yields an empty payload.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "{}" {
            return Self::default();
        }

        let collapsed = raw.replace("\"\"", "\"");
        match serde_json::from_str::<Value>(&collapsed) {
            Ok(Value::Object(map)) => Self(map),
            Ok(other) => {
                tracing::debug!(
                    kind = json_kind(&other),
                    "payload is not a JSON object; ignoring"
                );
                Self::default()
            }
            Err(err) => {
                tracing::debug!(error = %err, "malformed payload; ignoring");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell text for `key`, or `default` when the key is absent.
    ///
    /// A key that is present with a `null` value renders as empty, not as
    /// the default.
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(value) => render_cell(value),
            None => default.to_string(),
        }
    }

    /// First candidate key that is present with a non-empty rendering.
    pub fn text_or_else(&self, keys: &[&str], default: &str) -> String {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .map(render_cell)
            .find(|cell| !cell.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Boolean flag rendered as lowercase text; absent or `null` is `false`.
    pub fn flag(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => "false".to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => render_cell(other).to_lowercase(),
        }
    }

    /// Nested object under `key`; anything else is an empty payload.
    pub fn nested(&self, key: &str) -> Payload {
        match self.0.get(key) {
            Some(Value::Object(map)) => Payload(map.clone()),
            _ => Payload::default(),
        }
    }

    /// Compact JSON text of the value under `key`, or `default` when absent.
    pub fn json_text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(value) => value.to_string(),
            None => default.to_string(),
        }
    }
}

/// Render a JSON value as a CSV cell.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
