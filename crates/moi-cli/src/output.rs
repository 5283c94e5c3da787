//! Output formatting

use serde_json::{json, Map, Value};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a boolean field to the output
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Render to the string `print` would write
    pub fn render(&self) -> Option<String> {
        if self.json_mode {
            Some(serde_json::to_string_pretty(&json!(self.fields)).unwrap_or_default())
        } else {
            self.message.clone()
        }
    }

    /// Print the output
    pub fn print(self) {
        if let Some(text) = self.render() {
            println!("{}", text);
        }
    }
}
