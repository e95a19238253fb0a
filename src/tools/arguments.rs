//! Typed access to tool-call arguments.

use serde::de::DeserializeOwned;

use crate::error::{ParleyError, Result};

/// Wrapper around the JSON arguments of a tool call.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// The raw JSON value.
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value.get(name).and_then(|v| v.as_str())
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.value.get(name).and_then(|v| v.as_f64())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.value.get(name).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value.get(name).and_then(|v| v.as_bool())
    }

    /// Deserialize a field into a concrete type.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let field = self
            .value
            .get(name)
            .ok_or_else(|| ParleyError::tool("arguments", format!("missing field '{name}'")))?;
        Ok(serde_json::from_value(field.clone())?)
    }
}
