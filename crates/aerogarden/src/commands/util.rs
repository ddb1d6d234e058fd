//! Shared helpers for command handlers.

use std::sync::Arc;

use serde_json::Value;

use aerogarden_core::{Controller, Garden};

use crate::error::CliError;

/// Cached garden by key, or a not-found error pointing at `gardens list`.
pub fn find_garden(controller: &Controller, key: &str) -> Result<Arc<Garden>, CliError> {
    controller
        .garden(key)
        .ok_or_else(|| CliError::GardenNotFound { key: key.to_owned() })
}

/// Raw field value for humans: strings unquoted, null as `-`.
pub fn show_value(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn values_render_without_quotes() {
        assert_eq!(show_value(&json!("Herbs")), "Herbs");
        assert_eq!(show_value(&json!(12)), "12");
        assert_eq!(show_value(&Value::Null), "-");
    }
}
