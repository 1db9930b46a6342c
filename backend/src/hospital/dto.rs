use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

/// `{success, data, message?, total?}` as returned by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn default_success() -> bool {
    true
}

/// Lists arrive either as a bare array, as `{data: [...]}` or double wrapped
/// as `{data: {data: [...]}}`. An envelope without a list in it counts as an
/// empty list; a body that is neither an array nor an object is an error.
pub fn unwrap_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, AppError> {
    let data = match body {
        Value::Array(_) => body,
        Value::Object(_) => {
            let envelope: ApiEnvelope = serde_json::from_value(body)
                .map_err(|e| AppError::Upstream(format!("Malformed envelope: {}", e)))?;
            if !envelope.success {
                return Err(AppError::Upstream(
                    envelope
                        .message
                        .unwrap_or_else(|| "Upstream reported failure".to_string()),
                ));
            }
            match envelope.data {
                Value::Object(mut inner) => inner.remove("data").unwrap_or(Value::Null),
                other => other,
            }
        }
        other => {
            return Err(AppError::Upstream(format!(
                "Expected a list or an envelope, got {}",
                kind_of(&other)
            )));
        }
    };

    match data {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| AppError::Upstream(format!("Malformed item: {}", e)))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pull the upstream `message` out of an error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.is_empty())
}
