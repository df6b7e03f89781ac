// src/render.rs
//! Text shown in the output area and in prompts.

use serde_json::Value;

pub const RUNNING_MESSAGE: &str = "Запуск анализа...";
pub const EMPTY_ID_PROMPT: &str = "Введите VK ID";
pub const NETWORK_ERROR_MESSAGE: &str = "Ошибка сети";
pub const ERROR_PREFIX: &str = "Ошибка:";

/// Pretty-print a successful payload with two-space indentation.
pub fn render_success(data: &Value) -> String {
    // Serializing a Value can't fail: keys are always strings.
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// `Ошибка: <status> <detail>`, trimmed so a missing detail leaves no trailing space.
pub fn render_http_error(status: u16, detail: Option<&str>) -> String {
    format!("{} {} {}", ERROR_PREFIX, status, detail.unwrap_or(""))
        .trim()
        .to_string()
}

/// Extract the `error` field of an error body.
///
/// An empty or malformed body counts as an empty object. Falsy values
/// (empty string, zero, `false`, `null`) and structured values are treated
/// as no detail at all.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: Value =
        serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));

    match parsed.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(true, |f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
