//! Best-effort extraction of the `top_emotions` summary from a response body.
//!
//! Two response shapes are understood: the classic emotion API puts the
//! records at the root, the chat flow may nest them under `memory_token`.

use serde_json::{Map, Value};

pub const NOT_FOUND: &str = "(no top_emotions field found)";
pub const UNPARSEABLE: &str = "(response not JSON or missing fields)";

const TOP_EMOTIONS: &str = "top_emotions";
const MEMORY_TOKEN: &str = "memory_token";
const MAX_ENTRIES: usize = 5;

/// Marker for a body that cannot be summarised at all.
#[derive(Debug, PartialEq, Eq)]
struct Malformed;

/// Summarise a raw response body. Never fails: unusable input yields one of
/// the placeholder strings.
pub fn summarize(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => summarize_value(&value),
        Err(_) => UNPARSEABLE.to_string(),
    }
}

pub fn summarize_value(value: &Value) -> String {
    match extract(value) {
        Ok(Some(summary)) => summary,
        Ok(None) => NOT_FOUND.to_string(),
        Err(Malformed) => UNPARSEABLE.to_string(),
    }
}

fn extract(value: &Value) -> Result<Option<String>, Malformed> {
    let root = value.as_object().ok_or(Malformed)?;

    if let Some(summary) = summarize_records(root)? {
        return Ok(Some(summary));
    }

    match root.get(MEMORY_TOKEN) {
        None => Ok(None),
        Some(Value::Object(token)) => summarize_records(token),
        Some(_) => Err(Malformed),
    }
}

/// `Ok(None)` when `top_emotions` is missing, not an array, or empty.
fn summarize_records(object: &Map<String, Value>) -> Result<Option<String>, Malformed> {
    let records = match object.get(TOP_EMOTIONS) {
        Some(Value::Array(records)) if !records.is_empty() => records,
        _ => return Ok(None),
    };

    let parts = records
        .iter()
        .take(MAX_ENTRIES)
        .map(format_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(parts.join(", ")))
}

fn format_record(record: &Value) -> Result<String, Malformed> {
    let record = record.as_object().ok_or(Malformed)?;

    let label = match record.get("label") {
        None | Some(Value::Null) => "?".to_string(),
        Some(Value::String(label)) => label.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
    };

    let score = match record.get("score") {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64().ok_or(Malformed)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| Malformed)?,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => return Err(Malformed),
    };

    Ok(format!("{label} {score:.2}"))
}
