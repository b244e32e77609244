//! Locating the session-replay context inside event data.

use std::num::FpCategory;

use serde_json::{Map, Number, Value};

/// Context type (and preferred `contexts` key) of the session-replay block.
pub const CONTEXT_TYPE: &str = "sessionstack";

/// Key under `contexts` holding the primary session-replay context.
///
/// `contexts.sessionstack` wins when it is an object whose `type` is
/// `sessionstack` or absent. Otherwise exactly one context object with
/// `type == "sessionstack"` must exist under any key.
#[must_use]
pub fn primary_context_key(event: &Value) -> Option<String> {
    let contexts = event.get("contexts")?.as_object()?;

    if let Some(Value::Object(ctx)) = contexts.get(CONTEXT_TYPE) {
        match ctx.get("type") {
            None => return Some(CONTEXT_TYPE.to_string()),
            Some(Value::String(t)) if t == CONTEXT_TYPE => return Some(CONTEXT_TYPE.to_string()),
            _ => {}
        }
    }

    let mut matches = contexts.iter().filter(|(_, value)| {
        value.get("type").and_then(Value::as_str) == Some(CONTEXT_TYPE)
    });
    let (key, _) = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(key.clone())
}

/// The primary session-replay context object, if any.
#[must_use]
pub fn primary_context(event: &Value) -> Option<&Map<String, Value>> {
    let key = primary_context_key(event)?;
    event.get("contexts")?.get(&key)?.as_object()
}

/// Session id of a context. Accepts non-empty strings and non-zero numbers.
#[must_use]
pub fn session_id(context: &Map<String, Value>) -> Option<String> {
    match context.get("session_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if !is_zero(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64()
        .is_some_and(|f| f.classify() == FpCategory::Zero)
}

/// Event timestamp of a context, in milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp(context: &Map<String, Value>) -> Option<i64> {
    let value = context.get("timestamp")?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}
