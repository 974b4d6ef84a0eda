// Response decoding: raw model text (or an invocation failure) becomes a list
// of untyped records. Every failure path collapses into the canonical error
// list, so downstream stages only ever see one failure representation.

use serde_json::Value;

use super::types::Finding;
use super::CheckError;

/// Decode the invoker's result into a list of candidate records.
///
/// Never fails: invocation failures, invalid JSON and unexpected top-level
/// shapes all yield the one-element canonical error list. A lone object is
/// wrapped into a one-element list; an array is returned as is, however long.
pub fn decode_response(reply: Result<String, CheckError>) -> Vec<Value> {
    let text = match reply {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Inference call failed");
            return canonical_error_list(format!("The contradiction check could not be completed: {e}"));
        }
    };

    let decoded: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                reply_len = text.len(),
                "Inference reply is not valid JSON"
            );
            tracing::trace!(reply = %text, "Undecodable inference reply");
            return canonical_error_list(format!(
                "The inference service returned a reply that is not valid JSON: {e}"
            ));
        }
    };

    let records = match decoded {
        Value::Array(items) => items,
        Value::Object(_) => {
            tracing::debug!("Inference reply was a single object, wrapping in a list");
            vec![decoded]
        }
        other => {
            tracing::warn!(kind = json_kind(&other), "Inference reply has unexpected top-level shape");
            return canonical_error_list(format!(
                "The inference service returned a JSON {} instead of a list of findings",
                json_kind(&other)
            ));
        }
    };

    tracing::debug!(record_count = records.len(), "Decoded inference reply");
    records
}

/// The one-element list carrying the canonical error Finding.
pub fn canonical_error_list(explanation: impl Into<String>) -> Vec<Value> {
    // A Finding is plain data with string keys; serialization cannot fail.
    serde_json::to_value(Finding::error(explanation))
        .map(|v| vec![v])
        .unwrap_or_default()
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_canonical_error(records: &[Value]) {
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["type"], "Error");
        assert_eq!(records[0]["quote"], "ERROR");
        assert_eq!(records[0]["line"], 0);
        assert_eq!(records[0]["page"], 0);
        assert!(records[0]["explanation"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn array_passes_through() {
        let records = decode_response(Ok(r#"[{"id": 1}, {"id": 2}]"#.into()));
        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn empty_array_stays_empty() {
        assert!(decode_response(Ok("[]".into())).is_empty());
    }

    #[test]
    fn single_object_is_wrapped() {
        let records = decode_response(Ok(r#"{"id": 1, "type": "Setting"}"#.into()));
        assert_eq!(records, vec![json!({"id": 1, "type": "Setting"})]);
    }

    #[test]
    fn garbage_yields_canonical_error() {
        for garbage in ["", "not json", "```json\n[]\n```", "[{\"id\": 1,", "Here you go: []"] {
            assert_canonical_error(&decode_response(Ok(garbage.into())));
        }
    }

    #[test]
    fn scalar_top_level_yields_canonical_error() {
        for scalar in ["42", "\"text\"", "null", "true"] {
            assert_canonical_error(&decode_response(Ok(scalar.into())));
        }
    }

    #[test]
    fn invocation_failure_yields_canonical_error() {
        let records = decode_response(Err(CheckError::Timeout(30)));
        assert_canonical_error(&records);
        assert!(records[0]["explanation"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let records = decode_response(Ok("\n  [{\"id\": 1}]  \n".into()));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn long_replies_are_not_truncated() {
        let many: Vec<Value> = (1..=250).map(|i| json!({"id": i})).collect();
        let text = serde_json::to_string(&many).unwrap();
        assert_eq!(decode_response(Ok(text)), many);
    }
}
