//! Unwrapping of the backend's JSON envelope.
//!
//! A successful body is either `{"data": <payload>, ...}` or the payload
//! itself; the backend in production returns payload objects directly.

use serde_json::Value;

use crate::error::Failure;

/// Extract the payload from a 2xx response body.
///
/// An empty body yields `Value::Null`.
pub fn payload(body: &str) -> Result<Value, Failure> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| Failure::Decode(e.to_string()))?;
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn data_field_is_unwrapped() {
        let value = payload(r#"{"data":{"status":"ok"}}"#).unwrap();
        assert_eq!(value, json!({"status": "ok"}));
    }

    #[test]
    fn data_field_wins_over_siblings() {
        let value = payload(r#"{"data":[1,2],"message":"done"}"#).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn null_data_stays_null() {
        assert_eq!(payload(r#"{"data":null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn bare_payload_is_returned_as_is() {
        let value = payload(r#"{"success":true,"message":"登录成功"}"#).unwrap();
        assert_eq!(value, json!({"success": true, "message": "登录成功"}));
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(payload("").unwrap(), Value::Null);
        assert_eq!(payload("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_json_is_a_decode_failure() {
        assert!(matches!(payload("not json"), Err(Failure::Decode(_))));
    }
}
