//! Relay-side framing. The relay only checks that a frame looks like a
//! presence message and stamps it with the sender's identity; payloads are
//! forwarded untouched, including message types it does not know.

use serde_json::{json, Value};

/// Validate a join request.
pub fn check_join(room: &str, identity: &str) -> Result<(), String> {
    if room.trim().is_empty() {
        return Err("room must not be empty".into());
    }
    if identity.trim().is_empty() {
        return Err("identity must not be empty".into());
    }
    Ok(())
}

/// Wrap a client frame as `{"sender": identity, "message": frame}`.
///
/// Returns an error for frames that are not a JSON object with a string
/// `type`.
pub fn wrap_frame(identity: &str, text: &str) -> Result<String, String> {
    let message: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    match message.get("type") {
        Some(Value::String(_)) => {}
        Some(_) => return Err("`type` must be a string".into()),
        None => return Err("missing `type`".into()),
    }
    Ok(json!({ "sender": identity, "message": message }).to_string())
}
