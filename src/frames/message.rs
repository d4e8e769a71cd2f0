use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AutofillError, Result};

pub const BEGIN_AUTOFILL: &str = "BEGIN_AUTOFILL";
pub const AUTOFILL_COMPLETED: &str = "AUTOFILL_COMPLETED";

/// Messages exchanged between frames, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrameMessage {
    #[serde(rename = "BEGIN_AUTOFILL", rename_all = "camelCase")]
    BeginAutofill { from_frame: String, timestamp: u64 },
    #[serde(rename = "AUTOFILL_COMPLETED", rename_all = "camelCase")]
    AutofillCompleted { from_frame: String },
}

impl FrameMessage {
    pub fn from_frame(&self) -> &str {
        match self {
            FrameMessage::BeginAutofill { from_frame, .. } => from_frame,
            FrameMessage::AutofillCompleted { from_frame } => from_frame,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Validate an incoming `postMessage` payload.
///
/// Payloads without a known `type` belong to someone else and yield
/// `Ok(None)`. A known type with missing or mistyped fields is an error.
pub fn parse_message(payload: &Value) -> Result<Option<FrameMessage>> {
    let Some(kind) = payload.get("type").and_then(Value::as_str) else {
        return Ok(None);
    };
    if kind != BEGIN_AUTOFILL && kind != AUTOFILL_COMPLETED {
        return Ok(None);
    }

    let message: FrameMessage = serde_json::from_value(payload.clone())
        .map_err(|e| AutofillError::invalid_payload("frame message", e))?;
    if message.from_frame().trim().is_empty() {
        return Err(AutofillError::invalid_payload(
            "frame message",
            format!("{} with empty fromFrame", kind),
        ));
    }
    Ok(Some(message))
}

pub fn parse_message_str(raw: &str) -> Result<Option<FrameMessage>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AutofillError::invalid_payload("frame message", e))?;
    parse_message(&value)
}
