use std::fmt;

use serde::{Deserialize, Serialize};

/// Marks a field that needs a file rather than text.
pub const FILE_UPLOAD_SENTINEL: &str = "__FILE_UPLOAD_NEEDED__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Fill,
    Clear,
    Skip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Fill => "fill",
            Action::Clear => "clear",
            Action::Skip => "skip",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionValue {
    Text(String),
    Flag(bool),
}

impl InstructionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InstructionValue::Text(s) => Some(s),
            InstructionValue::Flag(_) => None,
        }
    }

    /// Boolean reading. `"true"`/`"false"` strings count as flags.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            InstructionValue::Flag(b) => Some(*b),
            InstructionValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for InstructionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionValue::Text(s) => f.write_str(s),
            InstructionValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for InstructionValue {
    fn from(s: &str) -> Self {
        InstructionValue::Text(s.to_string())
    }
}

impl From<String> for InstructionValue {
    fn from(s: String) -> Self {
        InstructionValue::Text(s)
    }
}

impl From<bool> for InstructionValue {
    fn from(b: bool) -> Self {
        InstructionValue::Flag(b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillInstruction {
    pub reference_id: String,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<InstructionValue>,
}

impl AutofillInstruction {
    pub fn fill(reference_id: &str, value: impl Into<InstructionValue>) -> Self {
        Self {
            reference_id: reference_id.to_string(),
            action: Action::Fill,
            value: Some(value.into()),
        }
    }

    /// Tick a checkbox or radio.
    pub fn check(reference_id: &str) -> Self {
        Self::fill(reference_id, true)
    }

    pub fn clear(reference_id: &str) -> Self {
        Self {
            reference_id: reference_id.to_string(),
            action: Action::Clear,
            value: None,
        }
    }

    pub fn skip(reference_id: &str) -> Self {
        Self {
            reference_id: reference_id.to_string(),
            action: Action::Skip,
            value: None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.action == Action::Skip
    }

    pub fn text_value(&self) -> Option<&str> {
        self.value.as_ref().and_then(InstructionValue::as_text)
    }

    pub fn is_file_upload(&self) -> bool {
        self.text_value() == Some(FILE_UPLOAD_SENTINEL)
    }
}
