use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::classify::Category;
use crate::fill::writer::WriteOutcome;
use crate::resolve::instruction::AutofillInstruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// One instruction written into a document.
    Instruction,
    /// A step of the cross-frame protocol.
    Frame,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub kind: TraceKind,

    pub frame: Option<String>,
    pub pass: Option<String>,

    pub reference_id: Option<String>,
    pub label: Option<String>,
    pub category: Option<String>,

    pub action: Option<String>,
    pub value: Option<String>,
    pub status: Option<String>,

    pub message: Option<String>,
}

impl TraceEvent {
    pub fn now(kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            kind,
            frame: None,
            pass: None,
            reference_id: None,
            label: None,
            category: None,
            action: None,
            value: None,
            status: None,
            message: None,
        }
    }

    pub fn with_frame(mut self, frame: impl ToString) -> Self {
        self.frame = Some(frame.to_string());
        self
    }

    pub fn with_pass(mut self, pass: impl ToString) -> Self {
        self.pass = Some(pass.to_string());
        self
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Record what was asked: target, action and value.
    pub fn with_instruction(mut self, instruction: &AutofillInstruction) -> Self {
        self.reference_id = Some(instruction.reference_id.clone());
        self.action = Some(instruction.action.to_string());
        self.value = instruction.value.as_ref().map(|v| v.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: &WriteOutcome) -> Self {
        self.reference_id = Some(outcome.reference_id.clone());
        self.status = serde_json::to_value(outcome.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        self
    }

    pub fn with_status(mut self, status: impl ToString) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }
}
