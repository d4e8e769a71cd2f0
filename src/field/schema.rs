use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AutofillError, Result};
use crate::field::descriptor::FieldDescriptor;
use crate::resolve::instruction::AutofillInstruction;

// ============================================================================
// Boundary validation
//
// Payloads arriving from another process or frame are validated here before
// anything else sees them. Missing or mistyped fields are rejected rather
// than coerced; unknown extra keys are ignored.
// ============================================================================

fn parse_array<T: DeserializeOwned>(context: &str, payload: &Value) -> Result<Vec<T>> {
    let items = payload
        .as_array()
        .ok_or_else(|| AutofillError::invalid_payload(context, "expected a JSON array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item.clone())
                .map_err(|e| AutofillError::invalid_payload(context, format!("item {}: {}", i, e)))
        })
        .collect()
}

pub fn parse_descriptors(payload: &Value) -> Result<Vec<FieldDescriptor>> {
    let fields: Vec<FieldDescriptor> = parse_array("descriptor", payload)?;

    let mut seen = HashSet::new();
    for field in &fields {
        if field.reference_id.trim().is_empty() {
            return Err(AutofillError::invalid_payload(
                "descriptor",
                "empty referenceId",
            ));
        }
        if !seen.insert(field.reference_id.as_str()) {
            return Err(AutofillError::invalid_payload(
                "descriptor",
                format!("duplicate referenceId '{}'", field.reference_id),
            ));
        }
    }
    Ok(fields)
}

pub fn parse_descriptors_str(raw: &str) -> Result<Vec<FieldDescriptor>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| AutofillError::invalid_payload("descriptor", e))?;
    parse_descriptors(&value)
}

pub fn parse_instructions(payload: &Value) -> Result<Vec<AutofillInstruction>> {
    let instructions: Vec<AutofillInstruction> = parse_array("instruction", payload)?;
    if let Some(bad) = instructions.iter().find(|i| i.reference_id.trim().is_empty()) {
        return Err(AutofillError::invalid_payload(
            "instruction",
            format!("empty referenceId for action {}", bad.action),
        ));
    }
    Ok(instructions)
}
