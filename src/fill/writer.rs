use serde::Serialize;
use tracing::{debug, info};

use crate::context::extract_label;
use crate::dom::{Document, EventKind, NodeId};
use crate::field::reference::find_by_reference;
use crate::fill::clock::{Clock, Timings};
use crate::fill::speed::AnimationSpeed;
use crate::options::extract::{SelectOption, is_select_like};
use crate::options::fuzzy::key_score;
use crate::options::matcher::{FillOutcome, MatchKind, fill_select_like, match_option};
use crate::options::synonyms::preference_list;
use crate::resolve::instruction::{Action, AutofillInstruction, InstructionValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    Filled,
    Cleared,
    Skipped,
    /// The control already held the value.
    Unchanged,
    /// Needs a file from the user.
    PendingUpload,
    /// The reference id no longer resolves.
    Missing,
    NoMatch,
    NoOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub reference_id: String,
    pub status: WriteStatus,
}

impl WriteOutcome {
    fn new(reference_id: &str, status: WriteStatus) -> Self {
        Self {
            reference_id: reference_id.to_string(),
            status,
        }
    }

    /// The control holds the requested value after the write.
    pub fn is_satisfied(&self) -> bool {
        matches!(self.status, WriteStatus::Filled | WriteStatus::Unchanged | WriteStatus::Cleared)
    }
}

/// Everything a write pass needs besides the document.
pub struct WriteContext<'a> {
    pub clock: &'a dyn Clock,
    pub timings: Timings,
    pub speed: AnimationSpeed,
}

enum ControlKind {
    File,
    Choice { radio: bool },
    SelectLike,
    Text,
}

fn control_kind(doc: &Document, node: NodeId) -> ControlKind {
    let input_type = doc.attr(node, "type").unwrap_or("").to_lowercase();
    if doc.tag(node) == "input" {
        match input_type.as_str() {
            "file" => return ControlKind::File,
            "radio" => return ControlKind::Choice { radio: true },
            "checkbox" => return ControlKind::Choice { radio: false },
            _ => {}
        }
    }
    if is_select_like(doc, node) {
        ControlKind::SelectLike
    } else {
        ControlKind::Text
    }
}

fn from_fill_outcome(outcome: FillOutcome) -> WriteStatus {
    match outcome {
        FillOutcome::Filled => WriteStatus::Filled,
        FillOutcome::AlreadySelected => WriteStatus::Unchanged,
        FillOutcome::NoMatch => WriteStatus::NoMatch,
        FillOutcome::NoOptions => WriteStatus::NoOptions,
        FillOutcome::NoControl => WriteStatus::Missing,
    }
}

// ============================================================================
// Per-kind writes
// ============================================================================

fn write_text(doc: &mut Document, node: NodeId, value: &str) -> WriteStatus {
    if doc.value(node) == value {
        return WriteStatus::Unchanged;
    }
    doc.set_value(node, value);
    doc.dispatch(node, EventKind::Input);
    doc.dispatch(node, EventKind::Change);
    WriteStatus::Filled
}

fn set_choice(doc: &mut Document, node: NodeId, radio: bool, checked: bool) -> WriteStatus {
    if doc.checked(node) == checked {
        return WriteStatus::Unchanged;
    }
    if radio && checked {
        if let Some(name) = doc.attr(node, "name").map(str::to_string) {
            let group = doc.find_all(|d, n| {
                n != node && d.attr(n, "type") == Some("radio") && d.attr(n, "name") == Some(name.as_str())
            });
            for other in group {
                doc.set_checked(other, false);
            }
        }
    }
    doc.set_checked(node, checked);
    doc.dispatch(node, EventKind::Click);
    doc.dispatch(node, EventKind::Input);
    doc.dispatch(node, EventKind::Change);
    if checked {
        WriteStatus::Filled
    } else {
        WriteStatus::Cleared
    }
}

/// True when a text answer names this radio or checkbox. Exact matches on
/// label or value count. A fuzzy hit counts only when answer and label are
/// of similar length and neither is a strict substring of the other, so
/// "female" never ticks "Male" and "male" never ticks "Female".
fn choice_matches(label: &str, value: &str, answer: &str) -> bool {
    let option = SelectOption {
        text: label.to_string(),
        value: value.to_string(),
        node: None,
    };
    if match_option(std::slice::from_ref(&option), answer).is_some_and(|m| m.kind == MatchKind::Exact) {
        return true;
    }
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return false;
    }
    preference_list(answer).iter().any(|candidate| {
        let candidate = candidate.trim().to_lowercase();
        similar_length(&candidate, &label)
            && !candidate.contains(label.as_str())
            && !label.contains(candidate.as_str())
            && key_score(&candidate, &label).is_some()
    })
}

fn similar_length(a: &str, b: &str) -> bool {
    let (a, b) = (a.chars().count(), b.chars().count());
    a * 5 >= b * 4 && b * 5 >= a * 4
}

fn write_choice_text(doc: &mut Document, node: NodeId, radio: bool, answer: &str) -> WriteStatus {
    let label = extract_label(doc, node).unwrap_or_default();
    let value = doc.attr(node, "value").unwrap_or("").to_string();
    if choice_matches(&label, &value, answer) {
        set_choice(doc, node, radio, true)
    } else {
        WriteStatus::NoMatch
    }
}

fn write_fill(
    doc: &mut Document,
    node: NodeId,
    value: &InstructionValue,
    ctx: &WriteContext<'_>,
) -> WriteStatus {
    match control_kind(doc, node) {
        ControlKind::File => WriteStatus::Skipped,
        ControlKind::Choice { radio } => match value.as_flag() {
            Some(flag) => set_choice(doc, node, radio, flag),
            None => write_choice_text(doc, node, radio, &value.to_string()),
        },
        ControlKind::SelectLike => {
            let label = extract_label(doc, node);
            let outcome = fill_select_like(
                doc,
                node,
                &value.to_string(),
                label.as_deref(),
                ctx.clock,
                &ctx.timings,
            );
            from_fill_outcome(outcome)
        }
        ControlKind::Text => write_text(doc, node, &value.to_string()),
    }
}

fn write_clear(doc: &mut Document, node: NodeId) -> WriteStatus {
    match control_kind(doc, node) {
        ControlKind::File => WriteStatus::Skipped,
        ControlKind::Choice { radio } => match set_choice(doc, node, radio, false) {
            WriteStatus::Unchanged => WriteStatus::Unchanged,
            _ => WriteStatus::Cleared,
        },
        ControlKind::SelectLike | ControlKind::Text => match write_text(doc, node, "") {
            WriteStatus::Filled => WriteStatus::Cleared,
            other => other,
        },
    }
}

/// Apply one instruction. Never fails; problems come back as a status.
pub fn apply_instruction(
    doc: &mut Document,
    instruction: &AutofillInstruction,
    ctx: &WriteContext<'_>,
) -> WriteOutcome {
    let reference_id = instruction.reference_id.as_str();
    if instruction.action == Action::Skip {
        return WriteOutcome::new(reference_id, WriteStatus::Skipped);
    }
    let Some(node) = find_by_reference(doc, reference_id) else {
        debug!(reference_id, "control no longer in document");
        return WriteOutcome::new(reference_id, WriteStatus::Missing);
    };
    if instruction.is_file_upload() {
        info!(reference_id, "file upload needed");
        return WriteOutcome::new(reference_id, WriteStatus::PendingUpload);
    }

    let status = match (&instruction.action, &instruction.value) {
        (Action::Clear, _) => write_clear(doc, node),
        (Action::Fill, Some(value)) => write_fill(doc, node, value, ctx),
        (Action::Fill, None) => WriteStatus::Skipped,
        (Action::Skip, _) => WriteStatus::Skipped,
    };
    debug!(reference_id, action = %instruction.action, status = ?status, "instruction applied");
    WriteOutcome::new(reference_id, status)
}

/// Apply instructions in order, pausing between writes at the configured
/// animation speed.
pub fn apply_instructions(
    doc: &mut Document,
    instructions: &[AutofillInstruction],
    ctx: &WriteContext<'_>,
) -> Vec<WriteOutcome> {
    let delay = ctx.speed.delay();
    let mut outcomes = Vec::with_capacity(instructions.len());
    for instruction in instructions {
        let outcome = apply_instruction(doc, instruction, ctx);
        let wrote = matches!(outcome.status, WriteStatus::Filled | WriteStatus::Cleared);
        outcomes.push(outcome);
        if wrote && !delay.is_zero() {
            ctx.clock.sleep(delay);
        }
    }
    outcomes
}
