use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::field::descriptor::{FieldDescriptor, build_descriptor};
use crate::field::reference::ensure_reference_id;
use crate::options::extract::is_select_like;

/// Eligible form controls in document order.
pub fn scan_controls(doc: &Document) -> Vec<NodeId> {
    doc.all_elements()
        .into_iter()
        .filter(|n| is_candidate_control(doc, *n))
        .collect()
}

/// Scan the document, attaching a reference id to every eligible control.
///
/// Ids already present are reused, so scanning twice yields the same ids.
pub fn scan_fields(doc: &mut Document) -> Vec<FieldDescriptor> {
    let controls = scan_controls(doc);
    let ids: Vec<(NodeId, String)> = controls
        .into_iter()
        .map(|n| (n, ensure_reference_id(doc, n)))
        .collect();

    let fields: Vec<FieldDescriptor> = ids
        .iter()
        .map(|(node, id)| build_descriptor(doc, *node, id))
        .collect();
    debug!(count = fields.len(), "scanned form fields");
    fields
}

pub fn is_candidate_control(doc: &Document, node: NodeId) -> bool {
    let tag = doc.tag(node);
    if tag != "input" && tag != "textarea" && tag != "select" {
        return false;
    }

    let input_type = doc.attr(node, "type").map(str::to_lowercase);
    if tag == "input" && !is_fillable_input_type(input_type.as_deref()) {
        return false;
    }

    if doc.has_attr(node, "disabled") {
        return false;
    }
    // Custom dropdowns often render a readonly input as their trigger.
    if doc.has_attr(node, "readonly") && !is_select_like(doc, node) {
        return false;
    }
    if is_captcha(doc, node) {
        return false;
    }

    let is_file = input_type.as_deref() == Some("file");
    is_file || doc.is_visible(node)
}

fn is_fillable_input_type(input_type: Option<&str>) -> bool {
    match input_type {
        // Textual inputs
        None
        | Some("")
        | Some("text")
        | Some("email")
        | Some("password")
        | Some("search")
        | Some("number")
        | Some("tel")
        | Some("url")
        | Some("date")
        | Some("time")
        | Some("month")
        | Some("week")
        | Some("datetime-local")

        // Choice and upload inputs
        | Some("radio")
        | Some("checkbox")
        | Some("file") => true,

        // Buttons, hidden inputs and unknown types
        _ => false,
    }
}

fn is_captcha(doc: &Document, node: NodeId) -> bool {
    ["id", "name", "class"].iter().any(|attr| {
        doc.attr(node, attr)
            .is_some_and(|v| v.to_lowercase().contains("captcha"))
    })
}
