use uuid::Uuid;

use crate::dom::{Document, NodeId};

/// Attribute caching a control's reference id across scans.
pub const REFERENCE_ATTR: &str = "data-autofill-id";

/// Return the control's reference id, minting and attaching one on first use.
pub fn ensure_reference_id(doc: &mut Document, node: NodeId) -> String {
    if let Some(existing) = doc.attr(node, REFERENCE_ATTR).filter(|v| !v.is_empty()) {
        return existing.to_string();
    }
    let id = Uuid::new_v4().to_string();
    doc.set_attr(node, REFERENCE_ATTR, &id);
    id
}

/// Re-locate a control. `None` when the control has left the document.
pub fn find_by_reference(doc: &Document, reference_id: &str) -> Option<NodeId> {
    if reference_id.is_empty() {
        return None;
    }
    doc.find_first(|d, n| d.attr(n, REFERENCE_ATTR) == Some(reference_id))
}
