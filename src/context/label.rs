use tracing::trace;

use crate::context::clean::{clean_label_text, is_question_like, text_without};
use crate::dom::{Document, NodeId};

const SIBLING_LEVELS: usize = 3;
const QUESTION_ANCESTOR_LEVELS: usize = 5;
const NEARBY_LEVELS: usize = 10;

/// Container classes that mark the container itself as the label.
const CONTAINER_LABEL_CLASSES: &[&str] =
    &["application-label", "field-label", "form-label", "question-label"];

/// Best human-readable label for a form control.
///
/// Strategies run in order and the first that yields non-empty cleaned text
/// wins. `None` is a normal outcome for unlabeled controls.
pub fn extract_label(doc: &Document, control: NodeId) -> Option<String> {
    let strategies: [(&str, fn(&Document, NodeId) -> Option<String>); 5] = [
        ("for-attribute", explicit_label),
        ("sibling-label", sibling_label),
        ("enclosing-label", enclosing_label),
        ("question-ancestor", question_ancestor),
        ("nearby-heading", nearby_heading),
    ];

    for (name, strategy) in strategies {
        if let Some(label) = strategy(doc, control) {
            trace!(strategy = name, label = %label, "label resolved");
            return Some(label);
        }
    }
    None
}

fn explicit_label(doc: &Document, control: NodeId) -> Option<String> {
    let id = doc.attr(control, "id").filter(|id| !id.is_empty())?;
    let label = doc.find_first(|d, n| d.tag(n) == "label" && d.attr(n, "for") == Some(id))?;
    clean_label_text(&doc.text_content(label))
}

fn is_label_like(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == "label"
        || doc
            .class_name(node)
            .split_whitespace()
            .any(|c| c.to_lowercase().contains("label"))
}

fn wraps_other_control(doc: &Document, node: NodeId) -> bool {
    !doc.find_descendants(node, |d, n| matches!(d.tag(n), "input" | "select" | "textarea"))
        .is_empty()
}

fn sibling_label(doc: &Document, control: NodeId) -> Option<String> {
    for container in doc.ancestors(control).into_iter().take(SIBLING_LEVELS) {
        for sibling in doc.element_children(container) {
            if doc.contains(sibling, control) || !is_label_like(doc, sibling) {
                continue;
            }
            // A label bound to some other control is not ours.
            if let Some(target) = doc.attr(sibling, "for") {
                if doc.attr(control, "id") != Some(target) {
                    continue;
                }
            }
            if wraps_other_control(doc, sibling) {
                continue;
            }
            if let Some(text) = clean_label_text(&doc.text_content(sibling)) {
                return Some(text);
            }
        }

        let container_is_label = CONTAINER_LABEL_CLASSES
            .iter()
            .any(|c| doc.has_class(container, c));
        if container_is_label {
            if let Some(text) = clean_label_text(&text_without(doc, container, control)) {
                return Some(text);
            }
        }
    }
    None
}

fn enclosing_label(doc: &Document, control: NodeId) -> Option<String> {
    for ancestor in doc.ancestors(control) {
        if doc.tag(ancestor) == "label" {
            if let Some(text) = clean_label_text(&text_without(doc, ancestor, control)) {
                return Some(text);
            }
        }
        let child_label = doc
            .element_children(ancestor)
            .into_iter()
            .find(|c| doc.tag(*c) == "label" && !doc.has_attr(*c, "for"));
        if let Some(label) = child_label {
            if let Some(text) = clean_label_text(&doc.text_content(label)) {
                return Some(text);
            }
        }
    }
    None
}

fn question_ancestor(doc: &Document, control: NodeId) -> Option<String> {
    doc.ancestors(control)
        .into_iter()
        .take(QUESTION_ANCESTOR_LEVELS)
        .filter(|a| doc.tag(*a) != "label" && doc.tag(*a) != "form")
        .find_map(|a| {
            let text = text_without(doc, a, control);
            if is_question_like(&text) { clean_label_text(&text) } else { None }
        })
}

pub(crate) fn is_heading_like(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag(node), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
        || doc.attr(node, "role") == Some("heading")
        || doc.has_class(node, "question")
        || doc.has_class(node, "field-label")
        || doc.has_class(node, "form-question")
}

/// Question-shaped headings near `control`, nearest container first.
pub(crate) fn nearby_headings(doc: &Document, control: NodeId) -> Vec<NodeId> {
    let mut seen = Vec::new();
    for ancestor in doc.ancestors(control).into_iter().take(NEARBY_LEVELS) {
        for heading in doc.find_descendants(ancestor, is_heading_like) {
            if !doc.contains(heading, control) && !seen.contains(&heading) {
                seen.push(heading);
            }
        }
    }
    seen
}

fn nearby_heading(doc: &Document, control: NodeId) -> Option<String> {
    nearby_headings(doc, control).into_iter().find_map(|h| {
        let text = doc.text_content(h);
        if is_question_like(&text) { clean_label_text(&text) } else { None }
    })
}
