use crate::context::clean::{clean_label_text, clean_question_text, is_question_like, text_without};
use crate::context::label::nearby_headings;
use crate::dom::{Document, NodeId};

const QUESTION_LEVELS: usize = 5;
const MAX_CONTAINER_QUESTION_LEN: usize = 200;

const QUESTION_CLASSES: &[&str] = &[
    "question-text",
    "application-label",
    "field-label",
    "form-label",
    "question-label",
];
const QUESTION_CONTAINER_FRAGMENTS: &[&str] = &["question", "form-section", "field-group"];

/// The question a radio or checkbox group answers, distinct from the
/// individual option's own label. Other controls have no group question.
pub fn extract_group_question(
    doc: &Document,
    control: NodeId,
    immediate_label: Option<&str>,
) -> Option<String> {
    let input_type = doc.attr(control, "type").unwrap_or("").to_lowercase();
    if doc.tag(control) != "input" || !matches!(input_type.as_str(), "radio" | "checkbox") {
        return None;
    }

    if input_type == "radio" {
        if let Some(legend) = fieldset_legend(doc, control, immediate_label) {
            return Some(legend);
        }
    }

    if let Some(question) = question_from_ancestors(doc, control, immediate_label) {
        return Some(question);
    }

    nearby_headings(doc, control).into_iter().find_map(|h| {
        let text = doc.text_content(h);
        if is_question_like(&text) {
            clean_question_text(&text, immediate_label)
        } else {
            None
        }
    })
}

fn same_text(a: &str, b: Option<&str>) -> bool {
    b.is_some_and(|b| a.trim().eq_ignore_ascii_case(b.trim()))
}

fn fieldset_legend(doc: &Document, control: NodeId, label: Option<&str>) -> Option<String> {
    let fieldset = doc.closest(control, |d, n| d.tag(n) == "fieldset")?;
    let legend = doc
        .element_children(fieldset)
        .into_iter()
        .find(|c| doc.tag(*c) == "legend")?;
    let text = clean_label_text(&doc.text_content(legend))?;
    if same_text(&text, label) {
        return None;
    }
    Some(text)
}

fn question_from_ancestors(doc: &Document, control: NodeId, label: Option<&str>) -> Option<String> {
    for ancestor in doc.ancestors(control).into_iter().take(QUESTION_LEVELS) {
        let marked = doc.find_descendants(ancestor, |d, n| {
            QUESTION_CLASSES.iter().any(|c| d.has_class(n, c))
        });
        for node in marked {
            if doc.contains(node, control) {
                continue;
            }
            let raw = doc.text_content(node);
            if !is_question_like(&raw) {
                continue;
            }
            match clean_question_text(&raw, label) {
                Some(cleaned) if !same_text(&cleaned, label) => return Some(cleaned),
                _ => {
                    if let Some(text) = clean_label_text(&raw) {
                        return Some(text);
                    }
                }
            }
        }

        let class = doc.class_name(ancestor).to_lowercase();
        let is_container = QUESTION_CONTAINER_FRAGMENTS.iter().any(|f| class.contains(f))
            || matches!(doc.tag(ancestor), "h1" | "h2" | "h3" | "h4" | "h5" | "h6");
        if is_container {
            let text = text_without(doc, ancestor, control);
            if is_question_like(&text) && text.trim().len() < MAX_CONTAINER_QUESTION_LEN {
                if let Some(cleaned) = clean_question_text(&text, label) {
                    return Some(cleaned);
                }
            }
        }
    }
    None
}
