use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::pattern::Pattern;

static MARKERS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"[*✱★✯✰]"));
static REQUIRED_MARKERS: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)\(\s*(required|optional)\s*\)|\b(required|optional)\b"));
static EMPTY_PARENS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"\(\s*\)"));
static BOOLEAN_RUNS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)(yes|no|true|false){2,}"));
static BOOLEAN_WORDS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)\b(yes|no|true|false)\b"));
static QUESTION_STARTER: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(r"(?i)\b(please|tell us|describe|what|do you|are you|have you|will you|can you)\b[^.!]*")
});

const QUESTION_KEYWORDS: &[&str] = &[
    "tell us", "describe", "explain", "please", "enter", "provide", "upload", "attach",
    "select", "choose", "indicate", "confirm", "are you", "do you", "have you", "will you",
    "can you", "would you",
];

/// Tags whose text never belongs to a label.
const NON_LABEL_TAGS: &[&str] = &["select", "option", "script", "style", "textarea", "button"];

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip required/optional markers and decoration from a label.
pub fn clean_label_text(raw: &str) -> Option<String> {
    let text = MARKERS.replace_all(raw, "");
    let text = REQUIRED_MARKERS.replace_all(&text, " ");
    let text = collapse_whitespace(&text);
    let text = EMPTY_PARENS.replace_all(&text, "");
    let text = collapse_whitespace(&text);

    if text.is_empty() { None } else { Some(text) }
}

pub fn is_question_like(text: &str) -> bool {
    if text.contains('?') {
        return true;
    }
    let lower = text.to_lowercase();
    QUESTION_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Reduce surrounding text to the question itself: drop the control's own
/// label, boolean option words, and anything after the question.
pub fn clean_question_text(raw: &str, immediate_label: Option<&str>) -> Option<String> {
    let mut text = raw.to_string();

    if let Some(label) = immediate_label.filter(|l| !l.trim().is_empty()) {
        if let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(label.trim()))) {
            text = re.replace_all(&text, " ").into_owned();
        }
    }

    text = MARKERS.replace_all(&text, "").into_owned();
    text = BOOLEAN_RUNS.replace_all(&text, " ").into_owned();
    text = BOOLEAN_WORDS.replace_all(&text, " ").into_owned();

    let focused = match text.find('?') {
        Some(pos) => text[..=pos].to_string(),
        None => QUESTION_STARTER
            .find(&text)
            .map(str::to_string)
            .unwrap_or(text),
    };

    let cleaned = collapse_whitespace(&focused);
    let cleaned = cleaned.trim_end_matches([',', ';']).trim().to_string();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Text of `node`'s subtree, skipping the `skip` subtree and any option
/// lists, so a container's text does not absorb its own controls.
pub fn text_without(doc: &Document, node: NodeId, skip: NodeId) -> String {
    let mut out = String::new();
    collect(doc, node, skip, &mut out);
    out
}

fn collect(doc: &Document, node: NodeId, skip: NodeId, out: &mut String) {
    if node == skip {
        return;
    }
    if doc.is_element(node) {
        if NON_LABEL_TAGS.contains(&doc.tag(node)) {
            return;
        }
        for child in doc.children(node) {
            collect(doc, *child, skip, out);
        }
    } else {
        out.push(' ');
        out.push_str(&doc.text_content(node));
    }
}
