use serde::Serialize;
use tracing::{debug, trace};

use crate::dom::{Document, EventKind, NodeId};
use crate::field::descriptor::strip_value_prefix;
use crate::fill::clock::{Clock, Timings};
use crate::options::extract::{Framework, SelectOption, custom_options, detect_framework, native_options};
use crate::options::fuzzy::best_match;
use crate::options::synonyms::{keyword_groups_for, preference_groups};
use crate::options::widget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    Filled,
    AlreadySelected,
    NoMatch,
    NoOptions,
    NoControl,
}

/// How an option was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Keyword,
    WordOverlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMatch {
    pub index: usize,
    pub kind: MatchKind,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn exact_match(options: &[SelectOption], candidate: &str) -> Option<usize> {
    let candidate = normalize(candidate);
    options.iter().position(|o| {
        normalize(&o.text) == candidate
            || normalize(&o.value) == candidate
            || normalize(strip_value_prefix(&o.value)) == candidate
    })
}

fn keyword_match(options: &[SelectOption], candidate: &str) -> Option<usize> {
    for keywords in keyword_groups_for(candidate) {
        let hit = options.iter().position(|o| {
            let text = normalize(&o.text);
            keywords.iter().any(|k| text.contains(k))
        });
        if hit.is_some() {
            return hit;
        }
    }
    None
}

fn significant_words(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_string)
        .collect()
}

fn word_overlap_match(options: &[SelectOption], candidate: &str) -> Option<usize> {
    let wanted = significant_words(candidate);
    if wanted.is_empty() {
        return None;
    }
    let mut best: Option<(usize, usize)> = None;
    for (index, option) in options.iter().enumerate() {
        let words = significant_words(&option.text);
        let overlap = wanted.iter().filter(|w| words.contains(w)).count();
        if overlap > 0 && best.is_none_or(|(_, current)| overlap > current) {
            best = Some((index, overlap));
        }
    }
    best.map(|(index, _)| index)
}

/// Pick the option for `logical_value`.
///
/// Each `|` entry is tried in priority order and the first entry that
/// matches at all wins. Within one entry every strategy runs over all of
/// its phrasings before the next, looser strategy, so a canonical key's
/// exact synonym beats a fuzzy hit on another of its synonyms.
pub fn match_option(options: &[SelectOption], logical_value: &str) -> Option<OptionMatch> {
    if options.is_empty() {
        return None;
    }
    preference_groups(logical_value)
        .iter()
        .find_map(|group| match_group(options, group))
}

fn match_group(options: &[SelectOption], candidates: &[String]) -> Option<OptionMatch> {
    let found = |kind: MatchKind, index: usize| Some(OptionMatch { index, kind });

    if let Some(index) = candidates.iter().find_map(|c| exact_match(options, c)) {
        return found(MatchKind::Exact, index);
    }
    for candidate in candidates {
        let keys = options.iter().map(|o| (o.text.as_str(), o.value.as_str()));
        if let Some((index, _)) = best_match(candidate, keys) {
            return found(MatchKind::Fuzzy, index);
        }
    }
    if let Some(index) = candidates.iter().find_map(|c| keyword_match(options, c)) {
        return found(MatchKind::Keyword, index);
    }
    if let Some(index) = candidates.iter().find_map(|c| word_overlap_match(options, c)) {
        return found(MatchKind::WordOverlap, index);
    }
    None
}

// ============================================================================
// Writing
// ============================================================================

/// Text a custom widget currently shows as its selection.
fn displayed_text(doc: &Document, control: NodeId) -> String {
    if doc.tag(control) == "input" {
        doc.value(control).trim().to_string()
    } else {
        crate::context::clean::collapse_whitespace(&doc.text_content(control))
    }
}

fn fill_native(doc: &mut Document, control: NodeId, logical_value: &str) -> FillOutcome {
    let options = native_options(doc, control);
    if options.is_empty() {
        return FillOutcome::NoOptions;
    }
    let Some(chosen) = match_option(&options, logical_value) else {
        return FillOutcome::NoMatch;
    };
    let option = &options[chosen.index];
    if doc.value(control) == option.value {
        return FillOutcome::AlreadySelected;
    }
    doc.set_value(control, &option.value);
    doc.dispatch(control, EventKind::Change);
    trace!(value = %option.value, kind = ?chosen.kind, "native option selected");
    FillOutcome::Filled
}

fn fill_custom(
    doc: &mut Document,
    control: NodeId,
    framework: Framework,
    logical_value: &str,
    clock: &dyn Clock,
    timings: &Timings,
) -> FillOutcome {
    // Leave a widget alone when it already shows an exact answer.
    let shown = displayed_text(doc, control);
    if !shown.is_empty() {
        let current = [SelectOption {
            text: shown.clone(),
            value: shown,
            node: None,
        }];
        if match_option(&current, logical_value).is_some_and(|m| m.kind == MatchKind::Exact) {
            return FillOutcome::AlreadySelected;
        }
    }

    let expansion = widget::open(doc, control, framework);
    let options = widget::observe_options(clock, timings, || custom_options(doc, control, framework));

    let outcome = if options.is_empty() {
        debug!(framework = %framework, "no options rendered before timeout");
        FillOutcome::NoOptions
    } else {
        match match_option(&options, logical_value) {
            None => FillOutcome::NoMatch,
            Some(chosen) => {
                let option = &options[chosen.index];
                if displayed_text(doc, control).eq_ignore_ascii_case(option.text.trim()) {
                    FillOutcome::AlreadySelected
                } else {
                    select_custom_option(doc, control, option);
                    trace!(text = %option.text, kind = ?chosen.kind, "custom option selected");
                    FillOutcome::Filled
                }
            }
        }
    };

    widget::close(doc, expansion);
    outcome
}

fn select_custom_option(doc: &mut Document, control: NodeId, option: &SelectOption) {
    match option.node {
        Some(node) => widget::click(doc, node),
        None => doc.set_value(control, &option.text),
    }
    // Widgets that do not mirror the choice into their input get it written.
    if doc.tag(control) == "input" && doc.value(control) != option.text {
        doc.set_value(control, &option.text);
    }
    doc.dispatch(control, EventKind::Input);
    doc.dispatch(control, EventKind::Change);
    doc.dispatch(control, EventKind::Blur);
}

/// Select the option of a native or custom dropdown that best matches
/// `logical_value`. Never fails: anything that cannot proceed is reported
/// through the outcome and leaves the page untouched.
pub fn fill_select_like(
    doc: &mut Document,
    control: NodeId,
    logical_value: &str,
    context_label: Option<&str>,
    clock: &dyn Clock,
    timings: &Timings,
) -> FillOutcome {
    if !doc.contains_node(control) || !doc.is_element(control) {
        return FillOutcome::NoControl;
    }
    if doc.has_attr(control, "disabled") || !doc.is_visible(control) {
        return FillOutcome::NoOptions;
    }

    let framework = detect_framework(doc, control);
    let outcome = if framework == Framework::Native {
        fill_native(doc, control, logical_value)
    } else {
        fill_custom(doc, control, framework, logical_value, clock, timings)
    };

    debug!(
        label = context_label.unwrap_or(""),
        value = logical_value,
        framework = %framework,
        outcome = ?outcome,
        "select-like fill"
    );
    outcome
}
