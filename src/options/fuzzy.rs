//! Weighted approximate search over option labels.
//!
//! Scores run from 0 (perfect) to 1. A key scores the fewest edits needed
//! to find the pattern anywhere in the text, divided by the pattern length,
//! so where the match sits does not matter. Key scores combine as
//! `score ^ (weight * norm)`, with `norm` shrinking for longer texts.

/// Keys scoring above this do not match.
pub const THRESHOLD: f64 = 0.5;
pub const MIN_MATCH_CHARS: usize = 2;
pub const TEXT_WEIGHT: f64 = 0.7;
pub const VALUE_WEIGHT: f64 = 0.3;

const EPSILON: f64 = 1e-3;

/// Minimum edit distance between `pattern` and any substring of `text`.
fn substring_edit_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    // column[i]: distance between pattern[..i] and the best substring ending here
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = column[m];

    for &t in text {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = usize::from(pattern[i - 1] != t);
            column[i] = (diagonal + cost).min(above + 1).min(column[i - 1] + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
    }
    best
}

/// Score of `pattern` against one key, or `None` when it does not match.
pub fn key_score(pattern: &str, text: &str) -> Option<f64> {
    let pattern: Vec<char> = pattern.trim().to_lowercase().chars().collect();
    let text: Vec<char> = text.trim().to_lowercase().chars().collect();
    if pattern.len() < MIN_MATCH_CHARS || text.is_empty() {
        return None;
    }

    let errors = substring_edit_distance(&pattern, &text);
    // Fewer than two pattern characters actually matched.
    if pattern.len().saturating_sub(errors) < MIN_MATCH_CHARS {
        return None;
    }
    let score = errors as f64 / pattern.len() as f64;
    (score <= THRESHOLD).then_some(score)
}

/// Length norm: one over the square root of the token count.
fn field_norm(text: &str) -> f64 {
    let tokens = text.split_whitespace().count().max(1) as f64;
    (1000.0 / tokens.sqrt()).round() / 1000.0
}

/// Combined score of `pattern` over the `(text, weight)` keys of one item.
/// `None` when no key matches.
pub fn item_score(pattern: &str, keys: &[(&str, f64)]) -> Option<f64> {
    let mut total = 1.0;
    let mut matched = false;
    for (text, weight) in keys {
        if let Some(score) = key_score(pattern, text) {
            matched = true;
            let base = if score == 0.0 { EPSILON } else { score };
            total *= base.powf(weight * field_norm(text));
        }
    }
    matched.then_some(total)
}

/// Index of the best option for `pattern`, scoring text and value keys.
/// Ties keep the earlier option.
pub fn best_match<'a, I>(pattern: &str, options: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, (text, value)) in options.into_iter().enumerate() {
        let Some(score) = item_score(pattern, &[(text, TEXT_WEIGHT), (value, VALUE_WEIGHT)]) else {
            continue;
        };
        if best.is_none_or(|(_, current)| score < current) {
            best = Some((index, score));
        }
    }
    best
}
