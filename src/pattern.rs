use std::borrow::Cow;

use regex::Regex;
use tracing::error;

/// A compiled regular expression from a static table.
///
/// An invalid source is logged once and then never matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: &'static str,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: &'static str) -> Self {
        let regex = match Regex::new(source) {
            Ok(re) => Some(re),
            Err(e) => {
                error!(pattern = source, error = %e, "invalid static pattern");
                None
            }
        };
        Self { source, regex }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str())
    }

    pub fn replace_all<'t>(&self, text: &'t str, replacement: &str) -> Cow<'t, str> {
        match &self.regex {
            Some(re) => re.replace_all(text, replacement),
            None => Cow::Borrowed(text),
        }
    }
}

/// Compile a table of sources, keeping their order.
pub fn compile(sources: &[&'static str]) -> Vec<Pattern> {
    sources.iter().map(|s| Pattern::new(s)).collect()
}
