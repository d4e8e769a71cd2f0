use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node of a serialized DOM tree, as emitted by the page extractor.
///
/// Text nodes use the tag `#text` and carry their content in `text`. For
/// element nodes `text` is shorthand for a leading text child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
    /// Content document of an `<iframe>`, when the extractor could reach it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Box<PageSnapshot>>,
}

/// A whole page: its URL and the root element (usually `<html>` or `<body>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub root: SnapshotNode,
}

impl SnapshotNode {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn text_node(text: &str) -> Self {
        Self {
            tag: "#text".to_string(),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_child(mut self, child: SnapshotNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SnapshotNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_frame(mut self, page: PageSnapshot) -> Self {
        self.frame = Some(Box::new(page));
        self
    }

    pub fn is_text(&self) -> bool {
        self.tag == "#text"
    }
}

impl PageSnapshot {
    pub fn new(url: Option<&str>, root: SnapshotNode) -> Self {
        Self {
            url: url.map(str::to_string),
            root,
        }
    }
}
