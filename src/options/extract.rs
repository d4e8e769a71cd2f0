use std::fmt;

use serde::Serialize;

use crate::dom::{Document, NodeId};

/// Number of ancestors inspected when looking for widget markers.
pub const ANCESTOR_DEPTH: usize = 3;

const NATIVE_PLACEHOLDER_OPTION: &str = "select an option...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
    /// Clickable node for custom widgets.
    #[serde(skip)]
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Native,
    Aria,
    ReactSelect,
    Mui,
    Ant,
    Choices,
    Select2,
    Fallback,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Framework::Native => "native",
            Framework::Aria => "aria",
            Framework::ReactSelect => "react-select",
            Framework::Mui => "mui",
            Framework::Ant => "ant",
            Framework::Choices => "choices",
            Framework::Select2 => "select2",
            Framework::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

impl Framework {
    /// Class fragments marking the interactive element of this widget.
    fn control_markers(&self) -> &'static [&'static str] {
        match self {
            Framework::ReactSelect => &["react-select__control", "select__control"],
            Framework::Mui => &["MuiSelect-root"],
            Framework::Ant => &["ant-select-selector", "ant-select-selection__rendered"],
            Framework::Choices => &["choices__inner"],
            Framework::Select2 => &["select2-selection"],
            Framework::Native | Framework::Aria | Framework::Fallback => &[],
        }
    }

    /// Class fragments marking rendered options.
    fn option_markers(&self) -> &'static [&'static str] {
        match self {
            Framework::ReactSelect => &["react-select__option", "select__option"],
            Framework::Mui => &["MuiMenuItem-root"],
            Framework::Ant => &["ant-select-item-option", "ant-select-dropdown-menu-item"],
            Framework::Choices => &["choices__item--choice"],
            Framework::Select2 => &["select2-results__option"],
            Framework::Native | Framework::Aria | Framework::Fallback => &[],
        }
    }
}

const CUSTOM_FRAMEWORKS: &[Framework] = &[
    Framework::ReactSelect,
    Framework::Mui,
    Framework::Ant,
    Framework::Choices,
    Framework::Select2,
];

fn has_class_fragment(doc: &Document, node: NodeId, fragment: &str) -> bool {
    doc.class_name(node)
        .split_whitespace()
        .any(|c| c.contains(fragment))
}

fn has_listbox_role(doc: &Document, node: NodeId) -> bool {
    matches!(doc.attr(node, "role"), Some("combobox") | Some("listbox"))
}

/// The control and its nearest ancestors, closest first.
fn marker_scope(doc: &Document, control: NodeId) -> Vec<NodeId> {
    std::iter::once(control)
        .chain(doc.ancestors(control).into_iter().take(ANCESTOR_DEPTH))
        .collect()
}

// ============================================================================
// Detection
// ============================================================================

/// True for native selects and for anything that behaves like one.
pub fn is_select_like(doc: &Document, node: NodeId) -> bool {
    if doc.tag(node) == "select" || has_listbox_role(doc, node) {
        return true;
    }
    if matches!(doc.attr(node, "aria-haspopup"), Some("true") | Some("listbox")) {
        return true;
    }
    if doc.attr(node, "aria-autocomplete") == Some("list") {
        return true;
    }
    let id = doc.attr(node, "id").unwrap_or("").to_lowercase();
    id.contains("select") || doc.class_name(node).to_lowercase().contains("select")
}

pub fn detect_framework(doc: &Document, control: NodeId) -> Framework {
    if doc.tag(control) == "select" {
        return Framework::Native;
    }
    let scope = marker_scope(doc, control);
    for framework in CUSTOM_FRAMEWORKS {
        let marked = scope.iter().any(|n| {
            framework
                .control_markers()
                .iter()
                .any(|m| has_class_fragment(doc, *n, m))
        });
        if marked {
            return *framework;
        }
    }
    if scope.iter().any(|n| has_listbox_role(doc, *n)) {
        return Framework::Aria;
    }
    Framework::Fallback
}

/// Element that receives the opening click: the nearest framework-marked
/// element, or the control itself.
pub fn interactive_element(doc: &Document, control: NodeId, framework: Framework) -> NodeId {
    marker_scope(doc, control)
        .into_iter()
        .find(|n| {
            framework
                .control_markers()
                .iter()
                .any(|m| has_class_fragment(doc, *n, m))
        })
        .unwrap_or(control)
}

/// Listbox referenced through `aria-controls` or `aria-owns` from the control
/// or its nearest ancestors.
pub fn owned_listbox(doc: &Document, control: NodeId) -> Option<NodeId> {
    marker_scope(doc, control).into_iter().find_map(|n| {
        let id = doc
            .attr(n, "aria-controls")
            .or_else(|| doc.attr(n, "aria-owns"))?;
        doc.get_element_by_id(id)
    })
}

// ============================================================================
// Extraction
// ============================================================================

fn option_text(doc: &Document, node: NodeId) -> String {
    crate::context::clean::collapse_whitespace(&doc.text_content(node))
}

pub fn native_options(doc: &Document, select: NodeId) -> Vec<SelectOption> {
    doc.find_descendants(select, |d, n| d.tag(n) == "option")
        .into_iter()
        .map(|n| SelectOption {
            text: option_text(doc, n),
            value: doc.option_value(n),
            node: Some(n),
        })
        .filter(|o| !o.value.is_empty() && o.text.to_lowercase() != NATIVE_PLACEHOLDER_OPTION)
        .collect()
}

fn to_custom_option(doc: &Document, node: NodeId) -> SelectOption {
    let text = option_text(doc, node);
    let value = doc
        .attr(node, "data-value")
        .or_else(|| doc.attr(node, "value"))
        .map(str::to_string)
        .unwrap_or_else(|| text.clone());
    SelectOption {
        text,
        value,
        node: Some(node),
    }
}

fn is_option_node(doc: &Document, node: NodeId, framework: Framework) -> bool {
    doc.attr(node, "role") == Some("option")
        || framework
            .option_markers()
            .iter()
            .any(|m| has_class_fragment(doc, node, m))
}

/// Children of a visible list whose element children share one tag.
fn homogeneous_list_items(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let lists = std::iter::once(root)
        .chain(doc.descendants(root))
        .filter(|n| matches!(doc.tag(*n), "ul" | "ol") || doc.attr(*n, "role") == Some("listbox"));

    for list in lists {
        if !doc.is_visible(list) {
            continue;
        }
        let items = doc.element_children(list);
        let Some(first) = items.first() else {
            continue;
        };
        let tag = doc.tag(*first);
        if items.len() >= 2 && items.iter().all(|i| doc.tag(*i) == tag) {
            return items;
        }
    }
    Vec::new()
}

/// Visible options currently rendered for a custom widget. The owned listbox
/// is searched first, then the whole document.
pub fn custom_options(doc: &Document, control: NodeId, framework: Framework) -> Vec<SelectOption> {
    let collect = |root: NodeId| -> Vec<SelectOption> {
        let mut nodes: Vec<NodeId> = std::iter::once(root)
            .chain(doc.descendants(root))
            .filter(|n| is_option_node(doc, *n, framework) && doc.is_visible(*n))
            .collect();
        if nodes.is_empty() && framework == Framework::Fallback {
            nodes = homogeneous_list_items(doc, root);
        }
        nodes
            .into_iter()
            .filter(|n| doc.attr(*n, "aria-disabled") != Some("true"))
            .map(|n| to_custom_option(doc, n))
            .filter(|o| !o.text.is_empty())
            .collect()
    };

    if let Some(listbox) = owned_listbox(doc, control) {
        let options = collect(listbox);
        if !options.is_empty() {
            return options;
        }
    }
    // Without a marker, a list elsewhere on the page is a guess.
    if framework == Framework::Fallback {
        return Vec::new();
    }
    collect(doc.root())
}
