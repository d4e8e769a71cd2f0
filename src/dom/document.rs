use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::dom::events::{DomEvent, EventKind};
use crate::dom::snapshot::{PageSnapshot, SnapshotNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    value: String,
    checked: bool,
    frame: Option<Box<PageSnapshot>>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed live document.
///
/// Every write bumps the mutation counter, which stands in for a
/// `MutationObserver` when waiting for the page or a dropdown to settle.
/// Dispatched events are recorded in order so callers can assert on them.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    events: Vec<DomEvent>,
    mutations: u64,
}

impl Document {
    pub fn from_snapshot(root: &SnapshotNode) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            events: Vec::new(),
            mutations: 0,
        };
        doc.root = doc.insert(root, None);
        doc.init_form_state();
        doc
    }

    pub fn from_page(page: &PageSnapshot) -> Self {
        Self::from_snapshot(&page.root)
    }

    fn insert(&mut self, snap: &SnapshotNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = if snap.is_text() {
            NodeKind::Text(snap.text.clone().unwrap_or_default())
        } else {
            NodeKind::Element(Element {
                tag: snap.tag.to_ascii_lowercase(),
                attrs: snap.attrs.clone(),
                value: String::new(),
                checked: false,
                frame: snap.frame.clone(),
            })
        };
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }

        if !snap.is_text() {
            if let Some(text) = &snap.text {
                self.insert(&SnapshotNode::text_node(text), Some(id));
            }
            for child in &snap.children {
                self.insert(child, Some(id));
            }
        }
        id
    }

    fn init_form_state(&mut self) {
        for id in self.all_elements() {
            self.init_control_state(id);
        }
    }

    fn init_control_state(&mut self, id: NodeId) {
        let initial = match self.tag(id) {
            "input" => Some((
                self.attr(id, "value").unwrap_or("").to_string(),
                self.attr(id, "checked").is_some(),
            )),
            "textarea" => Some((self.text_content(id), false)),
            "select" => {
                let options = self.find_descendants(id, |d, n| d.tag(n) == "option");
                let selected = options
                    .iter()
                    .copied()
                    .find(|o| self.attr(*o, "selected").is_some())
                    .or_else(|| options.first().copied());
                let value = selected.map(|o| self.option_value(o)).unwrap_or_default();
                Some((value, false))
            }
            _ => None,
        };
        if let Some((value, checked)) = initial {
            if let Some(el) = self.element_mut(id) {
                el.value = value;
                el.checked = checked;
            }
        }
    }

    /// Value of an `<option>`: its `value` attribute, else its trimmed text.
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    // ========================================================================
    // Tree navigation
    // ========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name, or an empty string for text nodes.
    pub fn tag(&self, id: NodeId) -> &str {
        self.element(id).map(|el| el.tag.as_str()).unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Descendant elements of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.is_element(n) {
                out.push(n);
            }
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    pub fn all_elements(&self) -> Vec<NodeId> {
        let mut out = vec![self.root];
        out.extend(self.descendants(self.root));
        out.retain(|n| self.is_element(*n));
        out
    }

    pub fn find_descendants<F>(&self, id: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .filter(|n| pred(self, *n))
            .collect()
    }

    pub fn find_first<F>(&self, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.all_elements().into_iter().find(|n| pred(self, *n))
    }

    pub fn find_all<F>(&self, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.all_elements()
            .into_iter()
            .filter(|n| pred(self, *n))
            .collect()
    }

    /// Nearest inclusive ancestor matching `pred`.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.is_element(*n) && pred(self, *n))
    }

    /// True when `ancestor` is `node` or contains it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).contains(&ancestor)
    }

    pub fn get_element_by_id(&self, html_id: &str) -> Option<NodeId> {
        self.find_first(|d, n| d.attr(n, "id") == Some(html_id))
    }

    pub fn body(&self) -> NodeId {
        self.find_first(|d, n| d.tag(n) == "body")
            .unwrap_or(self.root)
    }

    // ========================================================================
    // Attributes and text
    // ========================================================================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.insert(name.to_string(), value.to_string());
            self.mutations += 1;
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            if el.attrs.remove(name).is_some() {
                self.mutations += 1;
            }
        }
    }

    pub fn class_name(&self, id: NodeId) -> &str {
        self.attr(id, "class").unwrap_or("")
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_name(id).split_whitespace().any(|c| c == class)
    }

    /// Raw concatenated text of every descendant text node, like `textContent`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(t)) => out.push_str(t),
            Some(NodeKind::Element(_)) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        if self.tag(id) == "input" && self.attr(id, "type") == Some("hidden") {
            return false;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|n| !self.is_hidden_node(n))
    }

    fn is_hidden_node(&self, id: NodeId) -> bool {
        if self.has_attr(id, "hidden") || self.attr(id, "aria-hidden") == Some("true") {
            return true;
        }
        let style: String = self
            .attr(id, "style")
            .unwrap_or("")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        style.contains("display:none") || style.contains("visibility:hidden")
    }

    // ========================================================================
    // Form state
    // ========================================================================

    pub fn value(&self, id: NodeId) -> &str {
        self.element(id).map(|el| el.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.value = value.to_string();
            self.mutations += 1;
        }
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).map(|el| el.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(el) = self.element_mut(id) {
            el.checked = checked;
            self.mutations += 1;
        }
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    // ========================================================================
    // Structure edits
    // ========================================================================

    pub fn append_child(&mut self, parent: NodeId, child: &SnapshotNode) -> NodeId {
        let id = self.insert(child, Some(parent));
        for n in std::iter::once(id).chain(self.descendants(id)) {
            self.init_control_state(n);
        }
        self.mutations += 1;
        id
    }

    pub fn frame_snapshot(&self, id: NodeId) -> Option<&PageSnapshot> {
        self.element(id).and_then(|el| el.frame.as_deref())
    }

    pub fn set_frame_snapshot(&mut self, id: NodeId, page: PageSnapshot) {
        if let Some(el) = self.element_mut(id) {
            el.frame = Some(Box::new(page));
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Record an event and run the default action a browser widget would.
    ///
    /// Clicking a control that owns a listbox (`aria-controls`) opens it,
    /// clicking a `role=option` node selects it into its owning control and
    /// closes the listbox, and `Escape` closes an expanded listbox.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) {
        self.events.push(DomEvent {
            target,
            kind: kind.clone(),
        });

        match kind {
            EventKind::Click => self.default_click(target),
            EventKind::KeyDown(key) if key == "Escape" => self.default_escape(target),
            _ => {}
        }
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn events_for(&self, target: NodeId) -> Vec<&EventKind> {
        self.events
            .iter()
            .filter(|e| e.target == target)
            .map(|e| &e.kind)
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn default_click(&mut self, target: NodeId) {
        if let Some(option) = self.closest(target, |d, n| d.attr(n, "role") == Some("option")) {
            self.select_listbox_option(option);
            return;
        }
        if let Some(control) = self.closest(target, |d, n| d.has_attr(n, "aria-controls")) {
            self.set_listbox_open(control, true);
        }
    }

    fn default_escape(&mut self, target: NodeId) {
        let expanded = self.closest(target, |d, n| {
            d.has_attr(n, "aria-controls") && d.attr(n, "aria-expanded") == Some("true")
        });
        if let Some(control) = expanded {
            self.set_listbox_open(control, false);
        }
    }

    fn set_listbox_open(&mut self, control: NodeId, open: bool) {
        let listbox = self
            .attr(control, "aria-controls")
            .map(str::to_string)
            .and_then(|id| self.get_element_by_id(&id));
        if let Some(listbox) = listbox {
            if open {
                self.remove_attr(listbox, "hidden");
            } else {
                self.set_attr(listbox, "hidden", "");
            }
        }
        self.set_attr(control, "aria-expanded", if open { "true" } else { "false" });
    }

    fn select_listbox_option(&mut self, option: NodeId) {
        let text = self.text_content(option).trim().to_string();
        self.set_attr(option, "aria-selected", "true");

        let owner = self.ancestors(option).into_iter().find_map(|a| {
            let listbox_id = self.attr(a, "id")?.to_string();
            self.find_first(|d, n| d.attr(n, "aria-controls") == Some(listbox_id.as_str()))
        });
        if let Some(control) = owner {
            let input = if self.tag(control) == "input" {
                Some(control)
            } else {
                self.find_descendants(control, |d, n| d.tag(n) == "input")
                    .first()
                    .copied()
            };
            if let Some(input) = input {
                self.set_value(input, &text);
            }
            self.set_listbox_open(control, false);
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize the live document back into a snapshot, with current form
    /// state written into attributes.
    pub fn to_snapshot(&self) -> SnapshotNode {
        self.snapshot_node(self.root)
    }

    fn snapshot_node(&self, id: NodeId) -> SnapshotNode {
        let Some(el) = self.element(id) else {
            let text = match self.nodes.get(id.0).map(|n| &n.kind) {
                Some(NodeKind::Text(t)) => t.as_str(),
                _ => "",
            };
            return SnapshotNode::text_node(text);
        };

        let mut attrs = el.attrs.clone();
        let mut children: Vec<SnapshotNode> = Vec::new();
        match el.tag.as_str() {
            "input" => {
                attrs.insert("value".to_string(), el.value.clone());
                if el.checked {
                    attrs.insert("checked".to_string(), String::new());
                } else {
                    attrs.remove("checked");
                }
            }
            "textarea" => {
                return SnapshotNode {
                    tag: el.tag.clone(),
                    attrs,
                    text: (!el.value.is_empty()).then(|| el.value.clone()),
                    children: Vec::new(),
                    frame: None,
                };
            }
            _ => {}
        }

        let select_value = (el.tag == "select").then(|| el.value.clone());
        for child in self.children(id) {
            let mut snap = self.snapshot_node(*child);
            if let Some(selected) = &select_value {
                if snap.tag == "option" {
                    if self.option_value(*child) == *selected {
                        snap.attrs.insert("selected".to_string(), String::new());
                    } else {
                        snap.attrs.remove("selected");
                    }
                }
            }
            children.push(snap);
        }

        SnapshotNode {
            tag: el.tag.clone(),
            attrs,
            text: None,
            children,
            frame: el.frame.clone(),
        }
    }

    /// HTML markup of the subtree rooted at `id`, attributes in sorted order.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(el) = self.element(id) else {
            if let Some(NodeKind::Text(t)) = self.nodes.get(id.0).map(|n| &n.kind) {
                out.push_str(t);
            }
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attrs {
            let _ = write!(out, " {}=\"{}\"", name, value.replace('"', "&quot;"));
        }
        out.push('>');
        for child in self.children(id) {
            self.write_markup(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}
