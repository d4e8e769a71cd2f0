use tracing::trace;

use crate::dom::{Document, EventKind, NodeId};
use crate::fill::clock::{Clock, Timings};
use crate::options::extract::{Framework, SelectOption, interactive_element, owned_listbox};

/// Element carrying the expanded state: the first of the control, its
/// ancestors and the interactive element's descendants with
/// `aria-controls`, else the interactive element.
fn expansion_target(doc: &Document, control: NodeId, interactive: NodeId) -> NodeId {
    std::iter::once(control)
        .chain(doc.ancestors(control))
        .take_while(|n| doc.contains(interactive, *n) || *n == control)
        .chain(doc.descendants(interactive))
        .find(|n| doc.has_attr(*n, "aria-controls"))
        .unwrap_or(interactive)
}

pub fn is_expanded(doc: &Document, node: NodeId) -> bool {
    doc.attr(node, "aria-expanded") == Some("true")
}

/// Mouse sequence a real user produces.
pub fn click(doc: &mut Document, node: NodeId) {
    doc.dispatch(node, EventKind::MouseDown);
    doc.dispatch(node, EventKind::MouseUp);
    doc.dispatch(node, EventKind::Click);
}

/// Open a custom widget unless it already reports itself expanded.
/// Returns the node that owns the expanded state.
pub fn open(doc: &mut Document, control: NodeId, framework: Framework) -> NodeId {
    let interactive = interactive_element(doc, control, framework);
    let target = expansion_target(doc, control, interactive);
    if is_expanded(doc, target) {
        trace!(framework = %framework, "widget already open");
        return target;
    }
    click(doc, target);
    target
}

/// Poll `scan` for rendered options until some appear or the observation
/// window closes. Widgets that render asynchronously show up on a later scan.
pub fn observe_options<F>(clock: &dyn Clock, timings: &Timings, mut scan: F) -> Vec<SelectOption>
where
    F: FnMut() -> Vec<SelectOption>,
{
    let deadline = clock.now() + timings.dropdown_observe();
    let mut options = scan();

    while options.is_empty() && clock.now() < deadline {
        clock.sleep(timings.dropdown_poll());
        options = scan();
    }
    options
}

/// Best-effort close with Escape, only if the widget is still open.
pub fn close(doc: &mut Document, expansion: NodeId) {
    let listbox_open = owned_listbox(doc, expansion).is_some_and(|l| doc.is_visible(l));
    if is_expanded(doc, expansion) || listbox_open {
        doc.dispatch(expansion, EventKind::KeyDown("Escape".to_string()));
    }
}
