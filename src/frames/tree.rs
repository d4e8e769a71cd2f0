use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::dom::{Document, NodeId, PageSnapshot, SnapshotNode};
use crate::frames::identity::{frame_fingerprint, injected_frame_name};
use crate::frames::state::AutofillState;

/// Id of the marker element injected into agent-less frames.
pub const INJECTION_MARKER_ID: &str = "iframe-wrapper";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Top,
    SameOrigin,
    CrossOrigin,
    Srcdoc,
    AboutBlank,
    /// Opaque origin: `data:` URLs and the like.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    HasAgent,
    Injected,
    AlreadyInjected,
    InjectionFailed,
    CrossOriginBlocked,
}

impl FrameStatus {
    /// The frame will hear `BEGIN_AUTOFILL`.
    pub fn is_reachable(&self) -> bool {
        matches!(
            self,
            FrameStatus::HasAgent | FrameStatus::Injected | FrameStatus::AlreadyInjected
        )
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrameStatus::HasAgent => "has_agent",
            FrameStatus::Injected => "injected",
            FrameStatus::AlreadyInjected => "already_injected",
            FrameStatus::InjectionFailed => "injection_failed",
            FrameStatus::CrossOriginBlocked => "cross_origin_blocked",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    /// Frame identity carried in messages.
    pub name: String,
    pub url: Option<String>,
    pub kind: FrameKind,
    pub status: FrameStatus,
    pub parent: Option<FrameId>,
    /// The `<iframe>` element in the parent document.
    pub host: Option<NodeId>,
    pub document: Option<Document>,
    pub state: AutofillState,
    /// Parent-document mutation count when its iframes were last listed.
    seen_mutations: Option<u64>,
}

impl Frame {
    pub fn is_reachable(&self) -> bool {
        self.parent.is_none() || self.status.is_reachable()
    }
}

/// Every frame of a page, the top frame first.
#[derive(Debug, Clone)]
pub struct FrameTree {
    frames: Vec<Frame>,
}

impl FrameTree {
    pub fn from_page(page: &PageSnapshot) -> Self {
        let document = Document::from_page(page);
        let name = frame_fingerprint(&document.markup(document.root()));
        let top = Frame {
            id: FrameId(0),
            name,
            url: page.url.clone(),
            kind: FrameKind::Top,
            status: FrameStatus::HasAgent,
            parent: None,
            host: None,
            document: Some(document),
            state: AutofillState::Idle,
            seen_mutations: None,
        };
        Self { frames: vec![top] }
    }

    pub fn top(&self) -> FrameId {
        FrameId(0)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id.0)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn document(&self, id: FrameId) -> Option<&Document> {
        self.frame(id).and_then(|f| f.document.as_ref())
    }

    pub fn document_mut(&mut self, id: FrameId) -> Option<&mut Document> {
        self.frame_mut(id).and_then(|f| f.document.as_mut())
    }

    fn is_known_host(&self, parent: FrameId, host: NodeId) -> bool {
        self.frames
            .iter()
            .any(|f| f.parent == Some(parent) && f.host == Some(host))
    }

    /// True when some reachable document changed since its iframes were
    /// last listed.
    pub fn has_pending_mutations(&self) -> bool {
        self.frames.iter().any(|f| {
            f.is_reachable()
                && f.document
                    .as_ref()
                    .is_some_and(|d| f.seen_mutations != Some(d.mutation_count()))
        })
    }

    /// Register iframes not seen before, walking every reachable document
    /// including frames registered during this call. Returns the new frames.
    pub fn discover(&mut self) -> Vec<FrameId> {
        let mut found = Vec::new();
        let mut index = 0;
        while index < self.frames.len() {
            let parent = FrameId(index);
            index += 1;
            if !self.frames[parent.0].is_reachable() {
                continue;
            }
            let Some(doc) = self.frames[parent.0].document.as_ref() else {
                continue;
            };
            let parent_url = self.frames[parent.0].url.clone();
            let hosts: Vec<NodeId> = doc
                .find_all(|d, n| d.tag(n) == "iframe")
                .into_iter()
                .filter(|h| !self.is_known_host(parent, *h))
                .collect();

            let mut children = Vec::new();
            for host in hosts {
                if let Some(doc) = self.frames[parent.0].document.as_ref() {
                    children.push(describe_child(doc, host, parent_url.as_deref()));
                }
            }
            for child in children {
                let id = self.register(parent, child);
                found.push(id);
            }
            if let Some(frame) = self.frames.get_mut(parent.0) {
                frame.seen_mutations = frame.document.as_ref().map(Document::mutation_count);
            }
        }
        found
    }

    /// Serialize the top page with every frame's current document folded
    /// back into its `<iframe>` host.
    pub fn to_page(&self) -> PageSnapshot {
        let mut documents: Vec<Option<Document>> = self.frames.iter().map(|f| f.document.clone()).collect();
        // Children are always registered after their parent.
        for frame in self.frames.iter().skip(1).rev() {
            let (Some(parent), Some(host)) = (frame.parent, frame.host) else {
                continue;
            };
            let Some(child) = documents[frame.id.0].as_ref() else {
                continue;
            };
            let page = PageSnapshot {
                url: frame.url.clone(),
                root: child.to_snapshot(),
            };
            if let Some(doc) = documents[parent.0].as_mut() {
                doc.set_frame_snapshot(host, page);
            }
        }

        let top = &self.frames[0];
        PageSnapshot {
            url: top.url.clone(),
            root: documents[0].as_ref().map(Document::to_snapshot).unwrap_or_default(),
        }
    }

    fn register(&mut self, parent: FrameId, child: ChildFrame) -> FrameId {
        let id = FrameId(self.frames.len());
        let ChildFrame {
            host,
            url,
            kind,
            sandboxed,
            document,
        } = child;

        let fingerprint = document
            .as_ref()
            .map(|d| frame_fingerprint(&d.markup(d.root())))
            .unwrap_or_else(|| frame_fingerprint(url.as_deref().unwrap_or("")));

        let mut frame = Frame {
            id,
            name: fingerprint.clone(),
            url,
            kind,
            status: FrameStatus::CrossOriginBlocked,
            parent: Some(parent),
            host: Some(host),
            document,
            state: AutofillState::Idle,
            seen_mutations: None,
        };

        frame.status = match kind {
            FrameKind::Srcdoc | FrameKind::AboutBlank => {
                let prefix = if kind == FrameKind::Srcdoc { "srcdoc" } else { "blank" };
                frame.name = injected_frame_name(prefix, &fingerprint);
                if sandboxed {
                    FrameStatus::InjectionFailed
                } else {
                    match frame.document.as_mut() {
                        Some(doc) => inject_listener(doc),
                        None => FrameStatus::InjectionFailed,
                    }
                }
            }
            FrameKind::SameOrigin | FrameKind::CrossOrigin if frame.document.is_some() => {
                FrameStatus::HasAgent
            }
            FrameKind::SameOrigin => FrameStatus::InjectionFailed,
            FrameKind::CrossOrigin | FrameKind::Opaque | FrameKind::Top => {
                FrameStatus::CrossOriginBlocked
            }
        };

        debug!(frame = %frame.name, kind = ?kind, status = %frame.status, "frame discovered");
        if frame.status == FrameStatus::InjectionFailed {
            warn!(frame = %frame.name, "could not reach frame document");
        }
        self.frames.push(frame);
        id
    }
}

// ============================================================================
// Child classification and injection
// ============================================================================

struct ChildFrame {
    host: NodeId,
    url: Option<String>,
    kind: FrameKind,
    sandboxed: bool,
    document: Option<Document>,
}

/// A sandbox without `allow-same-origin` hides the frame's document.
fn is_sandboxed(doc: &Document, host: NodeId) -> bool {
    doc.attr(host, "sandbox")
        .is_some_and(|tokens| !tokens.split_whitespace().any(|t| t == "allow-same-origin"))
}

fn resolve_src(parent_url: Option<&str>, src: &str) -> Option<Url> {
    match parent_url.and_then(|u| Url::parse(u).ok()) {
        Some(base) => base.join(src).ok(),
        None => Url::parse(src).ok(),
    }
}

pub fn classify_frame(doc: &Document, host: NodeId, parent_url: Option<&str>) -> (FrameKind, Option<String>) {
    if doc.has_attr(host, "srcdoc") {
        return (FrameKind::Srcdoc, None);
    }
    let src = doc.attr(host, "src").map(str::trim).unwrap_or("");
    if src.is_empty() || src.eq_ignore_ascii_case("about:blank") {
        return (FrameKind::AboutBlank, Some("about:blank".to_string()));
    }

    let Some(url) = resolve_src(parent_url, src) else {
        // Relative source with no base to resolve it against.
        return (FrameKind::SameOrigin, Some(src.to_string()));
    };
    let origin = url.origin();
    let kind = if !origin.is_tuple() {
        FrameKind::Opaque
    } else {
        match parent_url.and_then(|u| Url::parse(u).ok()) {
            Some(parent) if parent.origin() == origin => FrameKind::SameOrigin,
            Some(_) => FrameKind::CrossOrigin,
            None => FrameKind::CrossOrigin,
        }
    };
    (kind, Some(url.to_string()))
}

fn empty_document() -> Document {
    Document::from_snapshot(&SnapshotNode::element("html").with_child(SnapshotNode::element("body")))
}

fn describe_child(doc: &Document, host: NodeId, parent_url: Option<&str>) -> ChildFrame {
    let (kind, url) = classify_frame(doc, host, parent_url);
    let sandboxed = is_sandboxed(doc, host);
    let document = match doc.frame_snapshot(host) {
        Some(page) => Some(Document::from_page(page)),
        // Local frames always have a document, even if nothing was captured.
        None if matches!(kind, FrameKind::Srcdoc | FrameKind::AboutBlank) => Some(empty_document()),
        None => None,
    };
    ChildFrame {
        host,
        url,
        kind,
        sandboxed,
        document,
    }
}

pub fn has_injection_marker(doc: &Document) -> bool {
    doc.get_element_by_id(INJECTION_MARKER_ID).is_some()
}

/// Add the hidden marker that makes this frame answer `BEGIN_AUTOFILL`.
/// A frame that already carries it is left alone.
pub fn inject_listener(doc: &mut Document) -> FrameStatus {
    if has_injection_marker(doc) {
        return FrameStatus::AlreadyInjected;
    }
    let body = doc.body();
    let marker = SnapshotNode::element("div")
        .with_attr("id", INJECTION_MARKER_ID)
        .with_attr("hidden", "")
        .with_attr("data-autofill-listener", "true");
    doc.append_child(body, &marker);
    FrameStatus::Injected
}
