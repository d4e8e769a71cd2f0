use std::fmt;

use serde::Serialize;

use crate::dom::document::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Input,
    Change,
    Blur,
    MouseDown,
    MouseUp,
    Click,
    KeyDown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Input => write!(f, "input"),
            EventKind::Change => write!(f, "change"),
            EventKind::Blur => write!(f, "blur"),
            EventKind::MouseDown => write!(f, "mousedown"),
            EventKind::MouseUp => write!(f, "mouseup"),
            EventKind::Click => write!(f, "click"),
            EventKind::KeyDown(key) => write!(f, "keydown:{}", key),
        }
    }
}
