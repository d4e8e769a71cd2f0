use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dom::{Document, PageSnapshot};
use crate::error::Result;
use crate::fill::clock::Clock;
use crate::frames::bus::{Envelope, MessageBus};
use crate::frames::message::{FrameMessage, parse_message};
use crate::frames::state::AutofillState;
use crate::frames::tree::{FrameId, FrameKind, FrameStatus, FrameTree};

pub const DISCOVERY_ATTEMPTS: usize = 3;
pub const DISCOVERY_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Runs the field pipeline for one frame, given the frame's name.
pub type FrameFill<'a> = dyn FnMut(&str, &mut Document) -> Result<()> + 'a;

#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub name: String,
    pub url: Option<String>,
    pub kind: FrameKind,
    pub status: FrameStatus,
    pub state: AutofillState,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordinationReport {
    pub frames: Vec<FrameReport>,
    /// Frames that reported completion, in arrival order.
    pub completed: Vec<String>,
    pub rejected_messages: usize,
    pub terminal: bool,
}

/// Drives autofill across every frame of a page from the top frame.
pub struct Coordinator<'c> {
    tree: FrameTree,
    bus: MessageBus,
    clock: &'c dyn Clock,
    signalled: HashSet<FrameId>,
    completed: Vec<String>,
    rejected_messages: usize,
    top_done: bool,
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl<'c> Coordinator<'c> {
    pub fn new(page: &PageSnapshot, clock: &'c dyn Clock) -> Self {
        Self {
            tree: FrameTree::from_page(page),
            bus: MessageBus::new(),
            clock,
            signalled: HashSet::new(),
            completed: Vec::new(),
            rejected_messages: 0,
            top_done: false,
        }
    }

    pub fn tree(&self) -> &FrameTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FrameTree {
        &mut self.tree
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    fn top_name(&self) -> String {
        self.tree
            .frame(self.tree.top())
            .map(|f| f.name.clone())
            .unwrap_or_default()
    }

    /// Discover child frames, retrying while none turn up.
    pub fn discover_with_retry(&mut self) -> Vec<FrameId> {
        let mut found = self.tree.discover();
        let mut attempt = 1;
        while found.is_empty() && attempt < DISCOVERY_ATTEMPTS {
            self.clock.sleep(DISCOVERY_RETRY_DELAY);
            found = self.tree.discover();
            attempt += 1;
        }
        found
    }

    /// Post `BEGIN_AUTOFILL` to every reachable frame not yet signalled.
    fn broadcast(&mut self, frames: &[FrameId]) {
        let top = self.tree.top();
        let message = FrameMessage::BeginAutofill {
            from_frame: self.top_name(),
            timestamp: epoch_millis(),
        };
        for id in frames {
            let reachable = self.tree.frame(*id).is_some_and(|f| f.is_reachable());
            if !reachable || !self.signalled.insert(*id) {
                continue;
            }
            self.bus.post(top, *id, &message);
        }
    }

    /// Full orchestration: discover, signal children, fill the top frame,
    /// then let every child run. A failing top frame still lets children run.
    pub fn run(&mut self, fill: &mut FrameFill<'_>) -> Result<CoordinationReport> {
        let top = self.tree.top();
        let top_name = self.top_name();
        self.set_state(top, &top_name, AutofillState::Scanning)?;

        let found = self.discover_with_retry();
        info!(frames = found.len(), "child frames discovered");
        self.broadcast(&found);

        self.set_state(top, &top_name, AutofillState::Filling)?;
        if let Some(doc) = self.tree.document_mut(top) {
            if let Err(e) = fill(&top_name, doc) {
                warn!(frame = %top_name, error = %e, "top frame autofill failed");
            }
        }
        self.set_state(top, &top_name, AutofillState::Done)?;
        self.top_done = true;

        self.deliver(fill)?;
        Ok(self.report())
    }

    /// Pick up iframes added since the last discovery and run them.
    pub fn rescan(&mut self, fill: &mut FrameFill<'_>) -> Result<CoordinationReport> {
        if self.tree.has_pending_mutations() {
            let found = self.tree.discover();
            if !found.is_empty() {
                info!(frames = found.len(), "late frames discovered");
            }
            self.broadcast(&found);
            self.deliver(fill)?;
        }
        Ok(self.report())
    }

    /// Hand every queued message to its recipient until the bus is empty.
    pub fn deliver(&mut self, fill: &mut FrameFill<'_>) -> Result<()> {
        while self.bus.pending() > 0 {
            for recipient in self.bus.recipients() {
                for envelope in self.bus.take_for(recipient) {
                    self.handle(envelope, fill)?;
                }
            }
        }
        Ok(())
    }

    fn set_state(&mut self, id: FrameId, name: &str, to: AutofillState) -> Result<()> {
        if let Some(frame) = self.tree.frame_mut(id) {
            frame.state = frame.state.transition(name, to)?;
        }
        Ok(())
    }

    fn handle(&mut self, envelope: Envelope, fill: &mut FrameFill<'_>) -> Result<()> {
        let message = match parse_message(&envelope.payload) {
            Ok(Some(message)) => message,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "frame message rejected");
                self.rejected_messages += 1;
                return Ok(());
            }
        };

        let top = self.tree.top();
        match message {
            FrameMessage::BeginAutofill { from_frame, .. } if envelope.to != top => {
                debug!(from = %from_frame, "begin autofill received");
                self.run_child(envelope.to, fill)
            }
            FrameMessage::AutofillCompleted { from_frame } if envelope.to == top => {
                if !self.completed.contains(&from_frame) {
                    info!(frame = %from_frame, "frame completed autofill");
                    self.completed.push(from_frame);
                }
                Ok(())
            }
            other => {
                debug!(message = ?other, "message not meant for this frame");
                Ok(())
            }
        }
    }

    /// A child frame runs at most once; later signals are ignored.
    fn run_child(&mut self, id: FrameId, fill: &mut FrameFill<'_>) -> Result<()> {
        let Some(frame) = self.tree.frame_mut(id) else {
            return Ok(());
        };
        let name = frame.name.clone();
        if frame.state != AutofillState::Idle {
            debug!(frame = %name, state = %frame.state, "duplicate begin ignored");
            return Ok(());
        }

        frame.state = frame.state.transition(&name, AutofillState::Scanning)?;
        frame.state = frame.state.transition(&name, AutofillState::Filling)?;
        let result = match frame.document.as_mut() {
            Some(doc) => fill(&name, doc),
            None => Ok(()),
        };
        frame.state = frame.state.transition(&name, AutofillState::Done)?;

        match result {
            Ok(()) => {
                let top = self.tree.top();
                let message = FrameMessage::AutofillCompleted { from_frame: name };
                self.bus.post(id, top, &message);
            }
            Err(e) => warn!(frame = %name, error = %e, "frame autofill failed"),
        }
        Ok(())
    }

    /// Terminal once the top frame is done and a child reported in, or when
    /// no child could be reached at all.
    pub fn is_terminal(&self) -> bool {
        let reachable_children = self
            .tree
            .frames()
            .iter()
            .any(|f| f.parent.is_some() && f.is_reachable());
        self.top_done && (!self.completed.is_empty() || !reachable_children)
    }

    /// True once `run` has filled the top frame.
    pub fn has_run(&self) -> bool {
        self.top_done
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn report(&self) -> CoordinationReport {
        CoordinationReport {
            frames: self
                .tree
                .frames()
                .iter()
                .map(|f| FrameReport {
                    name: f.name.clone(),
                    url: f.url.clone(),
                    kind: f.kind,
                    status: f.status,
                    state: f.state,
                })
                .collect(),
            completed: self.completed.clone(),
            rejected_messages: self.rejected_messages,
            terminal: self.is_terminal(),
        }
    }
}
