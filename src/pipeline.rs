use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{Category, classify_all};
use crate::dom::{Document, PageSnapshot};
use crate::error::Result;
use crate::field::descriptor::{FieldDescriptor, FieldType, MinifiedField};
use crate::field::reference::find_by_reference;
use crate::field::scanner::scan_fields;
use crate::fill::clock::{Clock, Timings};
use crate::fill::ready::{ReadyOutcome, wait_for_page_ready};
use crate::fill::speed::AnimationSpeed;
use crate::fill::writer::{WriteContext, WriteOutcome, WriteStatus, apply_instructions};
use crate::frames::coordinator::{CoordinationReport, Coordinator};
use crate::resolve::handlers::resolve;
use crate::resolve::instruction::{Action, AutofillInstruction};
use crate::resolve::persist::{SaveOutcome, persist};
use crate::resolve::profile::UserPreferenceProfile;
use crate::resolve::store::PreferenceStore;
use crate::slow::SlowResolver;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPass {
    /// Heuristic resolution from the stored profile.
    Fast,
    /// External resolver for what the fast pass left empty.
    Slow,
}

impl fmt::Display for FillPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillPass::Fast => f.write_str("fast"),
            FillPass::Slow => f.write_str("slow"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub reference_id: String,
    pub label: Option<String>,
    pub category: Category,
    pub action: Action,
    pub value: Option<String>,
    pub status: WriteStatus,
    pub pass: FillPass,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub ready: ReadyOutcome,
    pub fast: Vec<FieldReport>,
    /// Fields the fast pass left empty, in scan order.
    pub unfilled: Vec<String>,
    pub slow: Vec<FieldReport>,
}

impl FillReport {
    pub fn fields(&self) -> impl Iterator<Item = &FieldReport> {
        self.fast.iter().chain(self.slow.iter())
    }

    /// Writes that left a new value in the document.
    pub fn filled(&self) -> usize {
        self.fields().filter(|r| r.status == WriteStatus::Filled).count()
    }

    pub fn pending_uploads(&self) -> Vec<&str> {
        self.fields()
            .filter(|r| r.status == WriteStatus::PendingUpload)
            .map(|r| r.reference_id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntry {
    pub reference_id: String,
    pub category: Category,
    pub outcome: SaveOutcome,
}

/// Per-field result of a save pass; partial success is the normal case.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    pub entries: Vec<SaveEntry>,
}

impl SaveReport {
    pub fn saved(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.saved()
    }

    pub fn outcome_for(&self, reference_id: &str) -> Option<&SaveOutcome> {
        self.entries
            .iter()
            .find(|e| e.reference_id == reference_id)
            .map(|e| &e.outcome)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FramesReport {
    pub coordination: CoordinationReport,
    /// Fill report per frame name, in the order frames ran.
    pub frames: Vec<(String, FillReport)>,
    /// The page after filling, child frames folded back in.
    #[serde(skip)]
    pub page: PageSnapshot,
}

// ============================================================================
// Engine
// ============================================================================

/// Scan, classify, resolve and write, for one document or a whole frame tree.
pub struct AutofillEngine<'a> {
    store: &'a dyn PreferenceStore,
    clock: &'a dyn Clock,
    slow: Option<&'a dyn SlowResolver>,
    tracer: Option<&'a TraceLogger>,
    timings: Timings,
    speed: AnimationSpeed,
}

impl<'a> AutofillEngine<'a> {
    pub fn new(store: &'a dyn PreferenceStore, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            clock,
            slow: None,
            tracer: None,
            timings: Timings::default(),
            speed: AnimationSpeed::default(),
        }
    }

    pub fn with_slow_resolver(mut self, slow: &'a dyn SlowResolver) -> Self {
        self.slow = Some(slow);
        self
    }

    pub fn with_tracer(mut self, tracer: &'a TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_speed(mut self, speed: AnimationSpeed) -> Self {
        self.speed = speed;
        self
    }

    fn trace(&self, event: TraceEvent) {
        if let Some(tracer) = self.tracer {
            tracer.log(&event);
        }
    }

    fn load_profile(&self, user_id: &str) -> Result<UserPreferenceProfile> {
        let profile = self.store.load(user_id)?;
        if profile.is_none() {
            info!(user_id, "no stored preferences, resolving against an empty profile");
        }
        Ok(profile.unwrap_or_default())
    }

    /// Fill every eligible field of `doc` for `user_id`.
    pub fn run(&self, doc: &mut Document, user_id: &str) -> Result<FillReport> {
        self.run_in_frame(doc, user_id, None)
    }

    fn run_in_frame(&self, doc: &mut Document, user_id: &str, frame: Option<&str>) -> Result<FillReport> {
        let ready = wait_for_page_ready(self.clock, &self.timings);
        let profile = self.load_profile(user_id)?;

        let fields = scan_fields(doc);
        let categorized = classify_all(&fields);
        let categories: HashMap<&str, Category> = categorized
            .iter()
            .map(|c| (c.descriptor.reference_id.as_str(), c.category))
            .collect();
        let labels: HashMap<&str, Option<&str>> = fields
            .iter()
            .map(|f| (f.reference_id.as_str(), f.label.as_deref()))
            .collect();

        let instructions: Vec<AutofillInstruction> = categorized
            .iter()
            .map(|c| resolve(c.category, &c.descriptor, &profile))
            .collect();

        let ctx = WriteContext {
            clock: self.clock,
            timings: self.timings,
            speed: self.speed,
        };

        let fast_outcomes = apply_instructions(doc, &instructions, &ctx);
        let fast = self.report_pass(FillPass::Fast, frame, &instructions, &fast_outcomes, &categories, &labels);

        let pending = unfilled_fields(doc, &fields, &fast_outcomes);
        let unfilled: Vec<String> = pending.iter().map(|f| f.id.clone()).collect();
        let slow = match self.slow {
            Some(resolver) if !pending.is_empty() => {
                debug!(count = pending.len(), "sending unfilled fields to slow resolver");
                match resolver.resolve(&pending, &profile) {
                    Ok(slow_instructions) => {
                        let outcomes = apply_instructions(doc, &slow_instructions, &ctx);
                        self.report_pass(FillPass::Slow, frame, &slow_instructions, &outcomes, &categories, &labels)
                    }
                    Err(e) => {
                        warn!(error = %e, "slow resolver failed, keeping fast-pass results");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        let report = FillReport {
            ready,
            fast,
            unfilled,
            slow,
        };
        info!(
            fields = fields.len(),
            filled = report.filled(),
            pending_uploads = report.pending_uploads().len(),
            "autofill pass finished"
        );
        Ok(report)
    }

    fn report_pass(
        &self,
        pass: FillPass,
        frame: Option<&str>,
        instructions: &[AutofillInstruction],
        outcomes: &[WriteOutcome],
        categories: &HashMap<&str, Category>,
        labels: &HashMap<&str, Option<&str>>,
    ) -> Vec<FieldReport> {
        instructions
            .iter()
            .zip(outcomes)
            .map(|(instruction, outcome)| {
                let id = instruction.reference_id.as_str();
                let category = categories.get(id).copied().unwrap_or(Category::Unknown);
                let label = labels.get(id).copied().flatten();

                let mut event = TraceEvent::now(TraceKind::Instruction)
                    .with_pass(pass)
                    .with_label(label)
                    .with_category(category)
                    .with_instruction(instruction)
                    .with_outcome(outcome);
                if let Some(frame) = frame {
                    event = event.with_frame(frame);
                }
                self.trace(event);

                FieldReport {
                    reference_id: instruction.reference_id.clone(),
                    label: label.map(str::to_string),
                    category,
                    action: instruction.action,
                    value: instruction.value.as_ref().map(|v| v.to_string()),
                    status: outcome.status,
                    pass,
                }
            })
            .collect()
    }

    /// Persist the current value of every eligible field of `doc`.
    pub fn save(&self, doc: &mut Document, user_id: &str) -> SaveReport {
        let fields = scan_fields(doc);
        let entries: Vec<SaveEntry> = classify_all(&fields)
            .into_iter()
            .map(|c| {
                let outcome = persist(c.category, &c.descriptor, user_id, self.store);
                if let SaveOutcome::Error { error } = &outcome {
                    debug!(reference_id = %c.descriptor.reference_id, category = %c.category, error = %error, "value not saved");
                }
                SaveEntry {
                    reference_id: c.descriptor.reference_id,
                    category: c.category,
                    outcome,
                }
            })
            .collect();

        let report = SaveReport { entries };
        info!(saved = report.saved(), failed = report.failed(), "save pass finished");
        report
    }

    /// Fill a page and every frame reachable from it, including iframes the
    /// fill itself caused to appear.
    pub fn run_frames(&self, page: &PageSnapshot, user_id: &str) -> Result<FramesReport> {
        let mut coordinator = Coordinator::new(page, self.clock);
        self.fill_frames(&mut coordinator, user_id)
    }

    /// Run the coordinator, or rescan it for late iframes when it already ran.
    /// The report lists only the frames filled by this call.
    pub fn fill_frames(&self, coordinator: &mut Coordinator<'_>, user_id: &str) -> Result<FramesReport> {
        let mut reports: Vec<(String, FillReport)> = Vec::new();

        let coordination = {
            let mut fill = |name: &str, doc: &mut Document| -> Result<()> {
                let report = self.run_in_frame(doc, user_id, Some(name))?;
                reports.push((name.to_string(), report));
                Ok(())
            };
            if !coordinator.has_run() {
                coordinator.run(&mut fill)?;
            }
            coordinator.rescan(&mut fill)?
        };

        for frame in &coordination.frames {
            self.trace(
                TraceEvent::now(TraceKind::Frame)
                    .with_frame(&frame.name)
                    .with_status(frame.status)
                    .with_message(format!("{:?} frame ended {}", frame.kind, frame.state)),
            );
        }
        for name in &coordination.completed {
            self.trace(
                TraceEvent::now(TraceKind::Frame)
                    .with_frame(name)
                    .with_message("AUTOFILL_COMPLETED"),
            );
        }

        Ok(FramesReport {
            coordination,
            frames: reports,
            page: coordinator.tree().to_page(),
        })
    }
}

// ============================================================================
// Slow-pass selection
// ============================================================================

/// Fields the fast pass did not satisfy and that still hold no value. File
/// inputs and vanished controls never qualify.
fn unfilled_fields(doc: &Document, fields: &[FieldDescriptor], outcomes: &[WriteOutcome]) -> Vec<MinifiedField> {
    let by_id: HashMap<&str, &WriteOutcome> = outcomes.iter().map(|o| (o.reference_id.as_str(), o)).collect();
    fields
        .iter()
        .filter(|field| field.field_type != FieldType::File)
        .filter(|field| {
            by_id.get(field.reference_id.as_str()).is_none_or(|o| {
                !o.is_satisfied() && !matches!(o.status, WriteStatus::PendingUpload | WriteStatus::Missing)
            })
        })
        .filter(|field| is_empty_in_document(doc, field))
        .map(FieldDescriptor::minified)
        .collect()
}

fn is_empty_in_document(doc: &Document, field: &FieldDescriptor) -> bool {
    let Some(node) = find_by_reference(doc, &field.reference_id) else {
        return false;
    };
    match field.field_type {
        FieldType::Radio => {
            let group: Vec<_> = match doc.attr(node, "name").filter(|n| !n.is_empty()) {
                Some(name) => doc.find_all(|d, n| d.attr(n, "type") == Some("radio") && d.attr(n, "name") == Some(name)),
                None => vec![node],
            };
            !group.into_iter().any(|n| doc.checked(n))
        }
        FieldType::Checkbox => !doc.checked(node),
        _ => doc.value(node).trim().is_empty(),
    }
}
