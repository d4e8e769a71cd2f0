use std::cell::Cell;
use std::time::Duration;

use field_autofill::classify::Category;
use field_autofill::dom::{Document, PageSnapshot, SnapshotNode};
use field_autofill::field::{FieldDescriptor, MinifiedField, scan_fields};
use field_autofill::fill::clock::{Clock, ManualClock, Timings};
use field_autofill::fill::ready::{ReadyOutcome, wait_for_page_ready, wait_until_quiet};
use field_autofill::fill::speed::AnimationSpeed;
use field_autofill::fill::writer::WriteStatus;
use field_autofill::frames::Coordinator;
use field_autofill::pipeline::FillPass;
use field_autofill::resolve::{
    AutofillInstruction, JsonFileStore, MemoryStore, PreferenceStore, SaveOutcome,
    UserPreferenceProfile,
};
use field_autofill::slow::{MockResolver, SlowResolver};
use field_autofill::trace::TraceLogger;
use field_autofill::{AutofillEngine, AutofillError, Result};
use pretty_assertions::assert_eq;

mod common;
use common::{by_id, document, john_doe, label_for, labeled_input, labeled_select, page, radio_group, reference_of};

/// A typical application form: known fields, a self-identification radio,
/// an upload and two questions the heuristics cannot answer.
fn application_form() -> Document {
    document([
        labeled_input("first", "text", "First Name"),
        labeled_input("last", "text", "Last Name"),
        labeled_input("email", "email", "Email"),
        labeled_select("gender", "Gender", &[("m", "Male"), ("f", "Female")]),
        radio_group("vet", "Are you a protected veteran?", &[("vet-yes", "Yes"), ("vet-no", "No")]),
        labeled_input("resume", "file", "Resume"),
        labeled_input("colour", "text", "Favourite colour"),
        SnapshotNode::element("div").with_children([
            label_for("why", "Why do you want to work here?"),
            SnapshotNode::element("textarea").with_attr("id", "why"),
        ]),
    ])
}

fn john_store() -> MemoryStore {
    MemoryStore::new().with_profile("john", john_doe())
}

struct DownResolver;

impl SlowResolver for DownResolver {
    fn resolve(&self, _: &[MinifiedField], _: &UserPreferenceProfile) -> Result<Vec<AutofillInstruction>> {
        Err(AutofillError::Resolver("service unavailable".into()))
    }
}

// ============================================================================
// Fast pass
// ============================================================================

#[test]
fn fast_pass_fills_what_the_profile_answers() {
    let store = john_store();
    let clock = ManualClock::new();
    let engine = AutofillEngine::new(&store, &clock);
    let mut doc = application_form();

    let report = engine.run(&mut doc, "john").unwrap();

    assert_eq!(doc.value(by_id(&doc, "first")), "John");
    assert_eq!(doc.value(by_id(&doc, "last")), "Doe");
    assert_eq!(doc.value(by_id(&doc, "email")), "john@doe.com");
    assert_eq!(doc.value(by_id(&doc, "gender")), "f");
    assert!(doc.checked(by_id(&doc, "vet-no")));
    assert!(!doc.checked(by_id(&doc, "vet-yes")));

    assert_eq!(report.filled(), 5);
    assert_eq!(report.pending_uploads(), vec![reference_of(&doc, "resume").as_str()]);
    assert_eq!(report.unfilled, vec![reference_of(&doc, "colour"), reference_of(&doc, "why")]);
    assert!(report.slow.is_empty());
    assert_eq!(report.ready, ReadyOutcome::Quiet { elapsed_ms: 500 });
}

#[test]
fn fast_pass_reports_category_and_label_per_field() {
    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = application_form();

    let report = AutofillEngine::new(&store, &clock).run(&mut doc, "john").unwrap();
    let email = report
        .fast
        .iter()
        .find(|r| r.reference_id == reference_of(&doc, "email"))
        .unwrap();

    assert_eq!(email.category, Category::Email);
    assert_eq!(email.label.as_deref(), Some("Email"));
    assert_eq!(email.value.as_deref(), Some("john@doe.com"));
    assert_eq!(email.status, WriteStatus::Filled);
    assert_eq!(email.pass, FillPass::Fast);
}

#[test]
fn second_run_changes_nothing() {
    let store = john_store();
    let clock = ManualClock::new();
    let engine = AutofillEngine::new(&store, &clock);
    let mut doc = application_form();

    engine.run(&mut doc, "john").unwrap();
    doc.clear_events();
    let again = engine.run(&mut doc, "john").unwrap();

    assert_eq!(again.filled(), 0);
    assert!(doc.events().is_empty());
}

#[test]
fn gender_radio_ticks_only_the_named_option() {
    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = document([radio_group(
        "sex",
        "What is your gender?",
        &[("g-female", "Female"), ("g-male", "Male")],
    )]);

    let report = AutofillEngine::new(&store, &clock).run(&mut doc, "john").unwrap();

    assert!(doc.checked(by_id(&doc, "g-female")));
    assert!(!doc.checked(by_id(&doc, "g-male")));
    assert_eq!(report.filled(), 1);
    let male = report
        .fast
        .iter()
        .find(|r| r.reference_id == reference_of(&doc, "g-male"))
        .unwrap();
    assert_eq!(male.status, WriteStatus::NoMatch);
}

#[test]
fn unknown_user_resolves_against_empty_profile() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut doc = application_form();

    let report = AutofillEngine::new(&store, &clock).run(&mut doc, "stranger").unwrap();

    assert_eq!(report.filled(), 0);
    assert_eq!(doc.value(by_id(&doc, "first")), "");
    assert_eq!(report.pending_uploads().len(), 1);
}

#[test]
fn store_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    let clock = ManualClock::new();
    let mut doc = application_form();

    let result = AutofillEngine::new(&store, &clock).run(&mut doc, "../outside");
    assert!(matches!(result, Err(AutofillError::Store(_))));
}

#[test]
fn animation_speed_pauses_after_each_write() {
    let store = john_store();
    let clock = ManualClock::new();
    let engine = AutofillEngine::new(&store, &clock).with_speed(AnimationSpeed::Fast);
    let mut doc = application_form();

    engine.run(&mut doc, "john").unwrap();

    // Page-ready quiet period plus one pause per filled field.
    let expected = Duration::from_millis(500) + AnimationSpeed::Fast.delay() * 5;
    assert_eq!(clock.total_slept(), expected);
}

// ============================================================================
// Slow pass
// ============================================================================

#[test]
fn slow_pass_sees_only_unfilled_fields() {
    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = application_form();
    scan_fields(&mut doc);
    let colour = reference_of(&doc, "colour");
    let why = reference_of(&doc, "why");
    let first = reference_of(&doc, "first");

    let resolver = MockResolver::new(vec![
        AutofillInstruction::fill(&colour, "Blue"),
        AutofillInstruction::fill(&first, "Johnny"),
        AutofillInstruction::fill(&why, "The mission"),
    ]);
    let engine = AutofillEngine::new(&store, &clock).with_slow_resolver(&resolver);

    let report = engine.run(&mut doc, "john").unwrap();

    assert_eq!(resolver.requested_ids(), vec![vec![colour.clone(), why.clone()]]);
    assert_eq!(doc.value(by_id(&doc, "colour")), "Blue");
    assert_eq!(doc.value(by_id(&doc, "why")), "The mission");
    assert_eq!(doc.value(by_id(&doc, "first")), "John");
    assert_eq!(report.slow.len(), 2);
    assert!(report.slow.iter().all(|r| r.pass == FillPass::Slow));
}

#[test]
fn slow_pass_is_not_called_when_nothing_is_left() {
    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = document([labeled_input("email", "email", "Email")]);
    let resolver = MockResolver::new(Vec::new());

    AutofillEngine::new(&store, &clock)
        .with_slow_resolver(&resolver)
        .run(&mut doc, "john")
        .unwrap();

    assert!(resolver.requested_ids().is_empty());
}

#[test]
fn slow_pass_failure_keeps_fast_results() {
    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = application_form();

    let report = AutofillEngine::new(&store, &clock)
        .with_slow_resolver(&DownResolver)
        .run(&mut doc, "john")
        .unwrap();

    assert_eq!(report.filled(), 5);
    assert!(report.slow.is_empty());
    assert_eq!(report.unfilled.len(), 2);
}

// ============================================================================
// Page readiness
// ============================================================================

#[test]
fn quiet_period_restarts_on_every_mutation() {
    let clock = ManualClock::new();
    let timings = Timings::default();

    // Mutations every poll until one second in, then silence.
    let outcome = wait_until_quiet(&clock, &timings, || (clock.now().as_millis() as u64 / 50).min(20));

    assert_eq!(outcome, ReadyOutcome::Quiet { elapsed_ms: 1500 });
}

#[test]
fn endless_mutations_hit_the_cap() {
    let clock = ManualClock::new();
    let timings = Timings::default();

    let outcome = wait_until_quiet(&clock, &timings, || clock.now().as_millis() as u64);

    assert_eq!(outcome, ReadyOutcome::Capped { elapsed_ms: 5000 });
}

#[test]
fn held_document_is_ready_after_one_quiet_period() {
    let clock = ManualClock::new();
    let timings = Timings {
        page_quiet_ms: 200,
        ..Timings::default()
    };
    let calls = Cell::new(0);

    assert_eq!(wait_for_page_ready(&clock, &timings), ReadyOutcome::Quiet { elapsed_ms: 200 });
    assert_eq!(clock.total_slept(), Duration::from_millis(200));

    let outcome = wait_until_quiet(&clock, &timings, || {
        calls.set(calls.get() + 1);
        0
    });
    assert_eq!(outcome, ReadyOutcome::Quiet { elapsed_ms: 200 });
    assert!(calls.get() > 1);
}

#[test]
fn quiet_period_longer_than_the_cap_is_capped() {
    let clock = ManualClock::new();
    let timings = Timings {
        page_quiet_ms: 8000,
        ..Timings::default()
    };

    assert_eq!(wait_for_page_ready(&clock, &timings), ReadyOutcome::Capped { elapsed_ms: 5000 });
}

// ============================================================================
// Save pass
// ============================================================================

#[test]
fn save_reports_every_field() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut doc = application_form();
    let first = by_id(&doc, "first");
    let email = by_id(&doc, "email");
    let colour = by_id(&doc, "colour");
    let vet_no = by_id(&doc, "vet-no");
    doc.set_value(first, "Ada");
    doc.set_value(email, "ada@example.org");
    doc.set_value(colour, "Green");
    doc.set_checked(vet_no, true);

    let report = AutofillEngine::new(&store, &clock).save(&mut doc, "ada");

    assert_eq!(report.entries.len(), 9);
    // first name, email, the ticked veteran radio and the resume sentinel
    assert_eq!(report.saved(), 4);
    assert_eq!(report.failed(), 5);
    assert!(matches!(
        report.outcome_for(&reference_of(&doc, "colour")),
        Some(SaveOutcome::Error { .. })
    ));

    let profile = store.load("ada").unwrap().unwrap();
    assert_eq!(profile.name.unwrap().first_name.as_deref(), Some("Ada"));
    assert_eq!(profile.email.as_deref(), Some("ada@example.org"));
    assert_eq!(profile.veteran.as_deref(), Some("No"));
    assert_eq!(profile.gender, None);
}

// ============================================================================
// Tracing
// ============================================================================

#[test]
fn trace_file_gets_one_line_per_instruction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(&path);
    assert!(tracer.is_enabled());

    let store = john_store();
    let clock = ManualClock::new();
    let mut doc = application_form();
    let fields = scan_fields(&mut doc).len();

    AutofillEngine::new(&store, &clock)
        .with_tracer(&tracer)
        .run(&mut doc, "john")
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), fields);
    assert!(lines.iter().all(|l| l["kind"] == "instruction" && l["pass"] == "fast"));

    let email = lines
        .iter()
        .find(|l| l["category"] == "email")
        .unwrap();
    assert_eq!(email["value"], "john@doe.com");
    assert_eq!(email["status"], "filled");
}

#[test]
fn disabled_tracer_writes_nothing() {
    let tracer = TraceLogger::disabled();
    assert!(!tracer.is_enabled());

    let dir = tempfile::tempdir().unwrap();
    let unopenable = TraceLogger::new(dir.path().join("missing").join("trace.jsonl"));
    assert!(!unopenable.is_enabled());
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn run_frames_fills_child_frames_and_folds_them_back() {
    let store = john_store();
    let clock = ManualClock::new();
    let child = PageSnapshot::new(
        None,
        SnapshotNode::element("html")
            .with_child(SnapshotNode::element("body").with_child(labeled_input("email", "email", "Email"))),
    );
    let snapshot = page(
        "https://jobs.example.com/apply",
        [
            labeled_input("first", "text", "First Name"),
            SnapshotNode::element("iframe")
                .with_attr("id", "embedded")
                .with_attr("srcdoc", "<form></form>")
                .with_frame(child),
        ],
    );

    let report = AutofillEngine::new(&store, &clock)
        .run_frames(&snapshot, "john")
        .unwrap();

    assert_eq!(report.frames.len(), 2);
    assert!(report.coordination.terminal);
    assert_eq!(report.coordination.completed, vec![report.frames[1].0.clone()]);
    assert_eq!(report.frames[1].1.filled(), 1);

    let top = Document::from_page(&report.page);
    assert_eq!(top.value(by_id(&top, "first")), "John");
    let inner = top.frame_snapshot(by_id(&top, "embedded")).unwrap();
    let inner = Document::from_page(inner);
    assert_eq!(inner.value(by_id(&inner, "email")), "john@doe.com");
}

#[test]
fn fill_frames_picks_up_an_iframe_added_after_the_first_run() {
    let store = john_store();
    let clock = ManualClock::new();
    let engine = AutofillEngine::new(&store, &clock);
    let snapshot = page("https://jobs.example.com/apply", [labeled_input("first", "text", "First Name")]);
    let mut coordinator = Coordinator::new(&snapshot, &clock);

    let first = engine.fill_frames(&mut coordinator, "john").unwrap();
    assert_eq!(first.frames.len(), 1);

    let late = PageSnapshot::new(
        None,
        SnapshotNode::element("html")
            .with_child(SnapshotNode::element("body").with_child(labeled_input("email", "email", "Email"))),
    );
    let top = coordinator.tree().top();
    let doc = coordinator.tree_mut().document_mut(top).unwrap();
    let body = doc.body();
    doc.append_child(
        body,
        &SnapshotNode::element("iframe")
            .with_attr("id", "late")
            .with_attr("srcdoc", "<form></form>")
            .with_frame(late),
    );

    let second = engine.fill_frames(&mut coordinator, "john").unwrap();

    assert_eq!(second.frames.len(), 1);
    assert_eq!(second.frames[0].1.filled(), 1);
    assert_eq!(second.coordination.frames.len(), 2);
    assert_eq!(second.coordination.completed, vec![second.frames[0].0.clone()]);

    let top = Document::from_page(&second.page);
    assert_eq!(top.value(by_id(&top, "first")), "John");
    let inner = Document::from_page(top.frame_snapshot(by_id(&top, "late")).unwrap());
    assert_eq!(inner.value(by_id(&inner, "email")), "john@doe.com");
}

#[test]
fn descriptors_in_reports_match_scanned_fields() {
    let mut doc = application_form();
    let fields: Vec<FieldDescriptor> = scan_fields(&mut doc);
    let store = john_store();
    let clock = ManualClock::new();

    let report = AutofillEngine::new(&store, &clock).run(&mut doc, "john").unwrap();

    let reported: Vec<&str> = report.fast.iter().map(|r| r.reference_id.as_str()).collect();
    let scanned: Vec<&str> = fields.iter().map(|f| f.reference_id.as_str()).collect();
    assert_eq!(reported, scanned);
}
