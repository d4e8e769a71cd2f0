use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::classify::{CategorizedField, classify_all};
use crate::cli::config::AppConfig;
use crate::dom::{Document, PageSnapshot, SnapshotNode};
use crate::error::{AutofillError, Result};
use crate::field::scanner::scan_fields;
use crate::fill::clock::SystemClock;
use crate::fill::speed::AnimationSpeed;
use crate::pipeline::{AutofillEngine, FillReport, SaveReport};
use crate::resolve::store::JsonFileStore;
use crate::slow::http::HttpResolver;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Page snapshot I/O
// ============================================================================

/// Read a page snapshot. A bare root node is accepted as a page without URL.
pub fn load_page(path: &Path) -> Result<PageSnapshot> {
    let raw = std::fs::read_to_string(path).map_err(|e| AutofillError::io(path.display().to_string(), e))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| AutofillError::json(path.display().to_string(), e))?;
    if value.get("root").is_some() {
        serde_json::from_value(value).map_err(|e| AutofillError::json("page snapshot", e))
    } else {
        let root: SnapshotNode = serde_json::from_value(value).map_err(|e| AutofillError::json("page snapshot", e))?;
        Ok(PageSnapshot { url: None, root })
    }
}

pub fn write_page(path: &Path, page: &PageSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(page).map_err(|e| AutofillError::json("page snapshot", e))?;
    std::fs::write(path, json).map_err(|e| AutofillError::io(path.display().to_string(), e))
}

fn to_json<T: Serialize>(value: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| AutofillError::json(context, e))
}

fn categorize(page: &PageSnapshot) -> Vec<CategorizedField> {
    let mut doc = Document::from_page(page);
    classify_all(&scan_fields(&mut doc))
}

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(page_path: &Path) -> Result<String> {
    let page = load_page(page_path)?;
    let mut doc = Document::from_page(&page);
    let fields = scan_fields(&mut doc);
    info!(fields = fields.len(), "page scanned");
    to_json(&fields, "field descriptors")
}

// ============================================================================
// classify subcommand
// ============================================================================

pub fn cmd_classify(page_path: &Path) -> Result<String> {
    let page = load_page(page_path)?;
    let lines: Vec<String> = categorize(&page)
        .iter()
        .map(|c| {
            format!(
                "{}  {}  {}",
                c.descriptor.reference_id,
                c.category,
                c.descriptor.label_text()
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Everything `fill` needs once CLI flags and config are merged.
#[derive(Debug, Clone)]
pub struct FillSettings {
    pub store_dir: PathBuf,
    pub speed: AnimationSpeed,
    pub endpoint: Option<String>,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FillSummary<'r> {
    frames: Vec<FrameSummary<'r>>,
    terminal: bool,
    rejected_messages: usize,
}

#[derive(Debug, Serialize)]
struct FrameSummary<'r> {
    frame: &'r str,
    #[serde(flatten)]
    report: &'r FillReport,
}

pub fn cmd_fill(page_path: &Path, user: &str, settings: &FillSettings, config: &AppConfig) -> Result<String> {
    let page = load_page(page_path)?;
    let store = JsonFileStore::new(&settings.store_dir)?;
    let clock = SystemClock::new();
    let tracer = config.trace.path.as_ref().map(TraceLogger::new);
    let resolver = settings
        .endpoint
        .as_deref()
        .map(|endpoint| HttpResolver::new(endpoint, config.resolver.timeout()))
        .transpose()?;

    let mut engine = AutofillEngine::new(&store, &clock)
        .with_timings(config.fill.timings())
        .with_speed(settings.speed);
    if let Some(resolver) = &resolver {
        engine = engine.with_slow_resolver(resolver);
    }
    if let Some(tracer) = &tracer {
        engine = engine.with_tracer(tracer);
    }

    let report = engine.run_frames(&page, user)?;
    if let Some(out) = &settings.out {
        write_page(out, &report.page)?;
        info!(path = %out.display(), "filled snapshot written");
    }

    let summary = FillSummary {
        frames: report
            .frames
            .iter()
            .map(|(frame, report)| FrameSummary { frame, report })
            .collect(),
        terminal: report.coordination.terminal,
        rejected_messages: report.coordination.rejected_messages,
    };
    to_json(&summary, "fill report")
}

// ============================================================================
// save subcommand
// ============================================================================

pub fn cmd_save(page_path: &Path, user: &str, store_dir: &Path) -> Result<SaveReport> {
    let page = load_page(page_path)?;
    let store = JsonFileStore::new(store_dir)?;
    let clock = SystemClock::new();
    let engine = AutofillEngine::new(&store, &clock);
    let mut doc = Document::from_page(&page);
    Ok(engine.save(&mut doc, user))
}

pub fn render_save_report(report: &SaveReport) -> Result<String> {
    to_json(report, "save report")
}
