use std::path::{Path, PathBuf};

use clap::Parser;
use field_autofill::cli::commands::{FillSettings, cmd_classify, cmd_fill, cmd_save, cmd_scan, load_page};
use field_autofill::cli::config::{
    AppConfig, Cli, Commands, load_config, parse_config, resolve_endpoint, resolve_speed,
    resolve_store_dir,
};
use field_autofill::dom::{Document, PageSnapshot};
use field_autofill::fill::speed::AnimationSpeed;
use field_autofill::resolve::{JsonFileStore, PreferenceStore};
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;
use common::{by_id, form, labeled_input, labeled_select, page};

fn write_snapshot(dir: &Path, page: &PageSnapshot) -> PathBuf {
    let path = dir.join("page.json");
    std::fs::write(&path, serde_json::to_string(page).unwrap()).unwrap();
    path
}

fn contact_page() -> PageSnapshot {
    page(
        "https://jobs.example.com/apply",
        [
            labeled_input("first", "text", "First Name"),
            labeled_input("email", "email", "Email"),
            labeled_select("gender", "Gender", &[("m", "Male"), ("f", "Female")]),
        ],
    )
}

/// Short waits so commands driven by the real clock finish quickly.
fn quick_config() -> AppConfig {
    parse_config(
        "fill:\n  page_ready_quiet_ms: 10\n  page_ready_max_ms: 100\n  dropdown_timeout_ms: 10\n",
    )
    .unwrap()
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_scan() {
    let cli = Cli::parse_from(["field-autofill", "scan", "--page", "form.json"]);
    match cli.command {
        Commands::Scan { page } => assert_eq!(page, PathBuf::from("form.json")),
        _ => panic!("Expected Scan command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_classify() {
    let cli = Cli::parse_from(["field-autofill", "classify", "--page", "form.json"]);
    assert!(matches!(cli.command, Commands::Classify { .. }));
}

#[test]
fn cli_parse_fill_minimal() {
    let cli = Cli::parse_from(["field-autofill", "fill", "--page", "p.json", "--user", "ada"]);
    match cli.command {
        Commands::Fill {
            page,
            user,
            speed,
            out,
            store,
        } => {
            assert_eq!(page, PathBuf::from("p.json"));
            assert_eq!(user, "ada");
            assert!(speed.is_none());
            assert!(out.is_none());
            assert!(store.is_none());
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_fill_all_args() {
    let cli = Cli::parse_from([
        "field-autofill",
        "fill",
        "--page",
        "p.json",
        "--user",
        "ada",
        "--speed",
        "slow",
        "-o",
        "filled.json",
        "--store",
        "/tmp/prefs",
    ]);
    match cli.command {
        Commands::Fill {
            speed, out, store, ..
        } => {
            assert_eq!(speed, Some(AnimationSpeed::Slow));
            assert_eq!(out, Some(PathBuf::from("filled.json")));
            assert_eq!(store, Some(PathBuf::from("/tmp/prefs")));
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_save() {
    let cli = Cli::parse_from(["field-autofill", "save", "--page", "p.json", "--user", "ada"]);
    match cli.command {
        Commands::Save { page, user, store } => {
            assert_eq!(page, PathBuf::from("p.json"));
            assert_eq!(user, "ada");
            assert!(store.is_none());
        }
        _ => panic!("Expected Save command"),
    }
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from([
        "field-autofill",
        "-vv",
        "scan",
        "--page",
        "p.json",
        "--config",
        "custom.yaml",
        "--resolver-endpoint",
        "http://localhost:9000/resolve",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    assert_eq!(cli.resolver_endpoint.as_deref(), Some("http://localhost:9000/resolve"));
}

#[test]
fn cli_rejects_unknown_speed() {
    let result = Cli::try_parse_from([
        "field-autofill",
        "fill",
        "--page",
        "p.json",
        "--user",
        "ada",
        "--speed",
        "ludicrous",
    ]);
    assert!(result.is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.fill.speed, AnimationSpeed::None);
    assert_eq!(config.fill.page_ready_quiet_ms, 500);
    assert_eq!(config.fill.page_ready_max_ms, 5000);
    assert_eq!(config.fill.dropdown_timeout_ms, 700);
    assert_eq!(config.store.dir, PathBuf::from("profiles"));
    assert!(config.resolver.endpoint.is_none());
    assert!(config.trace.path.is_none());
}

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn config_load_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "fill: [not, a, mapping").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config, AppConfig::default());
    assert!(parse_config("fill: [not, a, mapping").is_err());
}

#[test]
fn config_partial_yaml() {
    let yaml = r#"
fill:
  speed: fast
  page_ready_quiet_ms: 250
resolver:
  endpoint: "http://resolver.internal/fill"
trace:
  path: "trace.jsonl"
"#;
    let config = parse_config(yaml).unwrap();
    assert_eq!(config.fill.speed, AnimationSpeed::Fast);
    assert_eq!(config.fill.page_ready_quiet_ms, 250);
    // Unset values keep their defaults
    assert_eq!(config.fill.page_ready_max_ms, 5000);
    assert_eq!(config.store.dir, PathBuf::from("profiles"));
    assert_eq!(config.resolver.endpoint.as_deref(), Some("http://resolver.internal/fill"));
    assert_eq!(config.trace.path, Some(PathBuf::from("trace.jsonl")));

    let timings = config.fill.timings();
    assert_eq!(timings.page_quiet_ms, 250);
    assert_eq!(timings.dropdown_observe_ms, 700);
}

#[test]
fn config_yaml_roundtrip() {
    let config = quick_config();
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert_eq!(parse_config(&yaml).unwrap(), config);
}

// ============================================================================
// Setting Resolution Tests
// ============================================================================

#[test]
fn endpoint_precedence_is_cli_then_config_then_env() {
    let mut config = AppConfig::default();
    config.resolver.endpoint = Some("http://config".into());

    assert_eq!(
        resolve_endpoint(Some("http://cli"), &config, Some("http://env")),
        Some("http://cli".to_string())
    );
    assert_eq!(
        resolve_endpoint(None, &config, Some("http://env")),
        Some("http://config".to_string())
    );
    assert_eq!(
        resolve_endpoint(None, &AppConfig::default(), Some("http://env")),
        Some("http://env".to_string())
    );
}

#[test]
fn slow_pass_is_off_without_an_endpoint() {
    assert_eq!(resolve_endpoint(None, &AppConfig::default(), None), None);
    assert_eq!(resolve_endpoint(Some("   "), &AppConfig::default(), None), None);
}

#[test]
fn store_dir_and_speed_prefer_cli() {
    let config = parse_config("store:\n  dir: /var/prefs\nfill:\n  speed: fast\n").unwrap();

    assert_eq!(resolve_store_dir(None, &config), PathBuf::from("/var/prefs"));
    assert_eq!(
        resolve_store_dir(Some(PathBuf::from("mine")), &config),
        PathBuf::from("mine")
    );
    assert_eq!(resolve_speed(None, &config), AnimationSpeed::Fast);
    assert_eq!(resolve_speed(Some(AnimationSpeed::None), &config), AnimationSpeed::None);
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn load_page_accepts_bare_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.json");
    let root = form([labeled_input("email", "email", "Email")]);
    std::fs::write(&path, serde_json::to_string(&root).unwrap()).unwrap();

    let page = load_page(&path).unwrap();
    assert!(page.url.is_none());
    assert_eq!(page.root, root);
}

#[test]
fn load_page_reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_page(&dir.path().join("absent.json")).is_err());

    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ nope").unwrap();
    assert!(load_page(&path).is_err());
}

#[test]
fn scan_prints_descriptors_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), &contact_page());

    let output = cmd_scan(&path).unwrap();
    let fields: serde_json::Value = serde_json::from_str(&output).unwrap();
    let fields = fields.as_array().unwrap();

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0]["label"], "First Name");
    assert_eq!(fields[1]["fieldType"], "email");
    assert_eq!(fields[2]["declaredType"], "select-one");
}

#[test]
fn classify_prints_one_line_per_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), &contact_page());

    let output = cmd_classify(&path).unwrap();
    let lines: Vec<Vec<&str>> = output.lines().map(|l| l.split("  ").collect()).collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0][1..].to_vec(), vec!["name", "First Name"]);
    assert_eq!(lines[1][1..].to_vec(), vec!["email", "Email"]);
    assert_eq!(lines[2][1..].to_vec(), vec!["gender", "Gender"]);
    assert!(!lines[0][0].is_empty());
}

#[test]
fn fill_writes_filled_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), &contact_page());
    let store_dir = dir.path().join("profiles");
    let store = JsonFileStore::new(&store_dir).unwrap();
    store.write("ada", "name/first_name", &json!("Ada")).unwrap();
    store.write("ada", "email", &json!("ada@example.org")).unwrap();
    store.write("ada", "gender", &json!("woman")).unwrap();

    let out = dir.path().join("filled.json");
    let settings = FillSettings {
        store_dir,
        speed: AnimationSpeed::None,
        endpoint: None,
        out: Some(out.clone()),
    };

    let output = cmd_fill(&path, "ada", &settings, &quick_config()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(summary["terminal"], true);
    assert_eq!(summary["frames"].as_array().unwrap().len(), 1);

    let filled = Document::from_page(&load_page(&out).unwrap());
    assert_eq!(filled.value(by_id(&filled, "first")), "Ada");
    assert_eq!(filled.value(by_id(&filled, "email")), "ada@example.org");
    assert_eq!(filled.value(by_id(&filled, "gender")), "f");
}

#[test]
fn save_persists_typed_values() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = page(
        "https://jobs.example.com/apply",
        [labeled_input("email", "email", "Email"), labeled_input("city", "text", "City")],
    );
    let mut doc = Document::from_page(&snapshot);
    let email = by_id(&doc, "email");
    doc.set_value(email, "ada@example.org");
    let path = write_snapshot(dir.path(), &PageSnapshot::new(snapshot.url.as_deref(), doc.to_snapshot()));

    let store_dir = dir.path().join("profiles");
    let report = cmd_save(&path, "ada", &store_dir).unwrap();
    assert_eq!(report.saved(), 1);
    assert_eq!(report.failed(), 1);

    let profile = JsonFileStore::new(&store_dir).unwrap().load("ada").unwrap().unwrap();
    assert_eq!(profile.email.as_deref(), Some("ada@example.org"));
}
