use field_autofill::AutofillError;
use field_autofill::dom::SnapshotNode;
use field_autofill::field::descriptor::strip_value_prefix;
use field_autofill::field::schema::{parse_descriptors, parse_descriptors_str, parse_instructions};
use field_autofill::field::{FieldDescriptor, FieldType, find_by_reference, scan_fields};
use field_autofill::resolve::instruction::{Action, InstructionValue};
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;
use common::{by_id, document, labeled_input, labeled_select, radio_group, reference_of};

// ============================================================================
// Scanning
// ============================================================================

#[test]
fn scan_keeps_document_order_and_skips_ineligible_controls() {
    let mut doc = document([
        labeled_input("first", "text", "First Name"),
        SnapshotNode::element("input").with_attr("type", "hidden").with_attr("id", "token"),
        SnapshotNode::element("input").with_attr("type", "submit").with_attr("id", "go"),
        SnapshotNode::element("input").with_attr("type", "reset").with_attr("id", "again"),
        SnapshotNode::element("input").with_attr("type", "image").with_attr("id", "pic"),
        SnapshotNode::element("input").with_attr("type", "color").with_attr("id", "hue"),
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("id", "off")
            .with_attr("disabled", ""),
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("id", "g-recaptcha-response"),
        SnapshotNode::element("div")
            .with_attr("style", "display: none")
            .with_child(SnapshotNode::element("input").with_attr("type", "text").with_attr("id", "ghost")),
        labeled_input("email", "email", "Email"),
        SnapshotNode::element("textarea").with_attr("id", "cover"),
    ]);

    let fields = scan_fields(&mut doc);
    let ids: Vec<&str> = fields.iter().map(|f| f.html_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "email", "cover"]);
}

#[test]
fn hidden_file_inputs_are_still_scanned() {
    let mut doc = document([SnapshotNode::element("input")
        .with_attr("type", "file")
        .with_attr("id", "resume")
        .with_attr("style", "display:none")]);

    let fields = scan_fields(&mut doc);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field_type, FieldType::File);
}

#[test]
fn readonly_inputs_survive_only_when_select_like() {
    let mut doc = document([
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("id", "plain")
            .with_attr("readonly", ""),
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("id", "country-select")
            .with_attr("readonly", "")
            .with_attr("aria-haspopup", "listbox"),
    ]);

    let fields = scan_fields(&mut doc);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].html_id, "country-select");
}

#[test]
fn rescanning_reuses_reference_ids() {
    let mut doc = document([
        labeled_input("first", "text", "First Name"),
        labeled_input("last", "text", "Last Name"),
    ]);

    let first: Vec<String> = scan_fields(&mut doc).into_iter().map(|f| f.reference_id).collect();
    let second: Vec<String> = scan_fields(&mut doc).into_iter().map(|f| f.reference_id).collect();

    assert_eq!(first, second);
    assert_ne!(first[0], first[1]);
    assert_eq!(reference_of(&doc, "first"), first[0]);
    assert_eq!(find_by_reference(&doc, &first[1]), Some(by_id(&doc, "last")));
    assert_eq!(find_by_reference(&doc, ""), None);
}

// ============================================================================
// Descriptors
// ============================================================================

#[test]
fn select_descriptor_reports_declared_type_and_label() {
    let mut doc = document([labeled_select(
        "gender",
        "Gender",
        &[("m", "Male"), ("f", "Female")],
    )]);

    let fields = scan_fields(&mut doc);
    let gender = &fields[0];
    assert_eq!(gender.field_type, FieldType::Select);
    assert_eq!(gender.declared_type, "select-one");
    assert_eq!(gender.label.as_deref(), Some("Gender"));
    assert_eq!(gender.current_value, "");
}

#[test]
fn choice_descriptors_carry_checked_state_and_group_question() {
    let mut doc = document([radio_group(
        "auth",
        "Are you legally authorized to work in Canada?",
        &[("a-yes", "Yes"), ("a-no", "No")],
    )]);
    let yes = by_id(&doc, "a-yes");
    doc.set_checked(yes, true);

    let fields = scan_fields(&mut doc);
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].current_value, "true");
    assert_eq!(fields[1].current_value, "false");
    assert_eq!(fields[1].label.as_deref(), Some("No"));
    assert_eq!(
        fields[0].whole_question_label.as_deref(),
        Some("Are you legally authorized to work in Canada?")
    );
}

#[test]
fn textarea_and_required_flags() {
    let mut doc = document([SnapshotNode::element("textarea")
        .with_attr("id", "why")
        .with_attr("required", "")
        .with_attr("placeholder", "Tell us why")]);

    let field = &scan_fields(&mut doc)[0];
    assert_eq!(field.field_type, FieldType::Textbox);
    assert_eq!(field.declared_type, "textarea");
    assert!(field.required);
    assert_eq!(field.placeholder, "Tell us why");
}

#[test]
fn framework_value_prefixes_are_stripped() {
    assert_eq!(strip_value_prefix("string:CA"), "CA");
    assert_eq!(strip_value_prefix("number:3"), "3");
    assert_eq!(strip_value_prefix("plain"), "plain");
}

#[test]
fn descriptor_serializes_camel_case() {
    let field = FieldDescriptor::new("ref-1", FieldType::Email)
        .with_label("Email")
        .with_autocomplete("email");
    let value = serde_json::to_value(&field).unwrap();

    assert_eq!(value["referenceId"], "ref-1");
    assert_eq!(value["fieldType"], "email");
    assert_eq!(value["declaredType"], "email");
    assert_eq!(value["autocomplete"], "email");
    assert!(value.get("reference_id").is_none());
}

#[test]
fn minified_field_keeps_only_resolver_inputs() {
    let field = FieldDescriptor::new("ref-9", FieldType::Text)
        .with_label("Preferred pronouns")
        .with_name("pronouns")
        .with_value("they/them");
    let min = field.minified();

    assert_eq!(min.id, "ref-9");
    assert_eq!(min.value, "they/them");
    assert_eq!(min.label.as_deref(), Some("Preferred pronouns"));
}

// ============================================================================
// Boundary validation
// ============================================================================

fn descriptor_json(reference_id: &str) -> serde_json::Value {
    serde_json::to_value(FieldDescriptor::new(reference_id, FieldType::Text).with_label("City")).unwrap()
}

#[test]
fn valid_descriptor_payload_parses() {
    let fields = parse_descriptors(&json!([descriptor_json("a"), descriptor_json("b")])).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].reference_id, "b");
}

#[test]
fn duplicate_or_empty_reference_ids_are_rejected() {
    let duplicate = parse_descriptors(&json!([descriptor_json("a"), descriptor_json("a")]));
    assert!(matches!(duplicate, Err(AutofillError::InvalidPayload { .. })));

    let empty = parse_descriptors(&json!([descriptor_json("  ")]));
    assert!(matches!(empty, Err(AutofillError::InvalidPayload { .. })));
}

#[test]
fn missing_required_key_is_rejected_not_defaulted() {
    let mut item = descriptor_json("a");
    item.as_object_mut().unwrap().remove("fieldType");

    let err = parse_descriptors(&json!([item])).unwrap_err();
    assert!(err.to_string().contains("item 0"), "{}", err);
}

#[test]
fn non_array_payloads_are_rejected() {
    assert!(parse_descriptors(&json!({"fields": []})).is_err());
    assert!(parse_descriptors_str("not json").is_err());
}

#[test]
fn instructions_parse_text_and_flag_values() {
    let instructions = parse_instructions(&json!([
        {"referenceId": "a", "action": "fill", "value": "Toronto"},
        {"referenceId": "b", "action": "fill", "value": true},
        {"referenceId": "c", "action": "skip"},
    ]))
    .unwrap();

    assert_eq!(instructions[0].value, Some(InstructionValue::Text("Toronto".into())));
    assert_eq!(instructions[1].value, Some(InstructionValue::Flag(true)));
    assert_eq!(instructions[2].action, Action::Skip);
}

#[test]
fn instruction_with_unknown_action_or_empty_id_is_rejected() {
    assert!(parse_instructions(&json!([{"referenceId": "a", "action": "explode"}])).is_err());
    assert!(parse_instructions(&json!([{"referenceId": "", "action": "clear"}])).is_err());
}
