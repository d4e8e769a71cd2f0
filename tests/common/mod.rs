#![allow(dead_code)]

use field_autofill::dom::{Document, NodeId, PageSnapshot, SnapshotNode};
use field_autofill::field::REFERENCE_ATTR;
use field_autofill::resolve::{
    LocationProfile, NameProfile, PhoneProfile, SponsorshipProfile, UserPreferenceProfile,
};

// ============================================================================
// Snapshot builders
// ============================================================================

pub fn label_for(id: &str, text: &str) -> SnapshotNode {
    SnapshotNode::element("label").with_attr("for", id).with_text(text)
}

/// `<div><label for=id>label</label><input type=.. id=..></div>`
pub fn labeled_input(id: &str, input_type: &str, label: &str) -> SnapshotNode {
    SnapshotNode::element("div").with_children([
        label_for(id, label),
        SnapshotNode::element("input")
            .with_attr("type", input_type)
            .with_attr("id", id)
            .with_attr("name", id),
    ])
}

pub fn labeled_select(id: &str, label: &str, options: &[(&str, &str)]) -> SnapshotNode {
    let select = SnapshotNode::element("select")
        .with_attr("id", id)
        .with_attr("name", id)
        .with_children(
            std::iter::once(SnapshotNode::element("option").with_attr("value", "").with_text("Choose..."))
                .chain(options.iter().map(|(value, text)| {
                    SnapshotNode::element("option").with_attr("value", value).with_text(text)
                })),
        );
    SnapshotNode::element("div").with_children([label_for(id, label), select])
}

/// Fieldset of radios sharing `name`, each labelled by its wrapping label.
pub fn radio_group(name: &str, legend: &str, options: &[(&str, &str)]) -> SnapshotNode {
    SnapshotNode::element("fieldset")
        .with_child(SnapshotNode::element("legend").with_text(legend))
        .with_children(options.iter().map(|(id, text)| {
            SnapshotNode::element("label").with_children([
                SnapshotNode::element("input")
                    .with_attr("type", "radio")
                    .with_attr("name", name)
                    .with_attr("id", id)
                    .with_attr("value", text),
                SnapshotNode::text_node(text),
            ])
        }))
}

/// ARIA combobox whose listbox is hidden until the input is clicked.
pub fn aria_combobox(id: &str, label: &str, options: &[&str]) -> SnapshotNode {
    let list_id = format!("{}-listbox", id);
    SnapshotNode::element("div").with_children([
        label_for(id, label),
        SnapshotNode::element("input")
            .with_attr("type", "text")
            .with_attr("id", id)
            .with_attr("role", "combobox")
            .with_attr("aria-controls", &list_id)
            .with_attr("aria-expanded", "false"),
        SnapshotNode::element("ul")
            .with_attr("id", &list_id)
            .with_attr("role", "listbox")
            .with_attr("hidden", "")
            .with_children(
                options
                    .iter()
                    .map(|o| SnapshotNode::element("li").with_attr("role", "option").with_text(o)),
            ),
    ])
}

pub fn form(children: impl IntoIterator<Item = SnapshotNode>) -> SnapshotNode {
    SnapshotNode::element("html").with_child(
        SnapshotNode::element("body").with_child(SnapshotNode::element("form").with_children(children)),
    )
}

pub fn page(url: &str, children: impl IntoIterator<Item = SnapshotNode>) -> PageSnapshot {
    PageSnapshot::new(Some(url), form(children))
}

pub fn document(children: impl IntoIterator<Item = SnapshotNode>) -> Document {
    Document::from_snapshot(&form(children))
}

// ============================================================================
// Document lookups
// ============================================================================

pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id '{}'", id))
}

pub fn reference_of(doc: &Document, id: &str) -> String {
    doc.attr(by_id(doc, id), REFERENCE_ATTR)
        .unwrap_or_else(|| panic!("element '{}' was never scanned", id))
        .to_string()
}

// ============================================================================
// Profiles
// ============================================================================

pub fn john_doe() -> UserPreferenceProfile {
    UserPreferenceProfile {
        name: Some(NameProfile {
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
        }),
        email: Some("john@doe.com".into()),
        phone: Some(PhoneProfile {
            phone_num: Some("5551234567".into()),
            extension: Some("42".into()),
            kind: Some("mobile".into()),
        }),
        gender: Some("female".into()),
        veteran: Some("not_veteran".into()),
        disability: Some("yes".into()),
        location: Some(LocationProfile {
            country: Some("Canada".into()),
            city: Some("Toronto".into()),
            state: Some("Ontario".into()),
            postal_code: Some("M5V 2T6".into()),
            address: Some("1 King St".into()),
        }),
        authorization: Some("yes".into()),
        sponsorship: Some(SponsorshipProfile {
            yes_no_answer: Some(false),
            text: Some("No sponsorship needed".into()),
        }),
        linkedin_profile: Some("https://linkedin.com/in/johndoe".into()),
        website: Some("https://johndoe.dev".into()),
        github_url: Some("https://github.com/johndoe".into()),
        ..Default::default()
    }
}
