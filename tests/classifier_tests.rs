use std::collections::HashSet;

use field_autofill::classify::predicates::{is_other_website, is_website};
use field_autofill::classify::{Category, PRIORITY, classify, classify_all};
use field_autofill::field::{FieldDescriptor, FieldType, scan_fields};
use pretty_assertions::assert_eq;

mod common;
use common::{document, labeled_input, labeled_select, radio_group};

fn text(label: &str) -> FieldDescriptor {
    FieldDescriptor::new("r", FieldType::Text).with_label(label)
}

fn choice(field_type: FieldType, label: &str, question: &str) -> FieldDescriptor {
    FieldDescriptor::new("r", field_type)
        .with_label(label)
        .with_question(question)
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn priority_lists_every_category_once_and_never_unknown() {
    let categories: HashSet<Category> = PRIORITY.iter().map(|(c, _)| *c).collect();
    assert_eq!(categories.len(), PRIORITY.len());
    assert!(!categories.contains(&Category::Unknown));
    assert_eq!(PRIORITY[0].0, Category::Name);
}

#[test]
fn classify_all_keeps_scan_order() {
    let mut doc = document([
        labeled_input("email", "email", "Email"),
        labeled_input("city", "text", "City"),
        labeled_input("misc", "text", "Favourite colour"),
    ]);
    let fields = scan_fields(&mut doc);
    let categories: Vec<Category> = classify_all(&fields).iter().map(|c| c.category).collect();
    assert_eq!(categories, vec![Category::Email, Category::Location, Category::Unknown]);
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn declared_email_type_wins_over_label() {
    let field = FieldDescriptor::new("r", FieldType::Email).with_label("Name");
    assert_eq!(classify(&field), Category::Email);
}

#[test]
fn empty_descriptor_is_unknown() {
    assert_eq!(classify(&FieldDescriptor::new("r", FieldType::Text)), Category::Unknown);
}

#[test]
fn name_variants() {
    assert_eq!(classify(&text("First Name")), Category::Name);
    assert_eq!(classify(&text("Middle Initial")), Category::Name);
    assert_eq!(classify(&text("Full Name")), Category::Name);
    assert_eq!(
        classify(&FieldDescriptor::new("r", FieldType::Text).with_autocomplete("given-name")),
        Category::Name
    );
}

#[test]
fn organisation_and_referrer_names_are_not_personal_names() {
    assert_eq!(classify(&text("Company Name")), Category::CurrentCompany);
    assert_eq!(classify(&text("Referrer name")), Category::ReferralSource);
}

#[test]
fn phone_by_label_or_type() {
    assert_eq!(classify(&text("Mobile phone")), Category::Phone);
    assert_eq!(classify(&FieldDescriptor::new("r", FieldType::Tel)), Category::Phone);
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn social_links_beat_generic_website() {
    let twitter = FieldDescriptor::new("r", FieldType::Url).with_label("Twitter");
    let github = text("GitHub URL");
    let linkedin = text("LinkedIn Profile");

    assert_eq!(classify(&twitter), Category::TwitterUrl);
    assert_eq!(classify(&github), Category::GithubUrl);
    assert_eq!(classify(&linkedin), Category::LinkedinProfile);
}

#[test]
fn other_website_and_website_are_exclusive() {
    let other = text("Other website");
    let portfolio = FieldDescriptor::new("r", FieldType::Url).with_label("Portfolio");

    assert_eq!(classify(&other), Category::OtherWebsite);
    assert!(is_other_website(&other));
    assert!(!is_website(&other));

    assert_eq!(classify(&portfolio), Category::Website);
    assert!(!is_other_website(&portfolio));
}

// ============================================================================
// Self-identification and eligibility
// ============================================================================

#[test]
fn gender_select_and_veteran_radio() {
    let mut doc = document([
        labeled_select("gender", "Gender", &[("m", "Male"), ("f", "Female")]),
        radio_group("vet", "Are you a protected veteran?", &[("v-yes", "Yes"), ("v-no", "No")]),
    ]);
    let categorized = classify_all(&scan_fields(&mut doc));

    assert_eq!(categorized[0].category, Category::Gender);
    assert_eq!(categorized[1].category, Category::Veteran);
    assert_eq!(categorized[2].category, Category::Veteran);
}

#[test]
fn hispanic_option_inside_race_question_answers_race() {
    let in_race = choice(FieldType::Checkbox, "Hispanic or Latino", "What is your race?");
    let own_question = choice(FieldType::Radio, "Yes", "Are you Hispanic or Latino?");

    assert_eq!(classify(&in_race), Category::RaceEthnicity);
    assert_eq!(classify(&own_question), Category::HispanicLatino);
}

#[test]
fn sponsorship_and_authorization_are_distinguished() {
    let sponsorship = choice(
        FieldType::Radio,
        "Yes",
        "Will you now or in the future require visa sponsorship?",
    );
    let authorization = choice(
        FieldType::Radio,
        "Yes",
        "Are you legally authorized to work in the United States?",
    );

    assert_eq!(classify(&sponsorship), Category::Sponsorship);
    assert_eq!(classify(&authorization), Category::Authorization);
}

#[test]
fn disability_checkbox() {
    let field = choice(FieldType::Checkbox, "Yes, I have a disability", "Disability status");
    assert_eq!(classify(&field), Category::Disability);
}

// ============================================================================
// Employment, location and documents
// ============================================================================

#[test]
fn employment_questions() {
    assert_eq!(classify(&text("Desired salary")), Category::SalaryExpectations);
    assert_eq!(
        classify(&FieldDescriptor::new("r", FieldType::Select).with_label("How did you hear about us?")),
        Category::PositionDiscoverySource
    );
    assert_eq!(classify(&text("Current job title")), Category::CurrentJobTitle);
    assert_eq!(classify(&text("University")), Category::School);
}

#[test]
fn country_comes_before_location() {
    let country = FieldDescriptor::new("r", FieldType::Select).with_label("Country");
    assert_eq!(classify(&country), Category::Country);
    assert_eq!(classify(&text("Postal code")), Category::Location);
    assert_eq!(
        classify(&FieldDescriptor::new("r", FieldType::Text).with_name("current_city")),
        Category::Location
    );
}

#[test]
fn file_inputs_are_resume_uploads() {
    let file = FieldDescriptor::new("r", FieldType::File).with_label("Resume/CV");
    assert_eq!(classify(&file), Category::ResumeUpload);
}
