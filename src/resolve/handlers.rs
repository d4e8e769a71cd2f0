use tracing::trace;

use crate::classify::Category;
use crate::field::descriptor::{FieldDescriptor, FieldType};
use crate::resolve::instruction::{AutofillInstruction, FILE_UPLOAD_SENTINEL};
use crate::resolve::profile::UserPreferenceProfile;

/// Stored value that ticks a checkbox for an enumerated category.
pub const AFFIRMATIVE: &str = "yes";

/// Preference order offered to "how did you hear about us" dropdowns.
pub const DISCOVERY_SELECT_VALUE: &str = "job board|linkedin|online|website|internet|other";
pub const DISCOVERY_TEXT_VALUE: &str = "linkedin";

// ============================================================================
// Field hints shared by resolve and persist
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NamePart {
    First,
    Last,
    Full,
}

fn lower(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Which part of a person's name a field asks for. The label decides; the
/// name attribute and autocomplete hint only fill in for a silent label.
pub(crate) fn name_part(d: &FieldDescriptor) -> Option<NamePart> {
    let from_text = |text: &str| {
        let text = lower(text).replace(['_', '-'], " ");
        if text.contains("first") || text.starts_with("fname") || text.contains("given") {
            Some(NamePart::First)
        } else if text.contains("last")
            || text.starts_with("lname")
            || text.contains("family")
            || text.contains("surname")
        {
            Some(NamePart::Last)
        } else if text.contains("full") {
            Some(NamePart::Full)
        } else {
            None
        }
    };

    let label = lower(d.label_text());
    if !label.is_empty() {
        return from_text(&label);
    }
    from_text(&d.name).or_else(|| match lower(&d.autocomplete).as_str() {
        "given-name" => Some(NamePart::First),
        "family-name" => Some(NamePart::Last),
        "name" => Some(NamePart::Full),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationPart {
    Country,
    City,
    State,
    PostalCode,
    Address,
}

impl LocationPart {
    pub(crate) fn path(&self) -> &'static str {
        match self {
            LocationPart::Country => "location/country",
            LocationPart::City => "location/city",
            LocationPart::State => "location/state",
            LocationPart::PostalCode => "location/postal_code",
            LocationPart::Address => "location/address",
        }
    }
}

fn location_sources(d: &FieldDescriptor) -> [String; 4] {
    [
        lower(d.label_text()),
        lower(&d.name).replace(['_', '-'], " "),
        lower(&d.placeholder),
        lower(&d.autocomplete),
    ]
}

/// Location sub-field named by the field, if any. Address needs an
/// address-shaped phrase; anything else stays `None`.
pub(crate) fn location_part(d: &FieldDescriptor) -> Option<LocationPart> {
    let sources = location_sources(d);
    let any = |needles: &[&str]| {
        sources
            .iter()
            .any(|s| needles.iter().any(|n| s.contains(n)))
    };

    if any(&["country"]) {
        return Some(LocationPart::Country);
    }
    if any(&["city"]) {
        return Some(LocationPart::City);
    }
    if any(&["state", "province", "region"]) {
        return Some(LocationPart::State);
    }
    if any(&["postal", "zip"]) {
        return Some(LocationPart::PostalCode);
    }

    let address_like = sources.iter().any(|s| {
        s == "address"
            || s.starts_with("address ")
            || s.ends_with(" address")
            || ["mailing address", "street address", "home address", "current address"]
                .iter()
                .any(|p| s.contains(p))
            || s.starts_with("address-line")
            || s == "street-address"
    });
    address_like.then_some(LocationPart::Address)
}

/// Persist side of the location lookup: anything with address or street
/// wording, and otherwise the address bag.
pub(crate) fn location_save_part(d: &FieldDescriptor) -> LocationPart {
    location_part(d).unwrap_or(LocationPart::Address)
}

pub(crate) fn is_phone_extension(d: &FieldDescriptor) -> bool {
    [d.label_text(), d.name.as_str(), d.placeholder.as_str()]
        .iter()
        .map(|s| lower(s).replace(['_', '-'], " "))
        .any(|s| s.split_whitespace().any(|w| w == "ext" || w.starts_with("extension")))
}

pub(crate) fn is_phone_type(d: &FieldDescriptor) -> bool {
    let mentions_type = [d.label_text(), d.name.as_str(), d.placeholder.as_str()]
        .iter()
        .map(|s| lower(s).replace(['_', '-'], " "))
        .any(|s| s.split_whitespace().any(|w| w == "type"));
    mentions_type || matches!(d.field_type, FieldType::Select | FieldType::Radio)
}

fn label_has_word(d: &FieldDescriptor, word: &str) -> bool {
    lower(d.label_text())
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

/// "Yes" or "I am authorized" options affirm the question.
pub(crate) fn is_positive_authorization(d: &FieldDescriptor) -> bool {
    let label = lower(d.label_text());
    label_has_word(d, "yes") || label.contains("i am authorized") || label.contains("authorized to work")
}

pub(crate) fn is_positive_sponsorship(d: &FieldDescriptor) -> bool {
    let label = lower(d.label_text());
    label_has_word(d, "yes")
        || label.contains("i require sponsorship")
        || label.contains("i require immigration sponsorship")
}

// ============================================================================
// Resolve
// ============================================================================

fn fill_or_skip(d: &FieldDescriptor, value: Option<&String>) -> AutofillInstruction {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => AutofillInstruction::fill(&d.reference_id, v.as_str()),
        None => AutofillInstruction::skip(&d.reference_id),
    }
}

/// Enumerated answers: dropdowns, radios and text take the raw value, and a
/// checkbox is ticked only for the affirmative sentinel.
fn resolve_enumerated(d: &FieldDescriptor, value: Option<&String>) -> AutofillInstruction {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return AutofillInstruction::skip(&d.reference_id);
    };
    match d.field_type {
        FieldType::Select | FieldType::Radio | FieldType::Text => {
            AutofillInstruction::fill(&d.reference_id, value.as_str())
        }
        FieldType::Checkbox if value == AFFIRMATIVE => AutofillInstruction::check(&d.reference_id),
        FieldType::Checkbox => AutofillInstruction::clear(&d.reference_id),
        _ => AutofillInstruction::skip(&d.reference_id),
    }
}

fn resolve_name(d: &FieldDescriptor, profile: &UserPreferenceProfile) -> AutofillInstruction {
    if d.field_type != FieldType::Text {
        return AutofillInstruction::skip(&d.reference_id);
    }
    let name = profile.name.clone().unwrap_or_default();
    match name_part(d) {
        Some(NamePart::First) => fill_or_skip(d, name.first_name.as_ref()),
        Some(NamePart::Last) => fill_or_skip(d, name.last_name.as_ref()),
        Some(NamePart::Full) if name.first_name.is_some() || name.last_name.is_some() => {
            let full = format!(
                "{} {}",
                name.first_name.unwrap_or_default(),
                name.last_name.unwrap_or_default()
            );
            AutofillInstruction::fill(&d.reference_id, full)
        }
        _ => AutofillInstruction::skip(&d.reference_id),
    }
}

fn resolve_phone(d: &FieldDescriptor, profile: &UserPreferenceProfile) -> AutofillInstruction {
    let phone = profile.phone.clone().unwrap_or_default();
    if is_phone_extension(d) {
        return fill_or_skip(d, phone.extension.as_ref());
    }
    if is_phone_type(d) {
        return fill_or_skip(d, phone.kind.as_ref());
    }
    fill_or_skip(d, phone.phone_num.as_ref())
}

fn resolve_location(d: &FieldDescriptor, profile: &UserPreferenceProfile) -> AutofillInstruction {
    let location = profile.location.clone().unwrap_or_default();
    match location_part(d) {
        Some(LocationPart::Country) => fill_or_skip(d, location.country.as_ref()),
        Some(LocationPart::City) => fill_or_skip(d, location.city.as_ref()),
        Some(LocationPart::State) => fill_or_skip(d, location.state.as_ref()),
        Some(LocationPart::PostalCode) => fill_or_skip(d, location.postal_code.as_ref()),
        Some(LocationPart::Address) => fill_or_skip(d, location.address.as_ref()),
        None => {
            let full = [
                location.address,
                location.city,
                location.state,
                location.postal_code,
            ]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
            fill_or_skip(d, Some(&full))
        }
    }
}

fn resolve_authorization(d: &FieldDescriptor, profile: &UserPreferenceProfile) -> AutofillInstruction {
    let Some(value) = profile.authorization.as_ref().filter(|v| !v.is_empty()) else {
        return AutofillInstruction::skip(&d.reference_id);
    };
    match d.field_type {
        FieldType::Radio | FieldType::Checkbox => {
            let authorized = value.eq_ignore_ascii_case(AFFIRMATIVE);
            if is_positive_authorization(d) == authorized {
                AutofillInstruction::check(&d.reference_id)
            } else {
                AutofillInstruction::skip(&d.reference_id)
            }
        }
        FieldType::Select | FieldType::Text | FieldType::Textbox => {
            AutofillInstruction::fill(&d.reference_id, value.as_str())
        }
        _ => AutofillInstruction::skip(&d.reference_id),
    }
}

fn resolve_sponsorship(d: &FieldDescriptor, profile: &UserPreferenceProfile) -> AutofillInstruction {
    let sponsorship = profile.sponsorship.clone().unwrap_or_default();
    match d.field_type {
        FieldType::Radio | FieldType::Checkbox => match sponsorship.yes_no_answer {
            Some(required) if is_positive_sponsorship(d) == required => {
                AutofillInstruction::check(&d.reference_id)
            }
            _ => AutofillInstruction::skip(&d.reference_id),
        },
        // Canonical keys, expanded to yes/no phrasings by the option matcher.
        FieldType::Select => match sponsorship.yes_no_answer {
            Some(true) => AutofillInstruction::fill(&d.reference_id, "true"),
            Some(false) => AutofillInstruction::fill(&d.reference_id, "false"),
            None => AutofillInstruction::skip(&d.reference_id),
        },
        FieldType::Text | FieldType::Textbox => fill_or_skip(d, sponsorship.text.as_ref()),
        _ => AutofillInstruction::skip(&d.reference_id),
    }
}

/// Instruction for one categorized field. Pure: reads the profile, touches
/// nothing else.
pub fn resolve(
    category: Category,
    d: &FieldDescriptor,
    profile: &UserPreferenceProfile,
) -> AutofillInstruction {
    let instruction = match category {
        Category::Name => resolve_name(d, profile),
        Category::Email => fill_or_skip(d, profile.email.as_ref()),
        Category::Phone => resolve_phone(d, profile),
        Category::Gender => resolve_enumerated(d, profile.gender.as_ref()),
        Category::Veteran => resolve_enumerated(d, profile.veteran.as_ref()),
        Category::RaceEthnicity => resolve_enumerated(d, profile.race_ethnicity.as_ref()),
        Category::HispanicLatino => resolve_enumerated(d, profile.hispanic_latino.as_ref()),
        Category::Disability => resolve_enumerated(d, profile.disability.as_ref()),
        Category::Country => fill_or_skip(
            d,
            profile.location.as_ref().and_then(|l| l.country.as_ref()),
        ),
        Category::Location => resolve_location(d, profile),
        Category::Authorization => resolve_authorization(d, profile),
        Category::Sponsorship => resolve_sponsorship(d, profile),
        Category::LinkedinProfile => fill_or_skip(d, profile.linkedin_profile.as_ref()),
        Category::TwitterUrl => fill_or_skip(d, profile.twitter_url.as_ref()),
        Category::GithubUrl => fill_or_skip(d, profile.github_url.as_ref()),
        Category::Website => fill_or_skip(d, profile.website.as_ref()),
        Category::OtherWebsite => fill_or_skip(d, profile.other_website.as_ref()),
        Category::SalaryExpectations => fill_or_skip(d, profile.salary_expectations.as_ref()),
        Category::CurrentCompany => fill_or_skip(d, profile.current_company.as_ref()),
        Category::CurrentJobTitle => fill_or_skip(d, profile.current_job_title.as_ref()),
        Category::Pronouns => fill_or_skip(d, profile.pronouns.as_ref()),
        Category::School => fill_or_skip(d, profile.school.as_ref()),
        Category::Degree => fill_or_skip(d, profile.degree.as_ref()),
        Category::Discipline => fill_or_skip(d, profile.discipline.as_ref()),
        Category::EndDateYear => fill_or_skip(d, profile.end_date_year.as_ref()),
        Category::PositionDiscoverySource => {
            let value = if d.field_type == FieldType::Select {
                DISCOVERY_SELECT_VALUE
            } else {
                DISCOVERY_TEXT_VALUE
            };
            AutofillInstruction::fill(&d.reference_id, value)
        }
        Category::ReferralSource => AutofillInstruction::skip(&d.reference_id),
        Category::ResumeUpload => AutofillInstruction::fill(&d.reference_id, FILE_UPLOAD_SENTINEL),
        Category::Unknown => AutofillInstruction::skip(&d.reference_id),
    };

    trace!(
        reference_id = %d.reference_id,
        category = %category,
        action = %instruction.action,
        "instruction resolved"
    );
    instruction
}
