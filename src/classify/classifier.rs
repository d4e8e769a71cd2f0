use serde::Serialize;
use tracing::trace;

use crate::classify::category::Category;
use crate::classify::predicates::{self as p, FieldText};
use crate::field::descriptor::FieldDescriptor;

type Predicate = fn(&FieldText) -> bool;

/// Categories in the order they are tried. The first match wins, so moving an
/// entry changes how overlapping labels classify.
pub const PRIORITY: &[(Category, Predicate)] = &[
    (Category::Name, p::name),
    (Category::Email, p::email),
    (Category::Phone, p::phone),
    (Category::LinkedinProfile, p::linkedin_profile),
    (Category::TwitterUrl, p::twitter_url),
    (Category::GithubUrl, p::github_url),
    (Category::OtherWebsite, p::other_website),
    (Category::Website, p::website),
    (Category::Pronouns, p::pronouns),
    (Category::Gender, p::gender),
    (Category::Veteran, p::veteran),
    (Category::HispanicLatino, p::hispanic_latino),
    (Category::RaceEthnicity, p::race_ethnicity),
    (Category::Disability, p::disability),
    (Category::Sponsorship, p::sponsorship),
    (Category::Authorization, p::authorization),
    (Category::SalaryExpectations, p::salary_expectations),
    (Category::PositionDiscoverySource, p::position_discovery_source),
    (Category::ReferralSource, p::referral_source),
    (Category::CurrentCompany, p::current_company),
    (Category::CurrentJobTitle, p::current_job_title),
    (Category::School, p::school),
    (Category::Degree, p::degree),
    (Category::Discipline, p::discipline),
    (Category::EndDateYear, p::end_date_year),
    (Category::Country, p::country),
    (Category::Location, p::location),
    (Category::ResumeUpload, p::resume_upload),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedField {
    pub descriptor: FieldDescriptor,
    pub category: Category,
}

pub fn classify(descriptor: &FieldDescriptor) -> Category {
    let text = FieldText::new(descriptor);
    let category = PRIORITY
        .iter()
        .find(|(_, matches)| matches(&text))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown);

    trace!(
        reference_id = %descriptor.reference_id,
        category = %category,
        "field classified"
    );
    category
}

/// Classify every descriptor, keeping scan order.
pub fn classify_all(descriptors: &[FieldDescriptor]) -> Vec<CategorizedField> {
    descriptors
        .iter()
        .map(|d| CategorizedField {
            descriptor: d.clone(),
            category: classify(d),
        })
        .collect()
}
