use crate::classify::patterns::*;
use crate::field::descriptor::{FieldDescriptor, FieldType};
use crate::pattern::Pattern;

// ============================================================================
// Preprocessed text
// ============================================================================

/// One text source, lowercased, with its separator-spaced variant.
#[derive(Debug, Clone, Default)]
struct Source {
    variants: Vec<String>,
}

impl Source {
    fn new(raw: Option<&str>) -> Self {
        let lower = raw.unwrap_or("").trim().to_lowercase();
        if lower.is_empty() {
            return Self::default();
        }
        let spaced = lower.replace(['_', '-'], " ");
        let mut variants = vec![lower];
        if spaced != variants[0] {
            variants.push(spaced);
        }
        Self { variants }
    }

    fn matches(&self, patterns: &[Pattern]) -> bool {
        self.variants
            .iter()
            .any(|v| patterns.iter().any(|p| p.is_match(v)))
    }

    fn contains(&self, needle: &str) -> bool {
        self.variants.iter().any(|v| v.contains(needle))
    }
}

/// Everything a predicate may look at, computed once per descriptor.
#[derive(Debug, Clone)]
pub struct FieldText {
    field_type: FieldType,
    declared_type: String,
    label: Source,
    name: Source,
    placeholder: Source,
    question: Source,
    autocomplete: Source,
}

impl FieldText {
    pub fn new(descriptor: &FieldDescriptor) -> Self {
        let label = descriptor
            .label
            .as_deref()
            .map(|l| l.trim().trim_end_matches('*').trim());

        Self {
            field_type: descriptor.field_type,
            declared_type: descriptor.declared_type.to_lowercase(),
            label: Source::new(label),
            name: Source::new(Some(&descriptor.name)),
            placeholder: Source::new(Some(&descriptor.placeholder)),
            question: Source::new(descriptor.whole_question_label.as_deref()),
            autocomplete: Source::new(Some(&descriptor.autocomplete)),
        }
    }

    fn is(&self, allowed: &[FieldType]) -> bool {
        allowed.contains(&self.field_type)
    }

    fn has_autocomplete(&self) -> bool {
        !self.autocomplete.variants.is_empty()
    }

    /// Label, name or placeholder matches.
    fn matches(&self, patterns: &[Pattern]) -> bool {
        self.label.matches(patterns)
            || self.name.matches(patterns)
            || self.placeholder.matches(patterns)
    }

    /// Like `matches`, but the group question counts too.
    fn matches_with_question(&self, patterns: &[Pattern]) -> bool {
        self.matches(patterns) || self.question.matches(patterns)
    }

    fn autocomplete_matches(&self, patterns: &[Pattern]) -> bool {
        self.autocomplete.matches(patterns)
    }

    fn name_or_label_contains(&self, needle: &str) -> bool {
        self.name.contains(needle) || self.label.contains(needle)
    }
}

use FieldType::*;

// ============================================================================
// Predicates over preprocessed text
// ============================================================================

pub(crate) fn name(t: &FieldText) -> bool {
    if t.declared_type == "email" {
        return false;
    }
    if t.matches(&COMPANY_NAME) || t.matches(&REFERRAL) {
        return false;
    }
    if t.field_type != Text && !t.has_autocomplete() {
        return false;
    }
    t.matches(&NAME) || t.autocomplete_matches(&NAME_AUTOCOMPLETE)
}

pub(crate) fn email(t: &FieldText) -> bool {
    if !t.is(&[Email, Text]) {
        return false;
    }
    t.declared_type == "email" || t.matches(&EMAIL) || t.autocomplete_matches(&EMAIL_AUTOCOMPLETE)
}

pub(crate) fn phone(t: &FieldText) -> bool {
    if !t.is(&[Tel, Text]) {
        return false;
    }
    t.declared_type == "tel" || t.matches(&PHONE) || t.autocomplete_matches(&PHONE_AUTOCOMPLETE)
}

pub(crate) fn linkedin_profile(t: &FieldText) -> bool {
    if !t.is(&[Url, Text, Textbox]) {
        return false;
    }
    t.matches(&LINKEDIN) || t.autocomplete.contains("linkedin")
}

pub(crate) fn twitter_url(t: &FieldText) -> bool {
    if !t.is(&[Url, Text]) {
        return false;
    }
    t.matches(&TWITTER)
        || t.autocomplete_matches(&TWITTER_AUTOCOMPLETE)
        || (t.declared_type == "url" && t.name_or_label_contains("twitter"))
}

pub(crate) fn github_url(t: &FieldText) -> bool {
    if !t.is(&[Url, Text]) {
        return false;
    }
    t.matches(&GITHUB)
        || t.autocomplete_matches(&GITHUB_AUTOCOMPLETE)
        || (t.declared_type == "url" && t.name_or_label_contains("github"))
}

pub(crate) fn other_website(t: &FieldText) -> bool {
    if !t.is(&[Url, Text]) {
        return false;
    }
    t.matches(&OTHER_WEBSITE)
}

pub(crate) fn website(t: &FieldText) -> bool {
    if other_website(t) || !t.is(&[Url, Text]) {
        return false;
    }
    t.declared_type == "url"
        || t.matches(&WEBSITE)
        || t.autocomplete_matches(&WEBSITE_AUTOCOMPLETE)
}

pub(crate) fn pronouns(t: &FieldText) -> bool {
    if !t.is(&[Text, Select, Radio]) {
        return false;
    }
    t.matches_with_question(&PRONOUNS) || t.autocomplete_matches(&PRONOUNS_AUTOCOMPLETE)
}

pub(crate) fn gender(t: &FieldText) -> bool {
    if !t.is(&[Select, Radio, Text]) {
        return false;
    }
    t.matches_with_question(&GENDER) || t.autocomplete_matches(&GENDER_AUTOCOMPLETE)
}

pub(crate) fn veteran(t: &FieldText) -> bool {
    if !t.is(&[Select, Radio, Checkbox]) {
        return false;
    }
    t.matches_with_question(&VETERAN) || t.autocomplete_matches(&VETERAN_AUTOCOMPLETE)
}

pub(crate) fn hispanic_latino(t: &FieldText) -> bool {
    if !t.is(&[Select, Radio, Checkbox]) {
        return false;
    }
    // A "Hispanic or Latino" option inside a race question answers the race question.
    if t.question.matches(&RACE_ETHNICITY) && !t.question.matches(&HISPANIC_LATINO) {
        return false;
    }
    t.matches_with_question(&HISPANIC_LATINO)
}

pub(crate) fn race_ethnicity(t: &FieldText) -> bool {
    if !t.is(&[Select, Radio, Checkbox]) {
        return false;
    }
    t.matches_with_question(&RACE_ETHNICITY)
        || t.autocomplete_matches(&RACE_ETHNICITY_AUTOCOMPLETE)
}

pub(crate) fn disability(t: &FieldText) -> bool {
    if !t.is(&[Select, Radio, Checkbox]) {
        return false;
    }
    t.matches_with_question(&DISABILITY) || t.autocomplete_matches(&DISABILITY_AUTOCOMPLETE)
}

pub(crate) fn sponsorship(t: &FieldText) -> bool {
    if !t.is(&[Text, Textbox, Select, Radio, Checkbox]) {
        return false;
    }
    if t.matches_with_question(&SPONSORSHIP_EXCLUDE) {
        return false;
    }
    t.matches_with_question(&SPONSORSHIP)
}

pub(crate) fn authorization(t: &FieldText) -> bool {
    if !t.is(&[Text, Textbox, Select, Radio, Checkbox]) {
        return false;
    }
    if t.matches_with_question(&SPONSORSHIP) {
        return false;
    }
    t.matches_with_question(&AUTHORIZATION)
}

pub(crate) fn salary_expectations(t: &FieldText) -> bool {
    if !t.is(&[Text, Number, Select]) {
        return false;
    }
    t.matches(&SALARY) || t.autocomplete_matches(&SALARY_AUTOCOMPLETE)
}

pub(crate) fn position_discovery_source(t: &FieldText) -> bool {
    if !t.is(&[Text, Select, Textbox]) {
        return false;
    }
    t.matches_with_question(&POSITION_DISCOVERY) || t.autocomplete_matches(&POSITION_DISCOVERY)
}

pub(crate) fn referral_source(t: &FieldText) -> bool {
    if !t.is(&[Text, Select, Textbox]) {
        return false;
    }
    if t.matches(&REFERRAL_EXCLUDE) {
        return false;
    }
    t.matches(&REFERRAL) || t.autocomplete_matches(&REFERRAL)
}

pub(crate) fn current_company(t: &FieldText) -> bool {
    if !t.is(&[Text, Select, Textbox]) {
        return false;
    }
    t.matches(&CURRENT_COMPANY) || t.autocomplete_matches(&CURRENT_COMPANY_AUTOCOMPLETE)
}

pub(crate) fn current_job_title(t: &FieldText) -> bool {
    if !t.is(&[Text, Select]) {
        return false;
    }
    if t.matches(&JOB_TITLE_EXCLUDE) {
        return false;
    }
    t.matches(&JOB_TITLE) || t.autocomplete_matches(&JOB_TITLE_AUTOCOMPLETE)
}

pub(crate) fn school(t: &FieldText) -> bool {
    t.is(&[Text, Select, Textbox]) && t.matches(&SCHOOL)
}

pub(crate) fn degree(t: &FieldText) -> bool {
    t.is(&[Text, Select]) && t.matches(&DEGREE)
}

pub(crate) fn discipline(t: &FieldText) -> bool {
    t.is(&[Text, Select]) && t.matches(&DISCIPLINE)
}

pub(crate) fn end_date_year(t: &FieldText) -> bool {
    t.is(&[Text, Select, Number]) && t.matches(&END_DATE_YEAR)
}

pub(crate) fn country(t: &FieldText) -> bool {
    if !t.is(&[Select, Text]) {
        return false;
    }
    t.matches(&COUNTRY) || t.autocomplete_matches(&COUNTRY_AUTOCOMPLETE)
}

pub(crate) fn location(t: &FieldText) -> bool {
    if !t.is(&[Select, Text]) {
        return false;
    }
    if t.matches(&LOCATION_EXCLUDE) {
        return false;
    }
    country(t) || t.matches(&LOCATION) || t.autocomplete_matches(&LOCATION_AUTOCOMPLETE)
}

pub(crate) fn resume_upload(t: &FieldText) -> bool {
    if t.declared_type == "file" {
        return true;
    }
    let eligible =
        t.declared_type == "button" || t.field_type == Text || t.declared_type == "textarea";
    eligible && t.matches_with_question(&RESUME)
}

// ============================================================================
// Public per-category checks
// ============================================================================

macro_rules! descriptor_predicates {
    ($($public:ident => $inner:ident),* $(,)?) => {
        $(
            pub fn $public(descriptor: &FieldDescriptor) -> bool {
                $inner(&FieldText::new(descriptor))
            }
        )*
    };
}

descriptor_predicates! {
    is_name => name,
    is_email => email,
    is_phone => phone,
    is_linkedin_profile => linkedin_profile,
    is_twitter_url => twitter_url,
    is_github_url => github_url,
    is_other_website => other_website,
    is_website => website,
    is_pronouns => pronouns,
    is_gender => gender,
    is_veteran => veteran,
    is_hispanic_latino => hispanic_latino,
    is_race_ethnicity => race_ethnicity,
    is_disability => disability,
    is_sponsorship => sponsorship,
    is_authorization => authorization,
    is_salary_expectations => salary_expectations,
    is_position_discovery_source => position_discovery_source,
    is_referral_source => referral_source,
    is_current_company => current_company,
    is_current_job_title => current_job_title,
    is_school => school,
    is_degree => degree,
    is_discipline => discipline,
    is_end_date_year => end_date_year,
    is_country => country,
    is_location => location,
    is_resume_upload => resume_upload,
}
