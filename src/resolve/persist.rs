use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::Category;
use crate::field::descriptor::{FieldDescriptor, FieldType};
use crate::resolve::handlers::{
    NamePart, is_phone_extension, is_phone_type, is_positive_authorization,
    is_positive_sponsorship, location_save_part, name_part,
};
use crate::resolve::store::PreferenceStore;

pub const RESUME_VALUE_PATH: &str = "resume_upload";
pub const RESUME_SKIPPED_VALUE: &str = "skipped_saving_file_input";

/// Result of saving one field's value back to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SaveOutcome {
    #[serde(rename_all = "camelCase")]
    Success { value_path: String, value: Value },
    Error { error: String },
}

impl SaveOutcome {
    fn success(path: &str, value: impl Into<Value>) -> Self {
        SaveOutcome::Success {
            value_path: path.to_string(),
            value: value.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        SaveOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Success { .. })
    }
}

/// Where a field's value goes, or why it goes nowhere.
enum Target {
    Write(&'static str, Value),
    Done(SaveOutcome),
}

fn simple_path(category: Category) -> Option<&'static str> {
    let path = match category {
        Category::Email => "email",
        Category::Pronouns => "pronouns",
        Category::Gender => "gender",
        Category::Veteran => "veteran",
        Category::RaceEthnicity => "race_ethnicity",
        Category::HispanicLatino => "hispanic_latino",
        Category::Disability => "disability",
        Category::LinkedinProfile => "linkedin_profile",
        Category::Website => "website",
        Category::OtherWebsite => "other_website",
        Category::TwitterUrl => "twitter_url",
        Category::GithubUrl => "github_url",
        Category::CurrentCompany => "current_company",
        Category::CurrentJobTitle => "current_job_title",
        Category::SalaryExpectations => "salary_expectations",
        Category::School => "school",
        Category::Degree => "degree",
        Category::Discipline => "discipline",
        Category::EndDateYear => "end_date_year",
        Category::Country => "location/country",
        _ => return None,
    };
    Some(path)
}

fn is_checked(d: &FieldDescriptor) -> bool {
    d.current_value == "true"
}

/// Text worth saving for this field. A ticked radio or checkbox stands for
/// its own label.
fn saved_text(d: &FieldDescriptor) -> Option<String> {
    let text = if d.field_type.is_choice() {
        if !is_checked(d) {
            return None;
        }
        d.label_text().trim().to_string()
    } else {
        d.current_value.trim().to_string()
    };
    (!text.is_empty()).then_some(text)
}

fn target(category: Category, d: &FieldDescriptor) -> Target {
    match category {
        Category::PositionDiscoverySource => {
            return Target::Done(SaveOutcome::error("Position discovery source is not saved"));
        }
        Category::ReferralSource => {
            return Target::Done(SaveOutcome::error("Referral source is not saved"));
        }
        Category::ResumeUpload => {
            return Target::Done(SaveOutcome::success(RESUME_VALUE_PATH, RESUME_SKIPPED_VALUE));
        }
        Category::Unknown => return Target::Done(SaveOutcome::error("Unknown input category")),
        _ => {}
    }

    match category {
        Category::Authorization if d.field_type.is_choice() => {
            return if is_checked(d) {
                let answer = if is_positive_authorization(d) { "yes" } else { "no" };
                Target::Write("authorization", Value::from(answer))
            } else {
                Target::Done(SaveOutcome::error("Authorization value not set"))
            };
        }
        Category::Sponsorship if d.field_type.is_choice() => {
            return if is_positive_sponsorship(d) {
                Target::Write("sponsorship/yesNoAnswer", Value::Bool(is_checked(d)))
            } else {
                Target::Done(SaveOutcome::error("Failed to save sponsorship autofill value"))
            };
        }
        _ => {}
    }

    let Some(text) = saved_text(d) else {
        return Target::Done(SaveOutcome::error("element value is empty"));
    };

    match category {
        Category::Name => match name_part(d) {
            Some(NamePart::First) => Target::Write("name/first_name", Value::from(text)),
            Some(NamePart::Last) => Target::Write("name/last_name", Value::from(text)),
            _ => Target::Done(SaveOutcome::error("Failed to save name autofill value")),
        },
        Category::Phone => {
            if is_phone_extension(d) {
                return Target::Write("phone/extension", Value::from(text));
            }
            let kind = text.to_lowercase();
            if is_phone_type(d) && (kind == "mobile" || kind == "landline") {
                return Target::Write("phone/type", Value::from(kind));
            }
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                Target::Done(SaveOutcome::error("element value is empty"))
            } else {
                Target::Write("phone/phoneNum", Value::from(digits))
            }
        }
        Category::Location => Target::Write(location_save_part(d).path(), Value::from(text)),
        Category::Authorization => Target::Write("authorization", Value::from(text.to_lowercase())),
        Category::Sponsorship => match d.field_type {
            FieldType::Text | FieldType::Textbox | FieldType::Select => {
                Target::Write("sponsorship/text", Value::from(text))
            }
            _ => Target::Done(SaveOutcome::error("Failed to save sponsorship autofill value")),
        },
        other => match simple_path(other) {
            Some(path) => Target::Write(path, Value::from(text)),
            None => Target::Done(SaveOutcome::error("Unknown input category")),
        },
    }
}

/// Save the value a user typed into a categorized field.
///
/// Never fails outright: store errors come back as an error outcome so one
/// bad field does not stop the rest of a save pass.
pub fn persist(
    category: Category,
    d: &FieldDescriptor,
    user_id: &str,
    store: &dyn PreferenceStore,
) -> SaveOutcome {
    match target(category, d) {
        Target::Done(outcome) => {
            debug!(reference_id = %d.reference_id, category = %category, ?outcome, "nothing to save");
            outcome
        }
        Target::Write(path, value) => match store.write(user_id, path, &value) {
            Ok(()) => SaveOutcome::success(path, value),
            Err(e) => {
                warn!(reference_id = %d.reference_id, path, error = %e, "failed to save value");
                SaveOutcome::error(e.to_string())
            }
        },
    }
}
