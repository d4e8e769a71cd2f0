use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AutofillError, Result};

/// A user's stored answers. Every leaf is optional; absence means no value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferenceProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veteran: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hispanic_latino: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsorship: Option<SponsorshipProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_expectations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneProfile {
    #[serde(
        rename = "phoneNum",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// `mobile` or `landline`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SponsorshipProfile {
    #[serde(rename = "yesNoAnswer", skip_serializing_if = "Option::is_none")]
    pub yes_no_answer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Phone numbers arrive as either JSON numbers or strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl UserPreferenceProfile {
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| AutofillError::json("profile", e))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Object(Map::new()))
    }

    /// Value stored at a `/`-separated path such as `name/first_name`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let mut current = self.to_json();
        for segment in segments(path) {
            current = current.get(segment)?.clone();
        }
        (!current.is_null()).then_some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Write `value` at `path`, creating intermediate records. The result
    /// must still be a valid profile, so a string written to a boolean leaf
    /// is rejected.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let parts = segments(path);
        let Some((last, parents)) = parts.split_last() else {
            return Err(AutofillError::Store("empty profile path".to_string()));
        };

        let mut root = self.to_json();
        let mut cursor = &mut root;
        for segment in parents {
            let map = cursor
                .as_object_mut()
                .ok_or_else(|| AutofillError::Store(format!("'{}' is not a record", path)))?;
            cursor = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if cursor.is_null() {
                *cursor = Value::Object(Map::new());
            }
        }
        cursor
            .as_object_mut()
            .ok_or_else(|| AutofillError::Store(format!("'{}' is not a record", path)))?
            .insert(last.to_string(), value);

        *self = serde_json::from_value(root)
            .map_err(|e| AutofillError::Store(format!("cannot write '{}': {}", path, e)))?;
        Ok(())
    }
}
