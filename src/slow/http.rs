use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AutofillError, Result};
use crate::field::descriptor::MinifiedField;
use crate::field::schema::parse_instructions;
use crate::resolve::instruction::AutofillInstruction;
use crate::resolve::profile::UserPreferenceProfile;
use crate::slow::{SlowResolver, retain_requested};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Posts unresolved fields to an external resolution service. The client is
/// built once and reused for every request.
pub struct HttpResolver {
    endpoint: String,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest<'a> {
    fields: &'a [MinifiedField],
    user_preferences: &'a UserPreferenceProfile,
}

impl HttpResolver {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            timeout,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Accepts either a bare instruction array or `{"instructions": [...]}`.
    pub fn parse_response(body: &Value) -> Result<Vec<AutofillInstruction>> {
        match body.get("instructions") {
            Some(instructions) => parse_instructions(instructions),
            None => parse_instructions(body),
        }
    }
}

impl SlowResolver for HttpResolver {
    fn resolve(
        &self,
        fields: &[MinifiedField],
        profile: &UserPreferenceProfile,
    ) -> Result<Vec<AutofillInstruction>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        info!(endpoint = %self.endpoint, count = fields.len(), "requesting slow resolution");

        let request = ResolveRequest {
            fields,
            user_preferences: profile,
        };
        let response = self.client.post(&self.endpoint).json(&request).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutofillError::Resolver(format!(
                "{} answered {}",
                self.endpoint, status
            )));
        }

        let body: Value = response.json()?;
        let instructions = Self::parse_response(&body)?;
        debug!(count = instructions.len(), "slow resolution received");
        Ok(retain_requested(fields, instructions))
    }
}
