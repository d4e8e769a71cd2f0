pub mod http;

pub use http::HttpResolver;

use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::field::descriptor::MinifiedField;
use crate::resolve::instruction::AutofillInstruction;
use crate::resolve::profile::UserPreferenceProfile;

// ============================================================================
// SlowResolver trait: external resolution for fields the heuristics left
// unfilled
// ============================================================================

pub trait SlowResolver {
    fn resolve(
        &self,
        fields: &[MinifiedField],
        profile: &UserPreferenceProfile,
    ) -> Result<Vec<AutofillInstruction>>;
}

/// Keep only instructions addressed to fields that were actually sent.
pub fn retain_requested(
    fields: &[MinifiedField],
    instructions: Vec<AutofillInstruction>,
) -> Vec<AutofillInstruction> {
    let requested: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    instructions
        .into_iter()
        .filter(|i| {
            let known = requested.contains(i.reference_id.as_str());
            if !known {
                warn!(reference_id = %i.reference_id, "resolver answered for a field it was not sent");
            }
            known
        })
        .collect()
}

// ============================================================================
// Mock resolver (for testing without a service)
// ============================================================================

/// Returns canned instructions and records what it was asked.
#[derive(Debug, Default)]
pub struct MockResolver {
    pub instructions: Vec<AutofillInstruction>,
    pub requests: std::sync::Mutex<Vec<Vec<MinifiedField>>>,
}

impl MockResolver {
    pub fn new(instructions: Vec<AutofillInstruction>) -> Self {
        Self {
            instructions,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Field ids of every request so far, in order.
    pub fn requested_ids(&self) -> Vec<Vec<String>> {
        self.requests
            .lock()
            .map(|r| {
                r.iter()
                    .map(|batch| batch.iter().map(|f| f.id.clone()).collect())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SlowResolver for MockResolver {
    fn resolve(
        &self,
        fields: &[MinifiedField],
        _profile: &UserPreferenceProfile,
    ) -> Result<Vec<AutofillInstruction>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(fields.to_vec());
        }
        Ok(retain_requested(fields, self.instructions.clone()))
    }
}
