use crate::RemoteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MAX_SCORE: u8 = 100;

/// Alignment of the submitted profile with a single role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role: String,
    pub score: u8,
    #[serde(default)]
    pub matched_skills: BTreeSet<String>,
    #[serde(default)]
    pub missing_skills: BTreeSet<String>,
    #[serde(default)]
    pub improvement_steps: Vec<String>,
}

/// Structured evaluation returned by the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub roles: Vec<Role>,
    /// The service is allowed to send `null` here
    #[serde(default)]
    pub best_fit: Option<String>,
    pub summary: String,
}

impl EvaluationResult {
    /// Decode and validate a success body.
    pub fn from_slice(body: &[u8]) -> Result<Self, RemoteError> {
        let result: EvaluationResult = serde_json::from_slice(body)
            .map_err(|e| RemoteError::Malformed(format!("Failed to decode evaluation: {}", e)))?;
        result.validate()?;
        Ok(result)
    }

    /// A successful evaluation carries at least one role and every score is within 0..=100.
    pub fn validate(&self) -> Result<(), RemoteError> {
        if self.roles.is_empty() {
            return Err(RemoteError::Malformed("Evaluation contains no roles".to_string()));
        }

        if let Some(role) = self.roles.iter().find(|r| r.score > MAX_SCORE) {
            return Err(RemoteError::Malformed(format!(
                "Score {} for '{}' is outside 0..={}",
                role.score, role.role, MAX_SCORE
            )));
        }

        Ok(())
    }

    pub fn find_role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.role == name)
    }

    /// Role named by `best_fit`, falling back to the highest score.
    pub fn best_role(&self) -> Option<&Role> {
        self.best_fit
            .as_deref()
            .and_then(|name| self.find_role(name))
            .or_else(|| self.roles.iter().max_by_key(|r| r.score))
    }
}
