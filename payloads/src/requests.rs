use crate::ProjectId;
use serde::{Deserialize, Serialize};

/// Values of the merge request form as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateMergeRequest {
    pub project_id: ProjectId,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignee_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewer_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub milestone_id: Option<u64>,
}

/// Reasons a merge request cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a title")]
    MissingTitle,
    #[error("Please select a source branch")]
    MissingSourceBranch,
}

impl CreateMergeRequest {
    /// Checks run before anything is sent. The title is checked first so the
    /// user sees one message at a time.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.source_branch.is_empty() {
            return Err(ValidationError::MissingSourceBranch);
        }
        Ok(())
    }
}
