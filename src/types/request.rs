use crate::error::{PrScoreError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub filename: String,
    pub status: FileStatus,
}

impl FileChange {
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
        }
    }
}

/// Reference to a test file accompanying the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReference {
    pub filename: String,
}

/// Ticket metadata supplied by the ticket-system client. Fields are taken
/// as-is; nothing here checks them against the ticket system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketContext {
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub ticket_status: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// A code change submitted for scoring.
///
/// Built at the serving boundary, either from JSON via [`ChangeRequest::from_json`]
/// or programmatically, and checked with [`ChangeRequest::validate`] before it
/// reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Vec<FileChange>,
    #[serde(default)]
    pub tests: Vec<TestReference>,
    #[serde(default)]
    pub ticket: Option<TicketContext>,
}

impl ChangeRequest {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            files: Vec::new(),
            tests: Vec::new(),
            ticket: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_file(mut self, filename: impl Into<String>, status: FileStatus) -> Self {
        self.files.push(FileChange::new(filename, status));
        self
    }

    pub fn with_test(mut self, filename: impl Into<String>) -> Self {
        self.tests.push(TestReference {
            filename: filename.into(),
        });
        self
    }

    pub fn with_ticket(mut self, ticket: TicketContext) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Parses and validates a request payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let request: ChangeRequest = serde_json::from_str(payload)
            .map_err(|e| PrScoreError::RequestParse(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Description text, empty when none was supplied.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PrScoreError::InvalidRequest(
                "id must be a non-empty identifier".to_string(),
            ));
        }
        if let Some(index) = self
            .files
            .iter()
            .position(|file| file.filename.trim().is_empty())
        {
            return Err(PrScoreError::InvalidRequest(format!(
                "files[{index}].filename must be non-empty"
            )));
        }
        if let Some(index) = self
            .tests
            .iter()
            .position(|test| test.filename.trim().is_empty())
        {
            return Err(PrScoreError::InvalidRequest(format!(
                "tests[{index}].filename must be non-empty"
            )));
        }
        Ok(())
    }
}
