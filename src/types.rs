use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::registry::LogicalField;
use crate::utils::iso_timestamp;

/// The only failures that terminate a whole fill invocation. Both are still
/// reported to the caller as a single-error `FillResult`, never thrown past
/// the filler boundary.
#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("browser_launch: {0}")]
    BrowserLaunch(String),
    #[error("navigation: {0}")]
    Navigation(String),
}

/// What happened to one logical field during a fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// The element resolved by `selector` was written successfully.
    Filled { selector: String },
    /// No selector candidate resolved to an element.
    NotFound,
    /// An element resolved but writing to it failed.
    Failed(String),
}

/// Per-field record for one fill operation, aggregated into a `FillResult`.
#[derive(Debug, Clone)]
pub struct FillAttempt {
    pub field: LogicalField,
    pub tried: Vec<String>,
    pub outcome: FieldOutcome,
}

impl FillAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, FieldOutcome::Filled { .. })
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            FieldOutcome::Filled { .. } => None,
            FieldOutcome::NotFound if self.field == LogicalField::Resume => {
                Some("could not find file upload field".into())
            }
            FieldOutcome::NotFound => Some(format!("could not find field: {}", self.field)),
            FieldOutcome::Failed(msg) => Some(msg.clone()),
        }
    }
}

/// Outcome of one full form-fill operation. A pure value: built once,
/// returned, never mutated. `success` is strictly "no errors".
#[derive(Debug, Clone, Serialize)]
pub struct FillResult {
    pub success: bool,
    pub filled_fields: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
    pub timestamp: String,
}

impl FillResult {
    pub fn from_attempts(attempts: &[FillAttempt], screenshot: Option<PathBuf>) -> Self {
        let filled_fields = attempts
            .iter()
            .filter(|a| a.succeeded())
            .map(|a| a.field.as_str().to_string())
            .collect::<Vec<_>>();
        // encounter order is preserved
        let errors = attempts
            .iter()
            .filter_map(|a| a.error_message())
            .collect::<Vec<_>>();

        FillResult {
            success: errors.is_empty(),
            filled_fields,
            errors,
            screenshot_path: screenshot.map(|p| p.to_string_lossy().to_string()),
            timestamp: iso_timestamp(),
        }
    }

    /// Terminal single-error result for launch and navigation failures.
    pub fn failure(message: impl Into<String>) -> Self {
        FillResult {
            success: false,
            filled_fields: vec![],
            errors: vec![message.into()],
            screenshot_path: None,
            timestamp: iso_timestamp(),
        }
    }
}
