//! Maps a finished script run onto the HTTP outcome.
//!
//! Exactly one of: success, `Process` (non-zero exit), `Parse` (bad stdout),
//! `Upstream` (stdout carried an `error` field).

use serde_json::Value;

use crate::analysis::models::{TailoringResponse, UploadResponse};
use crate::errors::AppError;
use crate::runner::ProcessOutput;

/// Keyword flow: stdout is relayed as text, only the exit code matters.
pub fn map_keyword_output(output: ProcessOutput) -> Result<UploadResponse, AppError> {
    let output = require_success(output)?;
    Ok(UploadResponse::complete(output.stdout_text()))
}

/// Tailoring flow: stdout must be one JSON document of the tailoring shape.
pub fn map_tailoring_output(output: ProcessOutput) -> Result<TailoringResponse, AppError> {
    let output = require_success(output)?;

    let value: Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| AppError::Parse(format!("stdout is not JSON: {e}")))?;

    if let Some(detail) = reported_error(&value) {
        return Err(AppError::Upstream(detail));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::Parse(format!("unexpected result shape: {e}")))
}

fn require_success(output: ProcessOutput) -> Result<ProcessOutput, AppError> {
    if output.success() {
        Ok(output)
    } else {
        Err(AppError::Process {
            status: output.status,
            stderr: output.stderr_text(),
        })
    }
}

/// `{"error": ...}` with a non-null value.
fn reported_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
