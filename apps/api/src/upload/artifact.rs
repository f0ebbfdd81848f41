use std::path::Path;

use bytes::Bytes;

use crate::errors::AppError;

/// File extensions accepted for uploaded artifacts (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "doc", "docx", "pdf"];

/// Extension used when staging inline text.
const TEXT_EXTENSION: &str = "txt";

/// One side of an upload: either a file part or an inline text field.
#[derive(Debug, Clone)]
pub enum Artifact {
    File { file_name: String, data: Bytes },
    Text(String),
}

impl Artifact {
    pub fn is_empty(&self) -> bool {
        match self {
            Artifact::File { data, .. } => data.is_empty(),
            Artifact::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Artifact::File { data, .. } => data,
            Artifact::Text(text) => text.as_bytes(),
        }
    }

    /// Returns the lowercased extension the artifact will be staged with,
    /// rejecting file names outside [`ALLOWED_EXTENSIONS`].
    pub fn checked_extension(&self, label: &str) -> Result<String, AppError> {
        let file_name = match self {
            Artifact::Text(_) => return Ok(TEXT_EXTENSION.to_string()),
            Artifact::File { file_name, .. } => file_name,
        };

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(AppError::Validation(format!(
                "Unsupported file type for {label}: '{file_name}'. Allowed: {}",
                allowed_list()
            )))
        }
    }

    /// Decodes the artifact as text, for flows that pass the content itself
    /// as a process argument rather than a staged path. Binary documents and
    /// NUL bytes cannot travel that way.
    pub fn text(&self, label: &str) -> Result<String, AppError> {
        let text = match self {
            Artifact::Text(text) => text.clone(),
            Artifact::File { file_name, data } => {
                String::from_utf8(data.to_vec()).map_err(|_| {
                    AppError::Validation(format!(
                        "This endpoint only accepts the {label} as plain text, inline or as \
                         a .txt file; '{file_name}' is not plain text"
                    ))
                })?
            }
        };

        if text.contains('\0') {
            return Err(AppError::Validation(format!(
                "The {label} must not contain NUL characters"
            )));
        }
        Ok(text)
    }
}

fn allowed_list() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}
