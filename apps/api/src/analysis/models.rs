use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result document of the tailoring script.
///
/// The named fields are required; anything else the script emits is kept in
/// `extra` so the document round-trips to the client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TailoringResponse {
    pub job_analysis: JobAnalysis,
    pub suggestions: String,
    pub tailored_resume: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_resume: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobAnalysis {
    pub analysis: String,
    /// e.g. ranked `[keyword, count]` pairs.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful `POST /uploads`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Raw stdout of the keyword script.
    pub output: String,
}

impl UploadResponse {
    pub fn complete(output: String) -> Self {
        Self {
            success: true,
            message: "Processing complete.".to_string(),
            output,
        }
    }
}
