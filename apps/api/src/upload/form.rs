use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;
use crate::upload::artifact::Artifact;

const MISSING_ARTIFACTS: &str = "Both resume and job description are required";

/// Multipart field names for one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FormFields {
    pub resume: &'static str,
    pub job_description: &'static str,
}

/// Fields of `POST /uploads`.
pub const KEYWORD_FIELDS: FormFields = FormFields {
    resume: "resume",
    job_description: "job_description",
};

/// Fields of `POST /api/tailor-resume`.
pub const TAILOR_FIELDS: FormFields = FormFields {
    resume: "resume",
    job_description: "jobDescription",
};

/// Raw form contents before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<Artifact>,
    pub job_description: Option<Artifact>,
}

/// A form with both artifacts present and their staging extensions checked.
#[derive(Debug)]
pub struct ValidatedUpload {
    pub resume: Artifact,
    pub resume_ext: String,
    pub job_description: Artifact,
    pub job_description_ext: String,
}

impl UploadForm {
    /// Reads every field of the multipart body into memory.
    pub async fn read(mut multipart: Multipart, fields: FormFields) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Failed to read multipart field", e))?
        {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(&format!("Failed to read field '{name}'"), e))?;

            form.accept(fields, &name, file_name, data)?;
        }

        Ok(form)
    }

    fn accept(
        &mut self,
        fields: FormFields,
        name: &str,
        file_name: Option<String>,
        data: Bytes,
    ) -> Result<(), AppError> {
        let slot = if name == fields.resume {
            &mut self.resume
        } else if name == fields.job_description {
            &mut self.job_description
        } else {
            warn!("Ignoring unknown multipart field: {name}");
            return Ok(());
        };

        let artifact = match file_name {
            Some(file_name) => Artifact::File { file_name, data },
            None => Artifact::Text(String::from_utf8(data.to_vec()).map_err(|_| {
                AppError::Validation(format!("Field '{name}' must be UTF-8 text"))
            })?),
        };
        *slot = Some(artifact);
        Ok(())
    }

    /// Presence first, then extensions. Nothing is written before this passes.
    pub fn validate(self) -> Result<ValidatedUpload, AppError> {
        let (Some(resume), Some(job_description)) = (
            self.resume.filter(|a| !a.is_empty()),
            self.job_description.filter(|a| !a.is_empty()),
        ) else {
            return Err(AppError::Validation(MISSING_ARTIFACTS.to_string()));
        };

        let resume_ext = resume.checked_extension("resume")?;
        let job_description_ext = job_description.checked_extension("job description")?;

        Ok(ValidatedUpload {
            resume,
            resume_ext,
            job_description,
            job_description_ext,
        })
    }
}

fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let message = format!("{context}: {}", e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(parts: &[(&str, Option<&str>, &'static str)]) -> UploadForm {
        let mut form = UploadForm::default();
        for (name, file_name, body) in parts {
            form.accept(
                TAILOR_FIELDS,
                name,
                file_name.map(str::to_string),
                Bytes::copy_from_slice(body.as_bytes()),
            )
            .unwrap();
        }
        form
    }

    #[test]
    fn test_file_and_text_fields_accepted() {
        let upload = form_with(&[
            ("resume", Some("cv.pdf"), "%PDF-1.4"),
            ("jobDescription", None, "Senior Rust engineer"),
        ])
        .validate()
        .unwrap();

        assert_eq!(upload.resume_ext, "pdf");
        assert_eq!(upload.job_description_ext, "txt");
    }

    #[test]
    fn test_missing_job_description_rejected() {
        let err = form_with(&[("resume", Some("cv.txt"), "Jane Doe")])
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_ARTIFACTS));
    }

    #[test]
    fn test_empty_inline_text_counts_as_missing() {
        let err = form_with(&[
            ("resume", None, "   "),
            ("jobDescription", None, "Backend role"),
        ])
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_field_names_are_per_endpoint() {
        // `job_description` belongs to the keyword endpoint, not the tailoring one.
        let err = form_with(&[
            ("resume", Some("cv.txt"), "Jane Doe"),
            ("job_description", None, "Backend role"),
        ])
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_disallowed_extension_rejected() {
        let err = form_with(&[
            ("resume", Some("cv.txt"), "Jane Doe"),
            ("jobDescription", Some("jd.html"), "<p>role</p>"),
        ])
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("jd.html")));
    }

    #[test]
    fn test_repeated_field_keeps_last() {
        let upload = form_with(&[
            ("resume", Some("old.txt"), "old"),
            ("resume", Some("new.docx"), "new"),
            ("jobDescription", None, "role"),
        ])
        .validate()
        .unwrap();
        assert_eq!(upload.resume_ext, "docx");
        assert_eq!(upload.resume.bytes(), b"new");
    }
}
