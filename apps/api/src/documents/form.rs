//! Multipart body → files + optional job context.

use axum::extract::Multipart;
use tracing::{debug, warn};

use crate::documents::models::{JobContext, UploadedFile};
use crate::errors::AppError;

/// Form field names accepted for the JSON-encoded job context.
pub const JOB_CONTEXT_FIELDS: &[&str] = &["job_ad_text", "job_context"];

#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub job: Option<JobContext>,
}

/// Collects every part with a filename as a file (empty files are dropped)
/// and decodes the job-context text field. A job context that is not valid
/// JSON is logged and ignored.
pub async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let declared_type = field.content_type().map(str::to_string);
            let content = field.bytes().await.map_err(|e| {
                AppError::Validation(format!("Failed to read file '{file_name}': {e}"))
            })?;
            if content.is_empty() {
                debug!("Skipping empty file part '{file_name}'");
                continue;
            }
            form.files.push(UploadedFile {
                name: file_name,
                declared_type,
                content,
            });
        } else if JOB_CONTEXT_FIELDS.contains(&field_name.as_str()) {
            let text = field.text().await.map_err(|e| {
                AppError::Validation(format!("Failed to read field '{field_name}': {e}"))
            })?;
            form.job = parse_job_context(&text);
        }
    }

    Ok(form)
}

pub fn parse_job_context(text: &str) -> Option<JobContext> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<JobContext>(text) {
        Ok(job) => Some(job),
        Err(e) => {
            warn!("Could not parse job ad data: {e}");
            None
        }
    }
}
