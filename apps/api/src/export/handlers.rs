use axum::{
    extract::{rejection::JsonRejection, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::documents::models::{ExtractedProfile, GeneratedContent};
use crate::documents::synthesis::{content_from_value, profile_from_value};
use crate::errors::AppError;
use crate::export::render::{download_file_name, render_document, ExportFormat};

/// Body of an export call: the `extractedData` / `generatedContent` pair the
/// process endpoint returned, possibly edited by the client.
#[derive(Debug, Default, PartialEq)]
pub struct ExportRequest {
    pub extracted_data: ExtractedProfile,
    pub generated_content: GeneratedContent,
}

impl ExportRequest {
    /// Same lenient field coercion as the synthesis output, so a mistyped
    /// field the export never reads cannot fail the request.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        if !value.is_object() {
            return Err(AppError::Validation(
                "Invalid export request: expected a JSON object".to_string(),
            ));
        }
        let data = value.get("extractedData").unwrap_or(&Value::Null);
        let content = value.get("generatedContent").unwrap_or(&Value::Null);
        Ok(Self {
            extracted_data: profile_from_value(data),
            generated_content: content_from_value(content),
        })
    }
}

/// POST /api/v1/export/:format
///
/// Returns the resume and cover letter as a file download (`txt` or `doc`).
pub async fn handle_export(
    Path(format): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let format = ExportFormat::parse(&format).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported export format '{format}'. Use 'txt' or 'doc'"
        ))
    })?;
    let Json(body) =
        body.map_err(|e| AppError::Validation(format!("Invalid export request: {e}")))?;
    let request = ExportRequest::from_value(&body)?;

    let content = &request.generated_content;
    if content.resume.trim().is_empty() && content.cover_letter.trim().is_empty() {
        return Err(AppError::Validation(
            "Nothing to export: resume and cover letter are both empty".to_string(),
        ));
    }

    let file_name = download_file_name(&request.extracted_data.name, format);
    tracing::info!("Exporting {file_name}");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        render_document(content),
    )
        .into_response())
}
