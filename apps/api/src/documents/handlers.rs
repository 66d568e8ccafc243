//! Axum route handlers for the document-processing endpoint.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::documents::form::parse_upload_form;
use crate::documents::models::ProcessResponse;
use crate::documents::pipeline::process_documents;
use crate::errors::AppError;
use crate::state::AppState;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// POST /api/v1/documents/process
///
/// Extracts text from every uploaded file, then synthesizes the profile,
/// resume, and cover letter in one call.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_process(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    if !state.config.has_credential() {
        return Err(AppError::Configuration(
            "GEMINI_API_KEY is not configured on the server".to_string(),
        ));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !content_type.starts_with(MULTIPART_FORM_DATA) {
        return Err(AppError::InvalidContentType {
            expected: MULTIPART_FORM_DATA,
        });
    }

    let multipart = multipart
        .map_err(|e| AppError::Validation(format!("Failed to read multipart body: {e}")))?;
    let form = parse_upload_form(multipart).await?;

    let output = process_documents(
        &form.files,
        form.job.as_ref(),
        state.extractor.as_ref(),
        state.synthesizer.as_ref(),
        &state.pipeline_options(),
    )
    .await?;

    let usable = output
        .sections
        .iter()
        .filter(|s| s.outcome.is_usable())
        .count();
    info!(
        "Generated CV from {usable} of {} files",
        output.sections.len()
    );

    Ok(Json(ProcessResponse {
        success: true,
        extracted_data: output.synthesis.extracted_data,
        generated_content: output.synthesis.generated_content,
        job_ad_data: form.job,
        files_processed: output.files_processed,
        ai_powered: true,
    }))
}

/// OPTIONS on the processing route: empty 200 for cross-origin pre-flight.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::documents::encoding::encode_base64;
    use crate::documents::pipeline::tests::{FakeExtractor, FakeSynthesizer};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "cv-builder-test-boundary";
    const PROCESS_URI: &str = "/api/v1/documents/process";

    enum FormPart<'a> {
        File {
            name: &'a str,
            content_type: Option<&'a str>,
            bytes: &'a [u8],
        },
        Text {
            field: &'a str,
            value: &'a str,
        },
    }

    fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                FormPart::File {
                    name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file_{i}\"; filename=\"{name}\"\r\n"
                        )
                        .as_bytes(),
                    );
                    if let Some(ct) = content_type {
                        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
                    }
                    body.extend_from_slice(b"\r\n");
                    body.extend_from_slice(bytes);
                }
                FormPart::Text { field, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(parts: &[FormPart<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(PROCESS_URI)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn config(with_key: bool) -> Config {
        let mut source = HashMap::new();
        if with_key {
            source.insert("GEMINI_API_KEY".to_string(), "test-key".to_string());
        }
        Config::from_source(&source).unwrap()
    }

    fn state(
        with_key: bool,
        extractor: Arc<FakeExtractor>,
        synthesizer: Arc<FakeSynthesizer>,
    ) -> AppState {
        AppState {
            config: config(with_key),
            extractor,
            synthesizer,
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_two_files_succeed() {
        let extractor = Arc::new(FakeExtractor::default());
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let request = multipart_request(&[
            FormPart::File {
                name: "cv.pdf",
                content_type: Some("application/pdf"),
                bytes: b"%PDF-1.4 cv",
            },
            FormPart::File {
                name: "certificate.jpg",
                content_type: None,
                bytes: b"\xFF\xD8\xFF jpeg",
            },
            FormPart::Text {
                field: "job_ad_text",
                value: r#"{"title":"Bank Teller","company":"Bank South Pacific","location":"Port Moresby, NCD","description":"Customer service"}"#,
            },
        ]);

        let (status, json) = send(
            state(true, extractor.clone(), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["aiPowered"], true);
        assert_eq!(json["filesProcessed"].as_array().unwrap().len(), 2);
        assert_eq!(json["filesProcessed"][1]["type"], "image/jpeg");
        assert_eq!(json["filesProcessed"][0]["size"], 11);
        assert_eq!(json["jobAdData"]["company"], "Bank South Pacific");
        assert_eq!(json["extractedData"]["name"], "Papua New Guinea Applicant");
        assert_eq!(json["generatedContent"]["coverLetter"], "LETTER");
        assert_eq!(json["generatedContent"]["atsScore"], 85);
        assert_eq!(extractor.calls(), 2);
        assert_eq!(synthesizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_parts_skipped_and_bad_job_ignored() {
        let extractor = Arc::new(FakeExtractor::default());
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let request = multipart_request(&[
            FormPart::File {
                name: "empty.pdf",
                content_type: Some("application/pdf"),
                bytes: b"",
            },
            FormPart::File {
                name: "cv.png",
                content_type: Some("image/png"),
                bytes: b"\x89PNG",
            },
            FormPart::Text {
                field: "job_ad_text",
                value: "not json",
            },
        ]);

        let (status, json) = send(
            state(true, extractor.clone(), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["jobAdData"].is_null());
        assert_eq!(json["filesProcessed"].as_array().unwrap().len(), 1);
        assert_eq!(extractor.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let extractor = Arc::new(FakeExtractor::default());
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let request = multipart_request(&[FormPart::File {
            name: "cv.pdf",
            content_type: Some("application/pdf"),
            bytes: b"%PDF",
        }]);

        let (status, json) = send(
            state(false, extractor.clone(), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri(PROCESS_URI)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"files": []}"#))
            .unwrap();

        let (status, json) = send(
            state(
                true,
                Arc::new(FakeExtractor::default()),
                Arc::new(FakeSynthesizer::default()),
            ),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "Invalid content type. Expected multipart/form-data"
        );
    }

    #[tokio::test]
    async fn test_no_files_rejected() {
        let request = multipart_request(&[FormPart::Text {
            field: "job_ad_text",
            value: r#"{"title":"Nurse"}"#,
        }]);

        let (status, json) = send(
            state(
                true,
                Arc::new(FakeExtractor::default()),
                Arc::new(FakeSynthesizer::default()),
            ),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("No valid files"));
    }

    #[tokio::test]
    async fn test_all_files_failing_skips_synthesis() {
        let extractor = Arc::new(FakeExtractor {
            fail_on: vec![encode_base64(b"unreadable")],
            ..Default::default()
        });
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let oversize = vec![b'x'; 10 * 1024 * 1024 + 1];
        let request = multipart_request(&[
            FormPart::File {
                name: "scan.pdf",
                content_type: Some("application/pdf"),
                bytes: &oversize,
            },
            FormPart::File {
                name: "photo.png",
                content_type: Some("image/png"),
                bytes: b"unreadable",
            },
        ]);

        let (status, json) = send(
            state(true, extractor.clone(), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert!(json.get("extractedData").is_none());
        assert_eq!(extractor.calls(), 1);
        assert_eq!(synthesizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_synthesis_json_is_error_envelope() {
        let synthesizer = Arc::new(FakeSynthesizer::failing());
        let request = multipart_request(&[FormPart::File {
            name: "cv.pdf",
            content_type: Some("application/pdf"),
            bytes: b"%PDF",
        }]);

        let (status, json) = send(
            state(true, Arc::new(FakeExtractor::default()), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to process files with AI");
        assert!(json["details"]
            .as_str()
            .unwrap()
            .starts_with("Generation failed: JSON parse error"));
        assert!(json.get("generatedContent").is_none());
        assert_eq!(synthesizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_preflight_and_wrong_method() {
        let preflight = Request::builder()
            .method("OPTIONS")
            .uri(PROCESS_URI)
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(
            state(
                true,
                Arc::new(FakeExtractor::default()),
                Arc::new(FakeSynthesizer::default()),
            ),
            preflight,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());

        let get = Request::builder()
            .method("GET")
            .uri(PROCESS_URI)
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(
            state(
                true,
                Arc::new(FakeExtractor::default()),
                Arc::new(FakeSynthesizer::default()),
            ),
            get,
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_legacy_function_path_is_mounted() {
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let mut request = multipart_request(&[FormPart::File {
            name: "cv.txt",
            content_type: Some("text/plain"),
            bytes: b"John Kila",
        }]);
        *request.uri_mut() = "/functions/v1/ocr-extract".parse().unwrap();

        let (status, _) = send(
            state(true, Arc::new(FakeExtractor::default()), synthesizer.clone()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(synthesizer.calls(), 1);
    }
}
