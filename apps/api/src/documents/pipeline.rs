//! Document pipeline: per-file extraction → aggregate → synthesis.
//!
//! Runs on plain values; no HTTP types reach this module. A failing file is
//! recorded as a placeholder and the batch continues. Only "nothing usable"
//! and a failed synthesis escalate to request-level errors.

use tracing::{info, warn};

use crate::config::UnsupportedTypePolicy;
use crate::documents::encoding::{decode_substantive_text, EncodedPayload};
use crate::documents::extraction::DocumentExtractor;
use crate::documents::mime::{is_supported, resolve_mime, PDF};
use crate::documents::models::{
    ExtractionOutcome, FileInfo, FileSection, JobContext, SynthesisOutput, UploadedFile,
};
use crate::documents::synthesis::ProfileSynthesizer;
use crate::errors::AppError;

/// Per-file size ceiling.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub max_file_bytes: usize,
    pub unsupported_type_policy: UnsupportedTypePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            unsupported_type_policy: UnsupportedTypePolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub synthesis: SynthesisOutput,
    pub sections: Vec<FileSection>,
    pub files_processed: Vec<FileInfo>,
}

pub async fn process_documents(
    files: &[UploadedFile],
    job: Option<&JobContext>,
    extractor: &dyn DocumentExtractor,
    synthesizer: &dyn ProfileSynthesizer,
    options: &PipelineOptions,
) -> Result<PipelineOutput, AppError> {
    if files.is_empty() {
        return Err(AppError::Validation(
            "No valid files provided. Please upload PDF, DOCX, JPG, or PNG files.".to_string(),
        ));
    }

    info!("Processing {} files", files.len());

    let mut sections = Vec::with_capacity(files.len());
    let mut files_processed = Vec::with_capacity(files.len());

    for file in files {
        let (mime, outcome) = extract_file(file, extractor, options).await;

        if !matches!(outcome, ExtractionOutcome::Oversize { .. }) {
            files_processed.push(FileInfo {
                name: file.name.clone(),
                mime_type: mime,
                size: file.size(),
            });
        }
        sections.push(FileSection {
            name: file.name.clone(),
            outcome,
        });
    }

    if !sections.iter().any(|s| s.outcome.is_usable()) {
        warn!("No usable content in {} files; skipping synthesis", files.len());
        return Err(AppError::NoUsableContent);
    }

    let combined = aggregate_sections(&sections);
    info!(chars = combined.len(), "Generating CV and cover letter");

    let synthesis = synthesizer
        .synthesize(&combined, job)
        .await
        .map_err(AppError::Generation)?;

    Ok(PipelineOutput {
        synthesis,
        sections,
        files_processed,
    })
}

/// Runs one file through size, type, and extraction. Returns the resolved
/// MIME type alongside the outcome.
async fn extract_file(
    file: &UploadedFile,
    extractor: &dyn DocumentExtractor,
    options: &PipelineOptions,
) -> (String, ExtractionOutcome) {
    let mut mime = resolve_mime(file.declared_type.as_deref(), &file.name);
    info!(
        "Processing file: {}, type: {}, size: {} bytes",
        file.name,
        mime,
        file.size()
    );

    if file.size() > options.max_file_bytes {
        warn!("Skipping {}: {} bytes exceeds limit", file.name, file.size());
        return (
            mime,
            ExtractionOutcome::Oversize {
                limit: options.max_file_bytes,
            },
        );
    }

    let reported_mime = mime.clone();

    if !is_supported(&mime) {
        if let Some(text) = decode_substantive_text(&file.content) {
            info!("Read {} directly as plain text", file.name);
            return (reported_mime, ExtractionOutcome::Decoded(text));
        }
        match options.unsupported_type_policy {
            UnsupportedTypePolicy::CoerceToPdf => {
                warn!("Unsupported type {} for {}; sending as PDF", mime, file.name);
                mime = PDF.to_string();
            }
            UnsupportedTypePolicy::Reject => {
                warn!("Unsupported type {} for {}; skipping", mime, file.name);
                return (reported_mime, ExtractionOutcome::Unsupported { mime });
            }
        }
    }

    let payload = EncodedPayload::new(mime, &file.content);
    match extractor.extract(&payload).await {
        Ok(text) => {
            info!("Successfully extracted text from {}", file.name);
            (reported_mime, ExtractionOutcome::Extracted(text))
        }
        Err(e) => {
            warn!("Error processing {}: {e}", file.name);
            (reported_mime, ExtractionOutcome::Failed(e.to_string()))
        }
    }
}

/// One `=== name ===` section per file, blank line between sections.
pub fn aggregate_sections(sections: &[FileSection]) -> String {
    sections
        .iter()
        .map(|s| format!("=== {} ===\n{}", s.name, s.outcome.section_body()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
