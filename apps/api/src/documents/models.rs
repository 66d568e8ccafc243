use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file part from the upload form. Lives only for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub declared_type: Option<String>,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Job the applicant is targeting. Absent means a generic CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
}

/// Per-file metadata echoed back in `filesProcessed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: usize,
}

/// Result of running one file through extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The AI provider returned text for the file.
    Extracted(String),
    /// Unsupported type whose bytes were already readable text.
    Decoded(String),
    /// Skipped without a provider call.
    Oversize { limit: usize },
    /// Unsupported type rejected by policy without a provider call.
    Unsupported { mime: String },
    /// The provider call failed.
    Failed(String),
}

impl ExtractionOutcome {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Extracted(_) | Self::Decoded(_))
    }

    /// Body of this file's section in the aggregate text.
    pub fn section_body(&self) -> String {
        match self {
            Self::Extracted(text) | Self::Decoded(text) => text.clone(),
            Self::Oversize { limit } => format!(
                "[File skipped: larger than the {} MB size limit]",
                limit / (1024 * 1024)
            ),
            Self::Unsupported { mime } => {
                format!("[File skipped: unsupported file type {mime}]")
            }
            Self::Failed(detail) => format!("[Could not extract text from this file: {detail}]"),
        }
    }
}

/// One file's slot in the aggregate, in upload order.
#[derive(Debug, Clone)]
pub struct FileSection {
    pub name: String,
    pub outcome: ExtractionOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Referee {
    pub name: String,
    pub title: String,
    pub phone: String,
}

/// Structured applicant details produced by synthesis. Best effort: the model
/// is told to backfill anything it cannot find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedProfile {
    pub name: String,
    #[serde(rename = "province", alias = "region")]
    pub region: String,
    pub phone: String,
    pub email: String,
    pub education: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub summary: String,
    pub community_leadership: String,
    pub referees: Vec<Referee>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedContent {
    pub resume: String,
    pub cover_letter: String,
    pub ats_score: u8,
}

/// Both halves of a successful synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutput {
    pub extracted_data: ExtractedProfile,
    pub generated_content: GeneratedContent,
}

/// Success body of the processing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub success: bool,
    pub extracted_data: ExtractedProfile,
    pub generated_content: GeneratedContent,
    pub job_ad_data: Option<JobContext>,
    pub files_processed: Vec<FileInfo>,
    pub ai_powered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversize_placeholder_mentions_size() {
        let body = ExtractionOutcome::Oversize {
            limit: 10 * 1024 * 1024,
        }
        .section_body();
        assert_eq!(body, "[File skipped: larger than the 10 MB size limit]");
    }

    #[test]
    fn test_only_text_outcomes_are_usable() {
        assert!(ExtractionOutcome::Extracted("cv".into()).is_usable());
        assert!(ExtractionOutcome::Decoded("cv".into()).is_usable());
        assert!(!ExtractionOutcome::Failed("boom".into()).is_usable());
        assert!(!ExtractionOutcome::Oversize { limit: 1 }.is_usable());
        assert!(!ExtractionOutcome::Unsupported {
            mime: "application/zip".into()
        }
        .is_usable());
    }

    #[test]
    fn test_job_context_tolerates_missing_keys() {
        let job: JobContext = serde_json::from_str(r#"{"title": "Bank Teller"}"#).unwrap();
        assert_eq!(job.title, "Bank Teller");
        assert!(job.company.is_empty());
    }

    #[test]
    fn test_response_uses_wire_names() {
        let response = ProcessResponse {
            success: true,
            extracted_data: ExtractedProfile {
                region: "Morobe Province".into(),
                ..Default::default()
            },
            generated_content: GeneratedContent::default(),
            job_ad_data: None,
            files_processed: vec![FileInfo {
                name: "cv.pdf".into(),
                mime_type: "application/pdf".into(),
                size: 42,
            }],
            ai_powered: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["extractedData"]["province"], "Morobe Province");
        assert!(json["extractedData"].get("communityLeadership").is_some());
        assert!(json["generatedContent"].get("coverLetter").is_some());
        assert_eq!(json["filesProcessed"][0]["type"], "application/pdf");
        assert!(json["jobAdData"].is_null());
        assert_eq!(json["aiPowered"], true);
    }
}
