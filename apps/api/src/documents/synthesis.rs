//! Synthesis step: turns the aggregated document text into a structured
//! profile, a resume, and a cover letter with one model call.
//!
//! The model's JSON is only checked for well-formedness. Field types are
//! coerced leniently so a mistyped sub-field degrades to a default instead
//! of failing the request.

use async_trait::async_trait;
use serde_json::Value;

use crate::documents::models::{
    ExtractedProfile, GeneratedContent, JobContext, Referee, SynthesisOutput,
};
use crate::documents::prompts::{
    fill_template, GENERIC_JOB_CONTEXT, JOB_CONTEXT_TEMPLATE, SYNTHESIS_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, SYNTHESIS_SAMPLING};
use crate::llm_client::{strip_json_fences, GeminiClient, LlmError, Part};

/// Carried in `AppState` as `Arc<dyn ProfileSynthesizer>`.
#[async_trait]
pub trait ProfileSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        extracted_text: &str,
        job: Option<&JobContext>,
    ) -> Result<SynthesisOutput, LlmError>;
}

pub struct GeminiSynthesizer {
    llm: GeminiClient,
}

impl GeminiSynthesizer {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProfileSynthesizer for GeminiSynthesizer {
    async fn synthesize(
        &self,
        extracted_text: &str,
        job: Option<&JobContext>,
    ) -> Result<SynthesisOutput, LlmError> {
        let prompt = build_synthesis_prompt(extracted_text, job);
        let raw = self
            .llm
            .generate(vec![Part::Text { text: &prompt }], SYNTHESIS_SAMPLING)
            .await?;
        parse_synthesis_response(&raw)
    }
}

pub fn build_job_context(job: Option<&JobContext>) -> String {
    match job {
        Some(job) => fill_template(
            JOB_CONTEXT_TEMPLATE,
            &[
                ("title", job.title.as_str()),
                ("company", job.company.as_str()),
                ("location", job.location.as_str()),
                ("description", job.description.as_str()),
            ],
        ),
        None => GENERIC_JOB_CONTEXT.to_string(),
    }
}

pub fn build_synthesis_prompt(extracted_text: &str, job: Option<&JobContext>) -> String {
    let job_context = build_job_context(job);
    fill_template(
        SYNTHESIS_PROMPT_TEMPLATE,
        &[
            ("extracted_text", extracted_text),
            ("job_context", job_context.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Strips code fences, parses, and maps the model output onto the response types.
pub fn parse_synthesis_response(raw: &str) -> Result<SynthesisOutput, LlmError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;
    if !value.is_object() {
        return Err(LlmError::InvalidShape(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let data = value.get("extractedData").unwrap_or(&Value::Null);
    let content = value.get("generatedContent").unwrap_or(&Value::Null);

    Ok(SynthesisOutput {
        extracted_data: profile_from_value(data),
        generated_content: content_from_value(content),
    })
}

pub(crate) fn profile_from_value(data: &Value) -> ExtractedProfile {
    let region = match text_field(data, "province") {
        s if s.is_empty() => text_field(data, "region"),
        s => s,
    };

    ExtractedProfile {
        name: text_field(data, "name"),
        region,
        phone: text_field(data, "phone"),
        email: text_field(data, "email"),
        education: text_field(data, "education"),
        experience: text_field(data, "experience"),
        skills: skills_field(data.get("skills")),
        summary: text_field(data, "summary"),
        community_leadership: text_field(data, "communityLeadership"),
        referees: data
            .get("referees")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter(|r| r.is_object())
                    .map(|r| Referee {
                        name: text_field(r, "name"),
                        title: text_field(r, "title"),
                        phone: text_field(r, "phone"),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub(crate) fn content_from_value(content: &Value) -> GeneratedContent {
    GeneratedContent {
        resume: text_field(content, "resume"),
        cover_letter: text_field(content, "coverLetter"),
        ats_score: score_field(content.get("atsScore")),
    }
}

fn text_field(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn skills_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split([',', '\n'])
            .map(|s| s.trim().trim_start_matches(['-', '•']).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn score_field(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
