// Prompt constants for document extraction and CV synthesis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Sent alongside every uploaded file.
pub const EXTRACTION_PROMPT: &str = "Extract ALL text from this document. \
    If it is a CV/resume, extract all personal information, education, work experience, skills, and references. \
    If it is a certificate, extract the name, institution, date, and qualification. \
    If it is a job advertisement, extract the job title, company, location, requirements, and description. \
    Return the extracted text in a structured format.";

/// Used when no job was selected.
pub const GENERIC_JOB_CONTEXT: &str =
    "No specific job selected - create a general professional CV and cover letter.";

/// Applied to a selected job. Fill `{title}`, `{company}`, `{location}`, `{description}`.
pub const JOB_CONTEXT_TEMPLATE: &str = "The user is applying for: {title} at {company} in {location}. \
    Job description: {description}";

/// Synthesis prompt. Fill `{extracted_text}`, `{job_context}` and `{json_only}` before sending.
pub const SYNTHESIS_PROMPT_TEMPLATE: &str = r#"You are an expert CV writer specializing in the Papua New Guinea job market. Based on the following extracted document text, create a professional CV and cover letter.

EXTRACTED DOCUMENT TEXT:
{extracted_text}

JOB CONTEXT:
{job_context}

IMPORTANT INSTRUCTIONS:
1. Use real information from the documents wherever it is available; never replace a real value with an invented one
2. For any missing information, create realistic placeholder data appropriate for Papua New Guinea
3. Emphasize community involvement and leadership (important in PNG culture)
4. Mention both English proficiency and Tok Pisin where the documents indicate them
5. Format for ATS (Applicant Tracking Systems): plain section headings, no tables, no columns

Return a JSON object with this EXACT structure:
{
  "extractedData": {
    "name": "Full Name from document or 'Papua New Guinea Applicant'",
    "province": "Province from document or 'National Capital District'",
    "phone": "Phone from document or '+675 7XXX XXXX'",
    "email": "Email from document or 'applicant@email.com'",
    "education": "Education details, each on new line",
    "experience": "Work experience with bullet points",
    "skills": ["Array", "of", "skills"],
    "summary": "Professional summary paragraph",
    "communityLeadership": "Community and volunteer work",
    "referees": [
      {"name": "Referee Name", "title": "Title, Company", "phone": "+675 XXXX XXXX"}
    ]
  },
  "generatedContent": {
    "resume": "Full formatted resume text",
    "coverLetter": "Full cover letter text",
    "atsScore": 85
  }
}

{json_only}"#;

/// Substitutes `{key}` placeholders in one pass over `template`.
///
/// Inserted values are never rescanned, so user text that happens to contain
/// `{extracted_text}` or similar stays literal. Unknown `{...}` runs are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let filled = tail.find('}').and_then(|end| {
            let key = &tail[1..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match filled {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
