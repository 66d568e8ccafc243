//! Renders the resume and cover letter into a single downloadable document.

use crate::documents::models::GeneratedContent;

/// Separator placed between the resume and the cover letter.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Word,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(Self::PlainText),
            "doc" | "word" => Some(Self::Word),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Word => "doc",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain; charset=utf-8",
            Self::Word => "application/msword",
        }
    }
}

pub fn render_document(content: &GeneratedContent) -> String {
    format!(
        "{}{}{}",
        content.resume, DOCUMENT_SEPARATOR, content.cover_letter
    )
}

/// `<Name_With_Underscores>_CV.<ext>`, keeping only ASCII letters, digits, `-` and `.`.
pub fn download_file_name(applicant_name: &str, format: ExportFormat) -> String {
    let stem = applicant_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        format!("CV.{}", format.extension())
    } else {
        format!("{stem}_CV.{}", format.extension())
    }
}
