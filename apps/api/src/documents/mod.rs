// Document processing: upload → per-file extraction → CV synthesis.
// All model calls go through llm_client; nothing here talks to Gemini directly.

pub mod encoding;
pub mod extraction;
pub mod form;
pub mod handlers;
pub mod mime;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod synthesis;
