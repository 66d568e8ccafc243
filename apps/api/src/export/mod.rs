// Download rendering for finished CVs.
// Formatting only: the text was already produced by the documents pipeline.

pub mod handlers;
pub mod render;
