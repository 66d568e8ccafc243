use std::sync::Arc;

use crate::config::Config;
use crate::documents::extraction::DocumentExtractor;
use crate::documents::pipeline::PipelineOptions;
use crate::documents::synthesis::ProfileSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Per-file text extraction. Default: `GeminiExtractor`.
    pub extractor: Arc<dyn DocumentExtractor>,
    /// CV / cover-letter synthesis. Default: `GeminiSynthesizer`.
    pub synthesizer: Arc<dyn ProfileSynthesizer>,
}

impl AppState {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            unsupported_type_policy: self.config.unsupported_type_policy,
            ..PipelineOptions::default()
        }
    }
}
