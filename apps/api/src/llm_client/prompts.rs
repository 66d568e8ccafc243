// Shared prompt fragments and sampling presets.
// Each feature that calls the model keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

use super::GenerationConfig;

/// Instruction appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Low temperature: transcription should stay close to the source document.
pub const EXTRACTION_SAMPLING: GenerationConfig = GenerationConfig {
    temperature: 0.1,
    max_output_tokens: 4096,
};

/// Higher temperature and budget for writing the CV and cover letter.
pub const SYNTHESIS_SAMPLING: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 8192,
};
