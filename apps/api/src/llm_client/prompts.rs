// Shared prompt fragments.
// Each stage prompt lives in generation/prompts.rs; this file holds the
// instructions every stage appends.

/// Instruction appended to every stage prompt. The response schema is enforced
/// by the API, this keeps the model from padding string fields.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with a single JSON value matching the requested structure. \
    Do NOT wrap it in markdown code fences. \
    Do NOT include explanations outside the JSON.";

/// Keeps generated content grounded in the supplied résumé data.
pub const GROUNDING_INSTRUCTION: &str = "\
    Use ONLY facts present in the resume data. Do NOT invent employers, \
    projects, metrics, or technologies that the resume data does not mention.";
