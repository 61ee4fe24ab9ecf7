// Tailored content generation
// Implements: five schema-constrained stages (summary, skills, experience,
// projects, coursework) and their aggregation.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod generator;
pub mod prompts;
pub mod schema;
