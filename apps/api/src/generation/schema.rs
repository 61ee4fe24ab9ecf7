//! Schema types: the fixed shapes every generation stage must return.
//!
//! Each shape carries two things the LLM client needs: a response-schema
//! descriptor sent to the model (Gemini's OpenAPI subset), and a validator run
//! after deserialization. Output that fails either is rejected, never coerced.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

pub const MAX_EXPERIENCE_BULLET_WORDS: usize = 150;
pub const MAX_PROJECT_BULLET_WORDS: usize = 150;
pub const MAX_EXPERIENCE_BULLETS: usize = 4;
pub const MAX_PROJECTS: usize = 2;
pub const MAX_COURSEWORK: usize = 5;
pub const PROJECT_BULLETS: usize = 2;

/// One independent generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Summary,
    Skills,
    Experience,
    Projects,
    Coursework,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Summary => "summary",
            Stage::Skills => "skills",
            Stage::Experience => "experience",
            Stage::Projects => "projects",
            Stage::Coursework => "coursework",
        };
        f.write_str(name)
    }
}

/// A shape the model can be constrained to.
pub trait ResponseSchema: DeserializeOwned + Send {
    /// Name sent alongside the schema; also how test doubles tell stages apart.
    const NAME: &'static str;

    /// Response-schema descriptor passed to the model.
    fn schema() -> Value;

    /// Post-parse checks the descriptor cannot express.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalSummary {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsSection {
    pub relevant_tools: Vec<String>,
    pub summary_text: String,
    pub comma_separated_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBullet {
    pub what: String,
    pub how: String,
    pub impact: String,
    pub tech_stack: Vec<String>,
    /// Final bullet text placed in the document. At most 150 words.
    pub formatted_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub url: String,
    pub date: String,
    pub tech_stack: Vec<String>,
    /// Exactly two bullets, each at most 150 words.
    pub formatted_bullets: Vec<String>,
}

/// Projects in relevance-rank order as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsSection {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseworkSection {
    pub selected_coursework: Vec<String>,
    pub comma_separated_text: String,
}

/// All five sections. Only constructed once every stage has succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredContent {
    pub professional_summary: ProfessionalSummary,
    pub selected_experiences: Vec<ExperienceBullet>,
    pub skills: SkillsSection,
    pub projects: ProjectsSection,
    pub coursework: CourseworkSection,
}

// ────────────────────────────────────────────────────────────────────────────
// Descriptor helpers
// ────────────────────────────────────────────────────────────────────────────

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn object(properties: &[(&str, Value)]) -> Value {
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": props,
        "required": required,
        "propertyOrdering": required,
    })
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ────────────────────────────────────────────────────────────────────────────
// Schema impls
// ────────────────────────────────────────────────────────────────────────────

impl ResponseSchema for ProfessionalSummary {
    const NAME: &'static str = "ProfessionalSummary";

    fn schema() -> Value {
        object(&[("summary", string())])
    }

    fn validate(&self) -> Result<(), String> {
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        Ok(())
    }
}

impl ResponseSchema for SkillsSection {
    const NAME: &'static str = "SkillsSection";

    fn schema() -> Value {
        object(&[
            ("relevant_tools", string_array()),
            ("summary_text", string()),
            ("comma_separated_text", string()),
        ])
    }
}

impl ExperienceBullet {
    fn schema() -> Value {
        object(&[
            ("what", string()),
            ("how", string()),
            ("impact", string()),
            ("tech_stack", string_array()),
            ("formatted_text", string()),
        ])
    }
}

impl ResponseSchema for Vec<ExperienceBullet> {
    const NAME: &'static str = "ExperienceBullets";

    fn schema() -> Value {
        json!({ "type": "ARRAY", "items": ExperienceBullet::schema() })
    }

    fn validate(&self) -> Result<(), String> {
        if self.len() > MAX_EXPERIENCE_BULLETS {
            return Err(format!(
                "{} experiences returned, at most {MAX_EXPERIENCE_BULLETS} allowed",
                self.len()
            ));
        }
        for (idx, bullet) in self.iter().enumerate() {
            let words = word_count(&bullet.formatted_text);
            if words > MAX_EXPERIENCE_BULLET_WORDS {
                return Err(format!(
                    "experience {} has {words} words, limit is {MAX_EXPERIENCE_BULLET_WORDS}",
                    idx + 1
                ));
            }
        }
        Ok(())
    }
}

impl ResponseSchema for ProjectsSection {
    const NAME: &'static str = "ProjectsSection";

    fn schema() -> Value {
        let project = object(&[
            ("name", string()),
            ("url", string()),
            ("date", string()),
            ("tech_stack", string_array()),
            ("formatted_bullets", string_array()),
        ]);
        object(&[("projects", json!({ "type": "ARRAY", "items": project }))])
    }

    fn validate(&self) -> Result<(), String> {
        for project in &self.projects {
            if project.formatted_bullets.len() != PROJECT_BULLETS {
                return Err(format!(
                    "project '{}' has {} bullets, expected exactly {PROJECT_BULLETS}",
                    project.name,
                    project.formatted_bullets.len()
                ));
            }
            for bullet in &project.formatted_bullets {
                let words = word_count(bullet);
                if words > MAX_PROJECT_BULLET_WORDS {
                    return Err(format!(
                        "project '{}' has a {words}-word bullet, limit is {MAX_PROJECT_BULLET_WORDS}",
                        project.name
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ResponseSchema for CourseworkSection {
    const NAME: &'static str = "CourseworkSection";

    fn schema() -> Value {
        object(&[
            ("selected_coursework", string_array()),
            ("comma_separated_text", string()),
        ])
    }

    fn validate(&self) -> Result<(), String> {
        if self.selected_coursework.len() > MAX_COURSEWORK {
            return Err(format!(
                "{} courses returned, at most {MAX_COURSEWORK} allowed",
                self.selected_coursework.len()
            ));
        }
        Ok(())
    }
}
