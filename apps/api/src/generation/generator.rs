//! Content Generation: runs the five tailoring stages and aggregates them.
//!
//! Flow: build each stage prompt → fan out the five schema-constrained calls →
//!       join → TailoredContent.
//!
//! Stages have no data dependency on each other, so they run concurrently.
//! The join fails closed: the first stage error is returned and no partial
//! content ever leaves this module.

use tracing::{debug, info};

use crate::errors::TailorError;
use crate::generation::prompts::{
    COURSEWORK_PROMPT_TEMPLATE, ENGLISH_COURSEWORK_RULES, EXPERIENCE_PROMPT_TEMPLATE,
    KOREAN_COURSEWORK_RULES, PROJECTS_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE,
    SUMMARY_PROMPT_TEMPLATE,
};
use crate::generation::schema::{
    CourseworkSection, ExperienceBullet, ProfessionalSummary, ProjectsSection, SkillsSection,
    Stage, TailoredContent, MAX_COURSEWORK, MAX_EXPERIENCE_BULLETS,
    MAX_EXPERIENCE_BULLET_WORDS, MAX_PROJECTS, MAX_PROJECT_BULLET_WORDS,
};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{generate_structured, ContentGenerator};
use crate::models::language::Language;
use crate::models::resume::BaseResumeData;

/// Sentence cap for the professional summary. Korean gets one extra sentence.
pub const MAX_SUMMARY_SENTENCES: usize = 2;

/// Per-request inputs shared by every stage.
#[derive(Debug, Clone, Copy)]
pub struct StageInputs<'a> {
    pub base: &'a BaseResumeData,
    pub job_description: &'a str,
    pub language: Language,
}

impl StageInputs<'_> {
    pub fn max_summary_sentences(&self) -> usize {
        match self.language {
            Language::Kr => MAX_SUMMARY_SENTENCES + 1,
            Language::En => MAX_SUMMARY_SENTENCES,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs all five stages and aggregates their sections.
pub async fn generate_tailored_content(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<TailoredContent, TailorError> {
    info!(
        "Generating tailored content (language={}, jd_chars={})",
        inputs.language,
        inputs.job_description.chars().count()
    );

    let (professional_summary, skills, selected_experiences, projects, coursework) = tokio::try_join!(
        generate_summary(llm, inputs),
        generate_skills(llm, inputs),
        generate_experiences(llm, inputs),
        generate_projects(llm, inputs),
        generate_coursework(llm, inputs),
    )?;

    info!(
        "Aggregated content: {} experiences, {} projects, {} courses",
        selected_experiences.len(),
        projects.projects.len(),
        coursework.selected_coursework.len()
    );

    Ok(TailoredContent {
        professional_summary,
        selected_experiences,
        skills,
        projects,
        coursework,
    })
}

async fn generate_summary(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<ProfessionalSummary, TailorError> {
    let prompt = build_summary_prompt(inputs);
    let summary = generate_structured(llm, Stage::Summary, &prompt).await?;
    debug!("Summary stage complete");
    Ok(summary)
}

async fn generate_skills(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<SkillsSection, TailorError> {
    let prompt = build_skills_prompt(inputs);
    let skills: SkillsSection = generate_structured(llm, Stage::Skills, &prompt).await?;
    debug!("Skills stage complete: {} tools", skills.relevant_tools.len());
    Ok(skills)
}

async fn generate_experiences(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<Vec<ExperienceBullet>, TailorError> {
    let prompt = build_experience_prompt(inputs);
    let experiences: Vec<ExperienceBullet> =
        generate_structured(llm, Stage::Experience, &prompt).await?;
    debug!("Experience stage complete: {} bullets", experiences.len());
    Ok(experiences)
}

async fn generate_projects(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<ProjectsSection, TailorError> {
    let prompt = build_projects_prompt(inputs);
    let projects: ProjectsSection = generate_structured(llm, Stage::Projects, &prompt).await?;
    debug!("Projects stage complete: {} projects", projects.projects.len());
    Ok(projects)
}

async fn generate_coursework(
    llm: &dyn ContentGenerator,
    inputs: StageInputs<'_>,
) -> Result<CourseworkSection, TailorError> {
    let prompt = build_coursework_prompt(inputs);
    let coursework: CourseworkSection =
        generate_structured(llm, Stage::Coursework, &prompt).await?;

    check_coursework_language(&coursework, inputs.language).map_err(|reason| {
        TailorError::SchemaMismatch {
            stage: Stage::Coursework,
            reason,
            raw: serde_json::to_string(&coursework).unwrap_or_default(),
        }
    })?;

    debug!(
        "Coursework stage complete: {} courses",
        coursework.selected_coursework.len()
    );
    Ok(coursework)
}

/// Language rules the schema alone cannot express: the label prefix, and for
/// Korean the "translated (English original)" form of every course.
fn check_coursework_language(
    coursework: &CourseworkSection,
    language: Language,
) -> Result<(), String> {
    let prefix = language.coursework_prefix();
    if !coursework.comma_separated_text.starts_with(prefix) {
        return Err(format!("comma_separated_text must start with '{prefix}'"));
    }

    if language == Language::Kr {
        if let Some(course) = coursework
            .selected_coursework
            .iter()
            .find(|c| !is_translated_pair(c))
        {
            return Err(format!(
                "course '{course}' is not in 'translated (English original)' form"
            ));
        }
    }

    Ok(())
}

fn is_translated_pair(course: &str) -> bool {
    let course = course.trim();
    match (course.find('('), course.strip_suffix(')')) {
        (Some(open), Some(_)) => {
            open < course.len() - 2 && !course[..open].trim().is_ascii()
        }
        _ => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

// User-supplied text (résumé data, job description) is substituted last so any
// braces inside it are never treated as placeholders.

fn build_summary_prompt(inputs: StageInputs<'_>) -> String {
    SUMMARY_PROMPT_TEMPLATE
        .replace("{sentences}", &inputs.max_summary_sentences().to_string())
        .replace("{language}", inputs.language.display_name())
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_data}", &format!("{:#}", inputs.base.as_value()))
        .replace("{job_description}", inputs.job_description)
}

fn build_skills_prompt(inputs: StageInputs<'_>) -> String {
    SKILLS_PROMPT_TEMPLATE
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{tools}", &inputs.base.tools_and_frameworks().to_string())
        .replace("{job_description}", inputs.job_description)
}

fn build_experience_prompt(inputs: StageInputs<'_>) -> String {
    EXPERIENCE_PROMPT_TEMPLATE
        .replace("{max_bullets}", &MAX_EXPERIENCE_BULLETS.to_string())
        .replace("{max_words}", &MAX_EXPERIENCE_BULLET_WORDS.to_string())
        .replace("{language}", inputs.language.display_name())
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{experience}", &format!("{:#}", inputs.base.experience()))
        .replace("{job_description}", inputs.job_description)
}

fn build_projects_prompt(inputs: StageInputs<'_>) -> String {
    PROJECTS_PROMPT_TEMPLATE
        .replace("{max_projects}", &MAX_PROJECTS.to_string())
        .replace("{max_words}", &MAX_PROJECT_BULLET_WORDS.to_string())
        .replace("{language}", inputs.language.display_name())
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{projects}", &format!("{:#}", inputs.base.projects()))
        .replace("{job_description}", inputs.job_description)
}

fn build_coursework_prompt(inputs: StageInputs<'_>) -> String {
    let translation_rules = match inputs.language {
        Language::Kr => KOREAN_COURSEWORK_RULES,
        Language::En => ENGLISH_COURSEWORK_RULES,
    };

    COURSEWORK_PROMPT_TEMPLATE
        .replace("{max_courses}", &MAX_COURSEWORK.to_string())
        .replace("{language}", inputs.language.display_name())
        .replace("{prefix}", inputs.language.coursework_prefix())
        .replace("{translation_rules}", translation_rules)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{coursework}", &inputs.base.coursework().to_string())
        .replace("{job_description}", inputs.job_description)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::generation::schema::fixtures::{experience, project};
    use crate::llm_client::stub::StubGenerator;

    /// A generator answering every stage with valid content.
    pub fn valid_generator(experiences: usize, projects: usize, korean: bool) -> StubGenerator {
        let experiences: Vec<_> = (1..=experiences).map(experience).collect();
        let projects: Vec<_> = (1..=projects).map(project).collect();
        let coursework = if korean {
            json!({
                "selected_coursework": ["데이터베이스 시스템 (Database Systems)", "운영체제 (Operating Systems)"],
                "comma_separated_text": "관련 수강과목: 데이터베이스 시스템 (Database Systems), 운영체제 (Operating Systems)"
            })
        } else {
            json!({
                "selected_coursework": ["Database Systems", "Operating Systems"],
                "comma_separated_text": "Relevant Coursework: Database Systems, Operating Systems"
            })
        };

        StubGenerator::default()
            .with_response(
                "ProfessionalSummary",
                json!({"summary": "Backend engineer shipping Python services on AWS. Cut latency by 30%."})
                    .to_string(),
            )
            .with_response(
                "SkillsSection",
                json!({
                    "relevant_tools": ["Python", "AWS", "Docker"],
                    "summary_text": "Experienced with Python and AWS.",
                    "comma_separated_text": "Python, AWS, Docker"
                })
                .to_string(),
            )
            .with_response("ExperienceBullets", json!(experiences).to_string())
            .with_response("ProjectsSection", json!({ "projects": projects }).to_string())
            .with_response("CourseworkSection", coursework.to_string())
    }
}
