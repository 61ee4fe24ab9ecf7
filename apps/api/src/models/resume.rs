//! Base résumé data: the untailored source of truth every generation stage reads from.
//!
//! Loaded from a TOML file once per request. The structure is kept as a nested
//! key-value tree; only the sections the stages read are checked on load.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Dotted paths that must resolve for the pipeline to run.
const REQUIRED_SECTIONS: &[&[&str]] = &[
    &["personal", "name"],
    &["skills", "tools_os_frameworks"],
    &["experience"],
    &["projects"],
    &["coursework", "list"],
];

static NULL: Value = Value::Null;

#[derive(Debug, Error)]
pub enum ResumeDataError {
    #[error("Resume data file not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read resume data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse resume data TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Resume data is missing required section '{0}'")]
    MissingSection(String),
}

/// Immutable nested résumé data. Read-only to the tailoring pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseResumeData(Value);

impl BaseResumeData {
    /// Wraps an already-parsed tree after checking the required sections exist.
    pub fn from_value(value: Value) -> Result<Self, ResumeDataError> {
        for path in REQUIRED_SECTIONS {
            if lookup(&value, path).is_none() {
                return Err(ResumeDataError::MissingSection(path.join(".")));
            }
        }
        Ok(Self(value))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ResumeDataError> {
        let value: Value = toml::from_str(text)?;
        Self::from_value(value)
    }

    /// The whole tree, used by the summary stage.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn name(&self) -> &str {
        self.section(&["personal", "name"]).as_str().unwrap_or_default()
    }

    pub fn tools_and_frameworks(&self) -> &Value {
        self.section(&["skills", "tools_os_frameworks"])
    }

    pub fn experience(&self) -> &Value {
        self.section(&["experience"])
    }

    pub fn projects(&self) -> &Value {
        self.section(&["projects"])
    }

    pub fn coursework(&self) -> &Value {
        self.section(&["coursework", "list"])
    }

    fn section(&self, path: &[&str]) -> &Value {
        lookup(&self.0, path).unwrap_or(&NULL)
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// Loads base résumé data from a TOML file.
pub async fn load_resume_data(path: &Path) -> Result<BaseResumeData, ResumeDataError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ResumeDataError::NotFound(path.to_path_buf()));
    }

    let text = tokio::fs::read_to_string(path).await?;
    let data = BaseResumeData::from_toml_str(&text)?;
    debug!("Loaded resume data from {}", path.display());
    Ok(data)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use super::BaseResumeData;

    /// Base data with the requested number of experiences, projects and courses.
    pub fn base_data(experiences: usize, projects: usize, courses: usize) -> BaseResumeData {
        let experience: Vec<_> = (1..=experiences)
            .map(|i| {
                json!({
                    "company": format!("Company {i}"),
                    "what": format!("Built service {i}"),
                    "how": "Python on AWS Lambda",
                    "impact": "Cut latency by 30%",
                    "tech_stack": ["Python", "AWS"],
                })
            })
            .collect();
        let project_list: Vec<_> = (1..=projects)
            .map(|i| {
                json!({
                    "name": format!("Project {i}"),
                    "url": format!("github.com/jane/project-{i}"),
                    "date": "2023.01 - 2023.06",
                    "bullets": ["Designed the API", "Deployed on ECS"],
                })
            })
            .collect();
        let course_list: Vec<_> = (1..=courses).map(|i| format!("Course {i}")).collect();

        BaseResumeData::from_value(json!({
            "personal": { "name": "Jane Doe", "email": "jane@example.com" },
            "skills": { "tools_os_frameworks": ["Python", "AWS", "Docker", "FastAPI"] },
            "experience": experience,
            "projects": project_list,
            "coursework": { "list": course_list },
        }))
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE_TOML: &str = r#"
        [personal]
        name = "Jane Doe"
        email = "jane@example.com"

        [skills]
        tools_os_frameworks = ["Python", "AWS", "Docker"]

        [[experience]]
        what = "Built a billing service"
        how = "FastAPI on ECS"
        impact = "Handled 2M requests/day"
        tech_stack = ["Python", "FastAPI"]

        [[projects]]
        name = "Better Resume"
        url = "github.com/jane/better-resume"
        date = "2024.01"

        [coursework]
        list = ["Database Systems", "Operating Systems"]
    "#;

    #[test]
    fn test_parses_sections_from_toml() {
        let data = BaseResumeData::from_toml_str(SAMPLE_TOML).unwrap();
        assert_eq!(data.name(), "Jane Doe");
        assert_eq!(data.experience().as_array().unwrap().len(), 1);
        assert_eq!(data.projects().as_array().unwrap().len(), 1);
        assert_eq!(data.coursework().as_array().unwrap().len(), 2);
        assert_eq!(data.tools_and_frameworks()[0], "Python");
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let result = BaseResumeData::from_toml_str("[personal]\nname = \"Jane\"\n");
        match result {
            Err(ResumeDataError::MissingSection(path)) => {
                assert_eq!(path, "skills.tools_os_frameworks")
            }
            other => panic!("expected MissingSection, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = BaseResumeData::from_toml_str("this is = = not toml");
        assert!(matches!(result, Err(ResumeDataError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_TOML.as_bytes()).unwrap();

        let data = load_resume_data(file.path()).await.unwrap();
        assert_eq!(data.name(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = load_resume_data(&path).await;
        assert!(matches!(result, Err(ResumeDataError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_fixture_has_requested_counts() {
        let data = fixtures::base_data(3, 1, 6);
        assert_eq!(data.experience().as_array().unwrap().len(), 3);
        assert_eq!(data.projects().as_array().unwrap().len(), 1);
        assert_eq!(data.coursework().as_array().unwrap().len(), 6);
    }
}
