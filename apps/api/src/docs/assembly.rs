//! Document Assembly: turns tailored content into marker substitutions and
//! submits them as one batch against the copied template.
//!
//! Operation construction is pure and deterministic; the order below is the
//! order the operations are built and submitted in:
//!   1. professional summary
//!   2. experiences, 1-indexed, in stage order
//!   3. skills (comma list, then summary)
//!   4. projects, only when at least two exist; first two only, 10 operations
//!   5. coursework
//!
//! With fewer than two projects the project markers are left in the document
//! untouched.

use serde::Serialize;
use tracing::{info, warn};

use crate::docs::client::DocumentStore;
use crate::errors::TailorError;
use crate::generation::schema::{Project, TailoredContent};

/// Projects filled into the template. The template has exactly two slots.
const PROJECT_SLOTS: [&str; 2] = ["project_one", "project_two"];

/// One marker → replacement pair, applied to every occurrence of the marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstitutionOperation {
    pub marker: String,
    pub replacement: String,
}

impl SubstitutionOperation {
    pub fn new(marker: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            replacement: replacement.into(),
        }
    }
}

/// The published document returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIdentity {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Browser URL of a Google Doc.
pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

/// `name` → `{{name_placeholder}}`
fn marker(name: &str) -> String {
    format!("{{{{{name}_placeholder}}}}")
}

// ────────────────────────────────────────────────────────────────────────────
// Operation construction
// ────────────────────────────────────────────────────────────────────────────

/// Builds the full substitution batch for `content`.
pub fn build_operations(content: &TailoredContent) -> Vec<SubstitutionOperation> {
    let mut operations = Vec::new();

    operations.push(SubstitutionOperation::new(
        marker("professional_summary"),
        &content.professional_summary.summary,
    ));

    operations.extend(content.selected_experiences.iter().enumerate().map(|(idx, exp)| {
        SubstitutionOperation::new(
            marker(&format!("experience_{}", idx + 1)),
            &exp.formatted_text,
        )
    }));

    operations.push(SubstitutionOperation::new(
        marker("skills"),
        &content.skills.comma_separated_text,
    ));
    operations.push(SubstitutionOperation::new(
        marker("skills_summary"),
        &content.skills.summary_text,
    ));

    operations.extend(project_operations(&content.projects.projects));

    operations.push(SubstitutionOperation::new(
        marker("coursework"),
        &content.coursework.comma_separated_text,
    ));

    operations
}

/// Ten operations for the top two projects, or none when fewer than two exist.
fn project_operations(projects: &[Project]) -> Vec<SubstitutionOperation> {
    if projects.len() < PROJECT_SLOTS.len() {
        warn!(
            "Only {} project(s) generated; project markers left unresolved",
            projects.len()
        );
        return Vec::new();
    }

    PROJECT_SLOTS
        .iter()
        .zip(projects)
        .flat_map(|(slot, project)| {
            [
                (format!("{slot}_name"), project.name.clone()),
                (format!("{slot}_link"), format!("({})", project.url)),
                (format!("{slot}_duration"), project.date.clone()),
                (format!("{slot}_1"), bullet(project, 0).to_string()),
                (format!("{slot}_2"), bullet(project, 1).to_string()),
            ]
        })
        .map(|(name, replacement)| SubstitutionOperation::new(marker(&name), replacement))
        .collect()
}

fn bullet(project: &Project, idx: usize) -> &str {
    project
        .formatted_bullets
        .get(idx)
        .map(String::as_str)
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Submission
// ────────────────────────────────────────────────────────────────────────────

/// Submits `operations` as one batch against `document_id`.
///
/// On failure the copied document is left in place; nothing is rolled back.
pub async fn submit(
    store: &dyn DocumentStore,
    document_id: &str,
    title: &str,
    operations: &[SubstitutionOperation],
) -> Result<DocumentIdentity, TailorError> {
    store
        .batch_replace(document_id, operations)
        .await
        .map_err(|e| TailorError::DocumentAssemblyFailure {
            document_id: document_id.to_string(),
            cause: e.to_string(),
        })?;

    info!(
        "Populated document {document_id} with {} substitutions",
        operations.len()
    );

    Ok(DocumentIdentity {
        id: document_id.to_string(),
        title: title.to_string(),
        url: document_url(document_id),
    })
}
