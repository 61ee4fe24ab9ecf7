//! Tailor-and-publish pipeline: the entry point for one tailoring request.
//!
//! Flow: generate (five stages, joined) → copy template → build substitutions →
//!       submit one batch → DocumentIdentity.
//!
//! Each request walks a forward-only state machine:
//!   Idle → Generating → Aggregated → TemplateCopied → Submitting → Done
//! and any error jumps to the terminal `Failed` state. Template copy only starts
//! once every stage has produced valid content, so a generation failure never
//! leaves a document behind.

use serde::Serialize;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::docs::assembly::{self, DocumentIdentity};
use crate::docs::template::copy_template;
use crate::docs::{build_operations, DocumentStore, TemplateIds};
use crate::errors::TailorError;
use crate::generation::generator::{generate_tailored_content, StageInputs};
use crate::llm_client::ContentGenerator;
use crate::models::language::Language;
use crate::models::resume::BaseResumeData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Generating,
    Aggregated,
    TemplateCopied,
    Submitting,
    Done,
    Failed,
}

impl PipelineState {
    /// The single state that may follow this one on success.
    fn next(self) -> Option<PipelineState> {
        match self {
            PipelineState::Idle => Some(PipelineState::Generating),
            PipelineState::Generating => Some(PipelineState::Aggregated),
            PipelineState::Aggregated => Some(PipelineState::TemplateCopied),
            PipelineState::TemplateCopied => Some(PipelineState::Submitting),
            PipelineState::Submitting => Some(PipelineState::Done),
            PipelineState::Done | PipelineState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    pub fn can_transition_to(self, to: PipelineState) -> bool {
        if to == PipelineState::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

/// Tracks one request's progress through the pipeline.
#[derive(Debug)]
pub struct PipelineRun {
    id: Uuid,
    state: PipelineState,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Moves forward one step. Out-of-order transitions are ignored and logged;
    /// they indicate a bug in the pipeline wiring.
    fn advance(&mut self, to: PipelineState) {
        if !self.state.can_transition_to(to) {
            error!("Rejected pipeline transition {:?} → {:?}", self.state, to);
            return;
        }
        info!("Pipeline {} {:?} → {:?}", self.id, self.state, to);
        self.state = to;
    }

    fn fail(&mut self, err: &TailorError) {
        error!("Pipeline {} failed in {:?}: {err}", self.id, self.state);
        if let Some(raw) = err.raw_payload() {
            debug!("Pipeline {} rejected payload: {raw}", self.id);
        }
        self.advance(PipelineState::Failed);
    }

    /// Records the outcome of a step, moving to `Failed` on error.
    fn track<T>(&mut self, result: Result<T, TailorError>) -> Result<T, TailorError> {
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Title of the published document, e.g. "English Resume - Jane Doe".
pub fn document_title(language: Language, base: &BaseResumeData) -> String {
    format!("{} Resume - {}", language.display_name(), base.name())
}

/// Generates tailored content for `job_description` and publishes it as a copy
/// of the language's template.
pub async fn tailor_and_publish(
    llm: &dyn ContentGenerator,
    store: &dyn DocumentStore,
    templates: &TemplateIds,
    job_description: &str,
    language: Language,
    base: &BaseResumeData,
) -> Result<DocumentIdentity, TailorError> {
    let mut run = PipelineRun::new();
    let span = info_span!("tailor", request_id = %run.id, language = %language);

    async move {
        run.advance(PipelineState::Generating);
        let inputs = StageInputs {
            base,
            job_description,
            language,
        };
        let content = run.track(generate_tailored_content(llm, inputs).await)?;
        run.advance(PipelineState::Aggregated);

        let title = document_title(language, base);
        let template_id = templates.for_language(language);
        let document_id = run.track(copy_template(store, template_id, &title).await)?;
        run.advance(PipelineState::TemplateCopied);

        let operations = build_operations(&content);
        run.advance(PipelineState::Submitting);
        let document =
            run.track(assembly::submit(store, &document_id, &title, &operations).await)?;
        run.advance(PipelineState::Done);

        info!("Published tailored resume {}", document.url);
        Ok(document)
    }
    .instrument(span)
    .await
}
