//! Template Store: copies the language's résumé template into a fresh document.
//!
//! Templates are never edited in place; every request works on its own copy.

use tracing::info;

use crate::docs::client::DocumentStore;
use crate::errors::TailorError;
use crate::models::language::Language;

/// Template document ids, one per supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIds {
    pub english: String,
    pub korean: String,
}

impl TemplateIds {
    pub fn for_language(&self, language: Language) -> &str {
        match language {
            Language::En => &self.english,
            Language::Kr => &self.korean,
        }
    }
}

/// Copies `template_id` into a new document titled `title`, returning its id.
pub async fn copy_template(
    store: &dyn DocumentStore,
    template_id: &str,
    title: &str,
) -> Result<String, TailorError> {
    let document_id = store.copy_file(template_id, title).await.map_err(|e| {
        TailorError::DocumentCreationFailure {
            template_id: template_id.to_string(),
            cause: e.to_string(),
        }
    })?;

    info!("Copied template {template_id} into document {document_id} ({title})");
    Ok(document_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::client::stub::RecordingStore;

    fn templates() -> TemplateIds {
        TemplateIds {
            english: "EN_TEMPLATE_ID".to_string(),
            korean: "KR_TEMPLATE_ID".to_string(),
        }
    }

    #[test]
    fn test_template_selection_by_language() {
        let ids = templates();
        assert_eq!(ids.for_language(Language::En), "EN_TEMPLATE_ID");
        assert_eq!(ids.for_language(Language::Kr), "KR_TEMPLATE_ID");
    }

    #[tokio::test]
    async fn test_copy_template_returns_new_id() {
        let store = RecordingStore::default();

        let id = copy_template(&store, "EN_TEMPLATE_ID", "English Resume - Jane Doe")
            .await
            .unwrap();

        assert_eq!(id, "copy-1");
        let copies = store.copies.lock().unwrap();
        assert_eq!(
            copies[0],
            (
                "EN_TEMPLATE_ID".to_string(),
                "English Resume - Jane Doe".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_copy_failure_is_document_creation_failure() {
        let store = RecordingStore {
            fail_copy: true,
            ..Default::default()
        };

        let err = copy_template(&store, "bogus", "title").await.unwrap_err();
        assert!(matches!(
            err,
            TailorError::DocumentCreationFailure { template_id, .. } if template_id == "bogus"
        ));
    }
}
