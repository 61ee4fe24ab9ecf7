// Document publishing: template copy, marker substitution, and the
// Google Docs / Drive transport behind both.

pub mod assembly;
pub mod client;
pub mod template;

pub use assembly::{build_operations, DocumentIdentity};
pub use client::{DocumentStore, GoogleDocsClient};
pub use template::TemplateIds;
