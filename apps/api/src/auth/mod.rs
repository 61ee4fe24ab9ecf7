// Google credentials: OAuth consent + code exchange, and per-user token storage.

pub mod credentials;
pub mod oauth;

pub use credentials::{CredentialProvider, FileCredentialProvider};
pub use oauth::OAuthClient;
