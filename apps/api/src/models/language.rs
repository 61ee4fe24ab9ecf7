use serde::{Deserialize, Serialize};

/// Output language of a tailored résumé. Only the two languages with a
/// matching document template are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Kr,
}

impl Language {
    /// Display name used in prompts and document titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Kr => "Korean",
        }
    }

    /// Label the coursework line must start with.
    pub fn coursework_prefix(self) -> &'static str {
        match self {
            Language::En => "Relevant Coursework:",
            Language::Kr => "관련 수강과목:",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Kr => "kr",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
