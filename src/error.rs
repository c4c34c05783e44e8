//! Error type shared by every fallible operation in the crate

use thiserror::Error;

use crate::catalog::TemplateCategory;
use crate::types::IntentLabel;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid pattern '{pattern}' for {table}: {source}")]
    InvalidPattern {
        table: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("intent pattern table is empty")]
    EmptyPatternTable,

    #[error("phrase index {index} out of range for {label} ({len} phrases)")]
    PhraseOutOfRange {
        label: IntentLabel,
        index: usize,
        len: usize,
    },

    #[error("no templates in category '{0}'")]
    NoCategoryMatch(TemplateCategory),

    #[error("template catalog is empty")]
    EmptyCatalog,

    #[error("Template ID '{0}' does not exist")]
    TemplateNotFound(String),

    #[error("duplicate template id: {0}")]
    DuplicateTemplate(String),

    #[error("no workspace folder is open")]
    NoOutputRoot,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
