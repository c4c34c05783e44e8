//! WindWalker core - intent classification and template recommendation
//!
//! Turns chat messages from the site-builder extension into classified
//! intents and replies, ranks site templates for them, and materialises a
//! chosen template into static HTML, CSS and JS files.

pub mod assistant;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod entities;
pub mod error;
pub mod generator;
pub mod patterns;
pub mod recommender;
pub mod response;
pub mod similarity;
pub mod telemetry;
pub mod types;
pub mod writer;

pub use assistant::{AssistantTurn, SiteAssistant};
pub use catalog::{Template, TemplateCatalog, TemplateCategory};
pub use classifier::IntentClassifier;
pub use config::Config;
pub use entities::EntityExtractor;
pub use error::{CoreError, Result};
pub use generator::{Customizations, GeneratedSite};
pub use recommender::{ApplyResult, RecommendationRequest, TemplateRecommender};
pub use response::{Response, ResponseComposer};
pub use types::*;
pub use writer::{FsSiteWriter, SiteWriter};

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn windwalker_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyConversationAI>()?;
    m.add_class::<PyTemplateRecommender>()?;
    m.add_function(wrap_pyfunction!(py_init_logging, m)?)?;
    Ok(())
}
