//! Python bindings for the core using PyO3
//!
//! Payloads cross the boundary as JSON strings in the same camelCase shape
//! the editor host exchanges.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::TemplateCatalog;
use crate::classifier::IntentClassifier;
use crate::config::PhraseSelection;
use crate::generator::Customizations;
use crate::recommender::{RecommendationRequest, TemplateRecommender};
use crate::response::{Response, ResponseComposer};
use crate::telemetry::init_telemetry_with_level;
use crate::types::{ConversationContext, Intent};
use crate::writer::FsSiteWriter;

fn from_json<T: DeserializeOwned>(data: &str, what: &str) -> PyResult<T> {
    serde_json::from_str(data).map_err(|e| PyValueError::new_err(format!("Invalid {}: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(format!("Failed to serialize: {}", e)))
}

fn context_from(context_json: Option<&str>) -> PyResult<ConversationContext> {
    match context_json {
        Some(data) => from_json(data, "context"),
        None => Ok(ConversationContext::default()),
    }
}

/// Install the tracing subscriber (Python function)
#[pyfunction]
#[pyo3(signature = (level = "info"))]
pub fn py_init_logging(level: &str) {
    init_telemetry_with_level(level);
}

/// Python wrapper for classification and reply composition
#[pyclass]
pub struct PyConversationAI {
    classifier: IntentClassifier,
    composer: ResponseComposer,
}

#[pymethods]
impl PyConversationAI {
    #[new]
    #[pyo3(signature = (deterministic = false))]
    fn new(deterministic: bool) -> Self {
        let selection = if deterministic {
            PhraseSelection::First
        } else {
            PhraseSelection::Random
        };
        Self {
            classifier: IntentClassifier::new(),
            composer: ResponseComposer::from_selection(selection),
        }
    }

    /// Classify a message; returns the intent as JSON
    #[pyo3(signature = (message, context_json = None))]
    fn classify(&self, message: &str, context_json: Option<&str>) -> PyResult<String> {
        let context = context_from(context_json)?;
        to_json(&self.classifier.classify(message, &context))
    }

    /// Compose and personalise the reply for an intent JSON
    fn respond(&self, intent_json: &str, message: &str) -> PyResult<String> {
        let intent: Intent = from_json(intent_json, "intent")?;
        let response = self.composer.respond(&intent, message);
        to_json(&self.composer.personalize(response, &intent.context))
    }

    fn personalize(&self, response_json: &str, context_json: &str) -> PyResult<String> {
        let response: Response = from_json(response_json, "response")?;
        let context = context_from(Some(context_json))?;
        to_json(&self.composer.personalize(response, &context))
    }

    /// Advance the context by one turn; returns the new context JSON
    fn update_context(&self, context_json: &str, intent_json: &str) -> PyResult<String> {
        let context = context_from(Some(context_json))?;
        let intent: Intent = from_json(intent_json, "intent")?;
        to_json(&self.composer.update_context(&context, &intent, &intent.entities))
    }
}

/// Python wrapper for the template recommender
#[pyclass]
pub struct PyTemplateRecommender {
    recommender: TemplateRecommender,
}

#[pymethods]
impl PyTemplateRecommender {
    #[new]
    #[pyo3(signature = (catalog_json = None))]
    fn new(catalog_json: Option<&str>) -> PyResult<Self> {
        let catalog = match catalog_json {
            Some(data) => TemplateCatalog::from_json(data).map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => TemplateCatalog::builtin(),
        };
        Ok(Self {
            recommender: TemplateRecommender::new(catalog),
        })
    }

    /// Recommend templates for a request JSON; returns a JSON list
    fn recommend(&self, request_json: &str) -> PyResult<String> {
        let request: RecommendationRequest = from_json(request_json, "request")?;
        to_json(&self.recommender.recommend(&request))
    }

    /// Write a template under `root`; returns the apply result JSON
    #[pyo3(signature = (template_id, root = None, customizations_json = None))]
    fn apply(&self, template_id: &str, root: Option<String>, customizations_json: Option<&str>) -> PyResult<String> {
        let customizations: Option<Customizations> = match customizations_json {
            Some(data) => Some(from_json(data, "customizations")?),
            None => None,
        };
        let writer = match root {
            Some(root) => FsSiteWriter::new(root),
            None => FsSiteWriter::detached(),
        };
        to_json(&self.recommender.apply(template_id, customizations.as_ref(), &writer))
    }

    fn search(&self, query: &str) -> PyResult<Vec<String>> {
        Ok(self
            .recommender
            .catalog()
            .search(query)
            .into_iter()
            .map(|t| t.id.clone())
            .collect())
    }

    fn __len__(&self) -> usize {
        self.recommender.catalog().len()
    }
}
