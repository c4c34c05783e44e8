//! One chat turn: classify, reply, recommend and advance the context

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Template, TemplateCatalog};
use crate::classifier::IntentClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::generator::Customizations;
use crate::recommender::{ApplyResult, Preferences, RecommendationRequest, TemplateRecommender};
use crate::response::{Response, ResponseComposer};
use crate::types::{ConversationContext, EntityType, Intent, IntentLabel};
use crate::writer::SiteWriter;

/// Everything the chat view needs after one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantTurn {
    pub intent: Intent,
    pub response: Response,
    pub recommendations: Vec<Template>,
    /// Context for the host to persist and pass back next turn.
    pub context: ConversationContext,
}

#[derive(Debug)]
pub struct SiteAssistant {
    classifier: IntentClassifier,
    composer: ResponseComposer,
    recommender: TemplateRecommender,
}

impl SiteAssistant {
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!(path = %path.display(), "loading template catalog");
                TemplateCatalog::load(path)?
            }
            None => TemplateCatalog::builtin(),
        };

        Ok(Self::from_parts(
            IntentClassifier::with_config(config.classifier.clone()),
            ResponseComposer::from_selection(config.composer.phrase_selection),
            TemplateRecommender::with_config(catalog, config.recommender.clone()),
        ))
    }

    pub fn from_parts(
        classifier: IntentClassifier,
        composer: ResponseComposer,
        recommender: TemplateRecommender,
    ) -> Self {
        Self {
            classifier,
            composer,
            recommender,
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    pub fn recommender(&self) -> &TemplateRecommender {
        &self.recommender
    }

    pub fn handle_message(&self, message: &str, context: &ConversationContext) -> AssistantTurn {
        let intent = self.classifier.classify(message, context);
        let response = self.composer.respond(&intent, message);
        let response = self.composer.personalize(response, context);
        let updated = self.composer.update_context(context, &intent, &intent.entities);

        let recommendations = match intent.primary {
            IntentLabel::CreateWebsite | IntentLabel::ApplyTemplate => {
                self.recommender.recommend(&recommendation_request(&intent, &updated))
            }
            _ => Vec::new(),
        };

        debug!(
            primary = %intent.primary,
            recommendations = recommendations.len(),
            "handled chat message"
        );

        AssistantTurn {
            intent,
            response,
            recommendations,
            context: updated,
        }
    }

    pub fn apply_template(
        &self,
        template_id: &str,
        customizations: Option<&Customizations>,
        writer: &dyn SiteWriter,
    ) -> ApplyResult {
        self.recommender.apply(template_id, customizations, writer)
    }
}

/// Query the recommender with the detected website type, else the known project type.
fn recommendation_request(intent: &Intent, context: &ConversationContext) -> RecommendationRequest {
    let query = intent
        .first_entity(EntityType::WebsiteType)
        .map(|e| e.value.clone())
        .or_else(|| context.project_type.clone())
        .unwrap_or_else(|| intent.primary.to_string());

    let mut request = RecommendationRequest::new(query);
    if let Some(style) = &context.user_preferences.preferred_style {
        request.preferences = Some(Preferences {
            style: Some(style.clone()),
            color_scheme: None,
        });
    }
    request
}
