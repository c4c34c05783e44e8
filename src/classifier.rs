//! Intent classifier - scores user input against ordered pattern tables

use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::entities::EntityExtractor;
use crate::error::{CoreError, Result};
use crate::patterns::{IntentPatterns, INTENT_PATTERNS};
use crate::types::{ConversationContext, Intent, IntentLabel};

/// Label used when no pattern matches
pub const DEFAULT_INTENT: IntentLabel = IntentLabel::HelpRequest;

/// Classify chat messages into intents, entities and a confidence score.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    intents: Vec<IntentPatterns>,
    extractor: EntityExtractor,
    config: ClassifierConfig,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        let extractor = EntityExtractor::new().with_confidence(config.entity_confidence);
        Self {
            intents: INTENT_PATTERNS.clone(),
            extractor,
            config,
        }
    }

    /// Build a classifier over custom tables; label order is the tie-break order.
    pub fn with_tables(intents: Vec<IntentPatterns>, extractor: EntityExtractor, config: ClassifierConfig) -> Self {
        Self {
            intents,
            extractor,
            config,
        }
    }

    /// Classify `message`. Never fails: internal errors yield [`Intent::fallback`].
    pub fn classify(&self, message: &str, context: &ConversationContext) -> Intent {
        match self.try_classify(message, context) {
            Ok(intent) => {
                debug!(
                    primary = %intent.primary,
                    confidence = intent.confidence,
                    entities = intent.entities.len(),
                    "classified message"
                );
                intent
            }
            Err(e) => {
                warn!(error = %e, "intent classification failed, using fallback");
                Intent::fallback(context)
            }
        }
    }

    pub fn try_classify(&self, message: &str, context: &ConversationContext) -> Result<Intent> {
        if self.intents.is_empty() {
            return Err(CoreError::EmptyPatternTable);
        }

        let scores: Vec<(IntentLabel, f64)> = self
            .intents
            .iter()
            .map(|group| (group.label, pattern_score(group, message)))
            .collect();

        // Strictly greater keeps the first declared label on ties.
        let mut primary = DEFAULT_INTENT;
        let mut primary_score = 0.0;
        for (label, score) in &scores {
            if *score > primary_score {
                primary = *label;
                primary_score = *score;
            }
        }

        let secondary: Vec<IntentLabel> = scores
            .iter()
            .filter(|(label, score)| {
                *label != primary && *score > self.config.secondary_min && *score < self.config.secondary_max
            })
            .map(|(label, _)| *label)
            .take(self.config.max_secondary)
            .collect();

        let entities = self.extractor.extract(message);
        let confidence = self.confidence(message, primary_score, entities.len());

        Ok(Intent {
            primary,
            secondary,
            confidence,
            entities,
            context: context.clone(),
        })
    }

    fn confidence(&self, message: &str, primary_score: f64, entity_count: usize) -> f64 {
        let cfg = &self.config;
        let mut confidence = cfg.base_confidence
            + cfg.pattern_weight * primary_score
            + (cfg.entity_weight * entity_count as f64).min(cfg.entity_cap);

        if message.chars().count() < cfg.short_message_len {
            confidence *= cfg.short_message_penalty;
        }

        confidence.min(1.0)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of a label's patterns that match, capped at 1.0.
fn pattern_score(group: &IntentPatterns, message: &str) -> f64 {
    if group.patterns.is_empty() {
        return 0.0;
    }
    let matched = group.patterns.iter().filter(|p| p.is_match(message)).count();
    (matched as f64 / group.patterns.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{compile_entity_table, compile_intent_table};
    use crate::types::EntityType;
    use pretty_assertions::assert_eq;

    fn classifier_for(sources: &[(IntentLabel, &[&str])]) -> IntentClassifier {
        let no_entities: &[(EntityType, &[&str])] = &[];
        IntentClassifier::with_tables(
            compile_intent_table(sources).unwrap(),
            EntityExtractor::with_patterns(compile_entity_table(no_entities).unwrap()),
            ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_restaurant_website_request() {
        let classifier = IntentClassifier::new();
        let intent = classifier.classify("레스토랑 웹사이트를 만들고 싶어요", &ConversationContext::default());

        assert_eq!(intent.primary, IntentLabel::CreateWebsite);
        assert!(intent.confidence >= 0.5);
        assert!(intent
            .entities
            .iter()
            .any(|e| e.entity_type == EntityType::WebsiteType && e.value.contains("레스토랑")));
    }

    #[test]
    fn test_short_perfect_match_is_penalised() {
        let classifier = classifier_for(&[(IntentLabel::CreateWebsite, &[r"사이트"])]);
        let intent = classifier.classify("사이트 만들기", &ConversationContext::default());

        assert_eq!(intent.primary, IntentLabel::CreateWebsite);
        assert!((intent.confidence - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_no_match_falls_back_to_help_request() {
        let classifier = IntentClassifier::new();
        let intent = classifier.classify("안녕하세요 반갑습니다", &ConversationContext::default());

        assert_eq!(intent.primary, IntentLabel::HelpRequest);
        assert!(intent.secondary.is_empty());
        assert!(intent.entities.is_empty());
        assert!((intent.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_declared_label() {
        let classifier = classifier_for(&[
            (IntentLabel::ModifyDesign, &[r"색"]),
            (IntentLabel::AddContent, &[r"색"]),
        ]);
        let intent = classifier.classify("배경 색을 넣어줘요", &ConversationContext::default());
        assert_eq!(intent.primary, IntentLabel::ModifyDesign);

        let reversed = classifier_for(&[
            (IntentLabel::AddContent, &[r"색"]),
            (IntentLabel::ModifyDesign, &[r"색"]),
        ]);
        let intent = reversed.classify("배경 색을 넣어줘요", &ConversationContext::default());
        assert_eq!(intent.primary, IntentLabel::AddContent);
    }

    #[test]
    fn test_secondary_band_is_exclusive() {
        let classifier = classifier_for(&[
            // 2 of 2 -> 1.0, ties with ModifyDesign and wins by order
            (IntentLabel::CreateWebsite, &[r"a", r"b"]),
            // 1 of 2 -> 0.5, inside the band
            (IntentLabel::ApplyTemplate, &[r"a", r"z"]),
            // 1 of 1 -> 1.0, above the band
            (IntentLabel::ModifyDesign, &[r"a"]),
            // 1 of 3 -> 0.333, inside the band
            (IntentLabel::AddContent, &[r"a", r"y", r"z"]),
            // 1 of 4 -> 0.25, below the band
            (IntentLabel::PreviewSite, &[r"a", r"x", r"y", r"z"]),
            // 2 of 4 -> 0.5, inside but beyond the first two
            (IntentLabel::HelpRequest, &[r"a", r"b", r"y", r"z"]),
        ]);
        let intent = classifier.classify("ab and more", &ConversationContext::default());

        assert_eq!(intent.primary, IntentLabel::CreateWebsite);
        assert_eq!(intent.secondary, vec![IntentLabel::ApplyTemplate, IntentLabel::AddContent]);
    }

    #[test]
    fn test_entity_bonus_is_capped() {
        let classifier = IntentClassifier::new();
        let intent = classifier.classify(
            "red blue green black white pink colors everywhere",
            &ConversationContext::default(),
        );
        assert_eq!(intent.entities.len(), 6);
        // 0.5 base + 0.3 capped entity bonus, no pattern score
        assert!((intent.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_never_exceeds_one() {
        let classifier = classifier_for(&[(IntentLabel::CreateWebsite, &[r"."])]);
        let classifier = IntentClassifier {
            extractor: EntityExtractor::new(),
            ..classifier
        };
        let intent = classifier.classify(
            "modern red blue cafe portfolio blog with a gallery and contact form",
            &ConversationContext::default(),
        );
        assert!(intent.confidence <= 1.0);
        assert!(intent.confidence >= 0.0);
        assert!((intent.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_message() {
        let classifier = IntentClassifier::new();
        let intent = classifier.classify("", &ConversationContext::default());
        assert_eq!(intent.primary, IntentLabel::HelpRequest);
        assert!(intent.entities.is_empty());
        assert!((intent.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_returns_fallback() {
        let classifier = classifier_for(&[]);
        let mut context = ConversationContext::default();
        context.project_type = Some("blog".to_string());

        assert!(matches!(
            classifier.try_classify("블로그 만들기", &context),
            Err(CoreError::EmptyPatternTable)
        ));
        let intent = classifier.classify("블로그 만들기", &context);
        assert_eq!(intent, Intent::fallback(&context));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = IntentClassifier::new();
        let context = ConversationContext::default();
        let message = "모던한 카페 템플릿을 추천해 주세요";
        assert_eq!(classifier.classify(message, &context), classifier.classify(message, &context));
    }

    #[test]
    fn test_context_is_snapshotted() {
        let classifier = IntentClassifier::new();
        let mut context = ConversationContext::default();
        context.previous_intents.push(IntentLabel::CreateWebsite);

        let intent = classifier.classify("템플릿 적용해줘", &context);
        assert_eq!(intent.primary, IntentLabel::ApplyTemplate);
        assert_eq!(intent.context, context);
    }
}
