//! Entity extraction from user input

use regex::Regex;

use crate::patterns::ENTITY_PATTERNS;
use crate::types::{Entity, EntityType};

/// Confidence assigned to every regex entity match
pub const ENTITY_CONFIDENCE: f64 = 0.8;

/// Extract website types, colors, styles and features from user input.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<(Regex, EntityType)>,
    confidence: f64,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::with_patterns(ENTITY_PATTERNS.clone())
    }

    pub fn with_patterns(patterns: Vec<(Regex, EntityType)>) -> Self {
        Self {
            patterns,
            confidence: ENTITY_CONFIDENCE,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Every match of every pattern, in table order then match order.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for (pattern, entity_type) in &self.patterns {
            for matched in pattern.find_iter(text) {
                // Regex offsets are bytes; hosts index by character.
                let start = text[..matched.start()].chars().count();
                let end = start + matched.as_str().chars().count();
                entities.push(Entity::new(
                    *entity_type,
                    matched.as_str().to_string(),
                    self.confidence,
                    start,
                    end,
                ));
            }
        }

        entities
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_website_type() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("레스토랑 웹사이트를 만들고 싶어요");

        let website = entities
            .iter()
            .find(|e| e.entity_type == EntityType::WebsiteType)
            .expect("website type entity");
        assert_eq!(website.value, "레스토랑");
        assert_eq!(website.position.start, 0);
        assert_eq!(website.position.end, 4);
        assert!((website.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_character_offsets_after_multibyte_text() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("배경을 blue 로");

        let color = entities.iter().find(|e| e.entity_type == EntityType::Color).unwrap();
        assert_eq!(color.value, "blue");
        assert_eq!(color.position.start, 4);
        assert_eq!(color.position.end, 8);
    }

    #[test]
    fn test_table_order_then_match_order() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("modern red cafe with a black logo");

        let types: Vec<EntityType> = entities.iter().map(|e| e.entity_type).collect();
        assert_eq!(
            types,
            vec![
                EntityType::WebsiteType,
                EntityType::Color,
                EntityType::Color,
                EntityType::TemplateStyle,
            ]
        );
        assert_eq!(entities[1].value, "red");
        assert_eq!(entities[2].value, "black");
    }

    #[test]
    fn test_keeps_original_casing() {
        let entities = EntityExtractor::new().extract("A Minimal Portfolio");
        assert!(entities.iter().any(|e| e.value == "Portfolio"));
        assert!(entities.iter().any(|e| e.value == "Minimal"));
    }

    #[test]
    fn test_no_entities() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract("안녕하세요").is_empty());
        assert!(extractor.extract("").is_empty());
    }
}
