//! Core data types for classification results and conversation state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of previous intents kept in a conversation context
pub const MAX_PREVIOUS_INTENTS: usize = 5;

/// Intent labels, in the declaration order of the built-in pattern table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentLabel {
    CreateWebsite,
    ApplyTemplate,
    ModifyDesign,
    AddContent,
    PreviewSite,
    HelpRequest,
    /// A label handed back by a host that this crate does not know.
    #[serde(other)]
    Unknown,
}

impl IntentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::CreateWebsite => "create-website",
            IntentLabel::ApplyTemplate => "apply-template",
            IntentLabel::ModifyDesign => "modify-design",
            IntentLabel::AddContent => "add-content",
            IntentLabel::PreviewSite => "preview-site",
            IntentLabel::HelpRequest => "help-request",
            IntentLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    WebsiteType,
    Color,
    TemplateStyle,
    Feature,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::WebsiteType => "website-type",
            EntityType::Color => "color",
            EntityType::TemplateStyle => "template-style",
            EntityType::Feature => "feature",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character offsets of a match, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A recognized span of user text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity_type: EntityType,
    pub value: String,
    pub confidence: f64,
    pub position: Span,
}

impl Entity {
    pub fn new(entity_type: EntityType, value: String, confidence: f64, start: usize, end: usize) -> Self {
        Self {
            entity_type,
            value,
            confidence,
            position: Span { start, end },
        }
    }
}

/// Classification result for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub primary: IntentLabel,
    pub secondary: Vec<IntentLabel>,
    pub confidence: f64,
    pub entities: Vec<Entity>,
    /// Snapshot of the context the utterance was classified against.
    pub context: ConversationContext,
}

impl Intent {
    /// The intent returned when classification could not run.
    pub fn fallback(context: &ConversationContext) -> Self {
        Self {
            primary: IntentLabel::HelpRequest,
            secondary: Vec::new(),
            confidence: 0.5,
            entities: Vec::new(),
            context: context.clone(),
        }
    }

    /// First entity of the given type, in extraction order.
    pub fn first_entity(&self, entity_type: EntityType) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_type == entity_type)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPreference {
    Bright,
    Dark,
    Neutral,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_preference: Option<ColorPreference>,
    #[serde(default)]
    pub complexity_level: ComplexityLevel,
}

/// Caller-owned conversation state, persisted by the host between turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    /// Most recent first, at most [`MAX_PREVIOUS_INTENTS`].
    #[serde(default)]
    pub previous_intents: Vec<IntentLabel>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}
