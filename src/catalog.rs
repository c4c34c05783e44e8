//! Template catalog - load-once, read-many table of site templates

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::similarity::field_similarity;

/// Minimum similarity for a template to appear in search results
pub const SEARCH_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Restaurant,
    Portfolio,
    Blog,
    Ecommerce,
    Business,
    Landing,
    Personal,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Restaurant => "restaurant",
            TemplateCategory::Portfolio => "portfolio",
            TemplateCategory::Blog => "blog",
            TemplateCategory::Ecommerce => "ecommerce",
            TemplateCategory::Business => "business",
            TemplateCategory::Landing => "landing",
            TemplateCategory::Personal => "personal",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    SinglePage,
    MultiPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Hero,
    Content,
    Gallery,
    Contact,
    Footer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub customizable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub layout: Layout,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
    pub base_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub small: String,
    pub medium: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultStyles {
    pub colors: ColorScheme,
    pub typography: Typography,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Base recommendation score.
    pub popularity: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: TemplateCategory,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub structure: Structure,
    pub default_styles: DefaultStyles,
    #[serde(default = "default_true")]
    pub responsive: bool,
    #[serde(default)]
    pub features: Vec<String>,
    pub metadata: TemplateMetadata,
}

impl Template {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// ---------------------------------------------------------------------------
// TemplateCatalog
// ---------------------------------------------------------------------------

/// Immutable template table; iteration follows load order.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
    index: AHashMap<String, usize>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        if templates.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        let mut index = AHashMap::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            if index.insert(template.id.clone(), position).is_some() {
                return Err(CoreError::DuplicateTemplate(template.id.clone()));
            }
        }
        debug!(templates = templates.len(), "template catalog loaded");
        Ok(Self { templates, index })
    }

    /// The built-in catalog shipped with the extension.
    pub fn builtin() -> Self {
        let templates = builtin_templates();
        let index = templates
            .iter()
            .enumerate()
            .map(|(position, t)| (t.id.clone(), position))
            .collect();
        Self { templates, index }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let templates: Vec<Template> = serde_json::from_str(data)?;
        Self::new(templates)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.index.get(id).map(|&position| &self.templates[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.category == category).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates whose name, description or tags resemble `query`, best first.
    pub fn search(&self, query: &str) -> Vec<&Template> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&Template, f64)> = self
            .templates
            .iter()
            .map(|t| {
                let mut fields = vec![t.name.as_str(), t.description.as_str(), t.category.as_str()];
                fields.extend(t.tags.iter().map(String::as_str));
                (t, field_similarity(query, &fields))
            })
            .filter(|(_, score)| *score >= SEARCH_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(t, _)| t).collect()
    }
}

fn section(id: &str, name: &str, kind: SectionKind, required: bool) -> Section {
    Section {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        required,
        customizable: true,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn styles(colors: [&str; 5], heading_font: &str, body_font: &str) -> DefaultStyles {
    let [primary, secondary, accent, background, text] = colors;
    DefaultStyles {
        colors: ColorScheme {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: background.to_string(),
            text: text.to_string(),
        },
        typography: Typography {
            heading_font: heading_font.to_string(),
            body_font: body_font.to_string(),
            base_size: "16px".to_string(),
        },
        spacing: Spacing {
            small: "0.5rem".to_string(),
            medium: "1rem".to_string(),
            large: "2rem".to_string(),
        },
    }
}

fn metadata(popularity: u32) -> TemplateMetadata {
    TemplateMetadata {
        popularity,
        author: "WindWalker".to_string(),
        version: "1.0.0".to_string(),
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        Template {
            id: "restaurant-modern".to_string(),
            name: "Modern Restaurant".to_string(),
            description: "Menu, gallery and reservations for restaurants and cafes".to_string(),
            category: TemplateCategory::Restaurant,
            difficulty: Difficulty::Beginner,
            tags: strings(&["modern", "food", "restaurant", "cafe"]),
            structure: Structure {
                layout: Layout::SinglePage,
                sections: vec![
                    section("header", "Header", SectionKind::Header, true),
                    section("hero", "Hero", SectionKind::Hero, true),
                    section("menu", "Menu", SectionKind::Content, true),
                    section("gallery", "Gallery", SectionKind::Gallery, false),
                    section("contact", "Reservations", SectionKind::Contact, false),
                    section("footer", "Footer", SectionKind::Footer, true),
                ],
            },
            default_styles: styles(
                ["#d35400", "#2c3e50", "#f39c12", "#fffaf3", "#2d2d2d"],
                "'Playfair Display', serif",
                "'Noto Sans KR', sans-serif",
            ),
            responsive: true,
            features: strings(&["menu", "gallery", "reservation"]),
            metadata: metadata(95),
        },
        Template {
            id: "portfolio-minimal".to_string(),
            name: "Minimal Portfolio".to_string(),
            description: "Clean showcase for designers, artists and developers".to_string(),
            category: TemplateCategory::Portfolio,
            difficulty: Difficulty::Intermediate,
            tags: strings(&["minimal", "creative", "portfolio", "showcase"]),
            structure: Structure {
                layout: Layout::SinglePage,
                sections: vec![
                    section("header", "Header", SectionKind::Header, true),
                    section("hero", "Intro", SectionKind::Hero, true),
                    section("work", "Selected Work", SectionKind::Gallery, true),
                    section("about", "About", SectionKind::Content, false),
                    section("contact", "Contact", SectionKind::Contact, false),
                    section("footer", "Footer", SectionKind::Footer, true),
                ],
            },
            default_styles: styles(
                ["#111111", "#555555", "#0070f3", "#ffffff", "#111111"],
                "'Inter', sans-serif",
                "'Inter', sans-serif",
            ),
            responsive: true,
            features: strings(&["gallery", "contact-form"]),
            metadata: metadata(87),
        },
        Template {
            id: "business-corporate".to_string(),
            name: "Corporate Business".to_string(),
            description: "Multi-page company site with services, about and contact".to_string(),
            category: TemplateCategory::Business,
            difficulty: Difficulty::Advanced,
            tags: strings(&["professional", "classic", "business", "corporate"]),
            structure: Structure {
                layout: Layout::MultiPage,
                sections: vec![
                    section("header", "Header", SectionKind::Header, true),
                    section("hero", "Hero", SectionKind::Hero, true),
                    section("services", "Services", SectionKind::Content, true),
                    section("about", "About Us", SectionKind::Content, false),
                    section("testimonials", "Testimonials", SectionKind::Other, false),
                    section("contact", "Contact", SectionKind::Contact, true),
                    section("footer", "Footer", SectionKind::Footer, true),
                ],
            },
            default_styles: styles(
                ["#1a365d", "#2b6cb0", "#ed8936", "#f7fafc", "#1a202c"],
                "'Montserrat', sans-serif",
                "'Open Sans', sans-serif",
            ),
            responsive: true,
            features: strings(&["services", "testimonials", "contact-form"]),
            metadata: metadata(78),
        },
    ]
}
