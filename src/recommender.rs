//! Template recommendation and materialisation

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Difficulty, Layout, Template, TemplateCatalog, TemplateCategory};
use crate::config::RecommenderConfig;
use crate::error::{CoreError, Result};
use crate::generator::{generate_site, Customizations, GeneratedSite};
use crate::writer::SiteWriter;

/// Intent keywords mapped to categories, checked in order.
const CATEGORY_KEYWORDS: &[(&[&str], TemplateCategory)] = &[
    (
        &["restaurant", "food", "cafe", "menu", "레스토랑", "식당", "카페", "음식"],
        TemplateCategory::Restaurant,
    ),
    (
        &["portfolio", "showcase", "artist", "designer", "포트폴리오"],
        TemplateCategory::Portfolio,
    ),
    (&["blog", "article", "writing", "journal", "블로그"], TemplateCategory::Blog),
    (
        &["shop", "store", "commerce", "buy", "sell", "쇼핑몰", "스토어", "이커머스"],
        TemplateCategory::Ecommerce,
    ),
    (
        &["business", "company", "corporate", "professional", "회사", "기업", "비즈니스"],
        TemplateCategory::Business,
    ),
    (
        &["landing", "product", "service", "marketing", "랜딩"],
        TemplateCategory::Landing,
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_page: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Intent label or free text used to infer a category.
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TemplateCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_level: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl RecommendationRequest {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub success: bool,
    pub template_id: String,
    pub files_created: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ApplyResult {
    fn failure(template_id: &str, message: &str, error: &CoreError) -> Self {
        Self {
            success: false,
            template_id: template_id.to_string(),
            files_created: Vec::new(),
            preview_url: None,
            message: message.to_string(),
            errors: Some(vec![error.to_string()]),
        }
    }
}

/// Resolve a category from free text; `personal` when nothing matches.
pub fn infer_category(text: &str) -> TemplateCategory {
    let text = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(TemplateCategory::Personal)
}

pub struct TemplateRecommender {
    catalog: TemplateCatalog,
    config: RecommenderConfig,
}

impl TemplateRecommender {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self::with_config(catalog, RecommenderConfig::default())
    }

    pub fn with_config(catalog: TemplateCatalog, config: RecommenderConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Ranked templates for `request`. Errors fall back to the most popular templates overall.
    pub fn recommend(&self, request: &RecommendationRequest) -> Vec<Template> {
        match self.try_recommend(request) {
            Ok(templates) => {
                debug!(
                    intent = %request.intent,
                    results = templates.len(),
                    "recommended templates"
                );
                templates
            }
            Err(e) => {
                warn!(error = %e, "recommendation failed, using most popular templates");
                self.most_popular()
            }
        }
    }

    pub fn try_recommend(&self, request: &RecommendationRequest) -> Result<Vec<Template>> {
        let category = request
            .category
            .unwrap_or_else(|| infer_category(&request.intent));

        let mut candidates = self.catalog.by_category(category);
        if candidates.is_empty() {
            return Err(CoreError::NoCategoryMatch(category));
        }

        // Exact level match; an empty result is returned as-is.
        if let Some(level) = request.user_level {
            candidates.retain(|t| t.difficulty == level);
        }

        if let Some(requirements) = &request.requirements {
            if let Some(responsive) = requirements.responsive {
                candidates.retain(|t| t.responsive == responsive);
            }
            if let Some(multi_page) = requirements.multi_page {
                candidates.retain(|t| (t.structure.layout == Layout::MultiPage) == multi_page);
            }
        }

        let preferences = request.preferences.clone().unwrap_or_default();
        let mut scored: Vec<(&Template, u32)> = candidates
            .into_iter()
            .map(|t| (t, self.score(t, &preferences)))
            .collect();

        // sort_by is stable: ties keep catalog order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(self.config.max_results)
            .map(|(t, _)| t.clone())
            .collect())
    }

    fn score(&self, template: &Template, preferences: &Preferences) -> u32 {
        let mut score = template.metadata.popularity;

        if let Some(style) = &preferences.style {
            if template.has_tag(style) {
                score = score.saturating_add(self.config.style_bonus);
            }
        }

        if preferences.color_scheme.as_deref() == Some("minimal")
            && template.name.to_lowercase().contains("minimal")
        {
            score = score.saturating_add(self.config.minimal_bonus);
        }

        score
    }

    /// Top templates across the whole catalog by popularity, ignoring all filters.
    pub fn most_popular(&self) -> Vec<Template> {
        let mut templates: Vec<&Template> = self.catalog.iter().collect();
        templates.sort_by(|a, b| b.metadata.popularity.cmp(&a.metadata.popularity));
        templates
            .into_iter()
            .take(self.config.max_results)
            .cloned()
            .collect()
    }

    /// Render a template in memory without writing anything.
    pub fn generate(&self, template_id: &str, customizations: Option<&Customizations>) -> Result<GeneratedSite> {
        let template = self
            .catalog
            .get(template_id)
            .ok_or_else(|| CoreError::TemplateNotFound(template_id.to_string()))?;
        Ok(generate_site(template, customizations))
    }

    /// Write a template's files through `writer`. Failures are reported in the result.
    ///
    /// When a write fails, files this call newly created are removed again.
    /// Files that already existed and were overwritten keep the new contents.
    pub fn apply(
        &self,
        template_id: &str,
        customizations: Option<&Customizations>,
        writer: &dyn SiteWriter,
    ) -> ApplyResult {
        let site = match self.generate(template_id, customizations) {
            Ok(site) => site,
            Err(e) => {
                warn!(template_id, error = %e, "apply rejected");
                return ApplyResult::failure(template_id, "Template not found", &e);
            }
        };

        if writer.root().is_none() {
            let e = CoreError::NoOutputRoot;
            warn!(template_id, error = %e, "apply rejected");
            return ApplyResult::failure(template_id, "No workspace folder available", &e);
        }

        let mut files_created = Vec::with_capacity(site.files.len());
        let mut fresh = Vec::new();
        for file in &site.files {
            let existed = writer.exists(&file.path);
            if let Err(e) = writer.write(&file.path, &file.contents) {
                warn!(template_id, path = %file.path, error = %e, "failed to write template file");
                rollback(writer, &fresh);
                return ApplyResult::failure(template_id, "Failed to apply template", &e);
            }
            if !existed {
                fresh.push(file.path.as_str());
            }
            files_created.push(file.path.clone());
        }

        info!(template_id, files = files_created.len(), "template applied");
        ApplyResult {
            success: true,
            template_id: template_id.to_string(),
            files_created,
            preview_url: Some(self.config.preview_url.clone()),
            message: format!("Template '{template_id}' applied successfully"),
            errors: None,
        }
    }
}

fn rollback(writer: &dyn SiteWriter, paths: &[&str]) {
    for path in paths {
        if let Err(e) = writer.remove(path) {
            warn!(path, error = %e, "failed to remove partially applied file");
        }
    }
}

impl std::fmt::Debug for TemplateRecommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRecommender")
            .field("templates", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FsSiteWriter;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn recommender() -> TemplateRecommender {
        TemplateRecommender::new(TemplateCatalog::builtin())
    }

    fn ids(templates: &[Template]) -> Vec<&str> {
        templates.iter().map(|t| t.id.as_str()).collect()
    }

    fn variant(base: &Template, id: &str, name: &str, popularity: u32) -> Template {
        let mut t = base.clone();
        t.id = id.to_string();
        t.name = name.to_string();
        t.metadata.popularity = popularity;
        t
    }

    struct FailingWriter;

    impl SiteWriter for FailingWriter {
        fn root(&self) -> Option<&Path> {
            Some(Path::new("/readonly"))
        }

        fn write(&self, _relative: &str, _contents: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied").into())
        }

        fn exists(&self, _relative: &str) -> bool {
            false
        }

        fn remove(&self, _relative: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Writes to disk but refuses one path.
    struct RefusingWriter {
        inner: FsSiteWriter,
        refused: &'static str,
    }

    impl SiteWriter for RefusingWriter {
        fn root(&self) -> Option<&Path> {
            self.inner.root()
        }

        fn write(&self, relative: &str, contents: &str) -> Result<()> {
            if relative == self.refused {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.write(relative, contents)
        }

        fn exists(&self, relative: &str) -> bool {
            self.inner.exists(relative)
        }

        fn remove(&self, relative: &str) -> Result<()> {
            self.inner.remove(relative)
        }
    }

    #[test]
    fn test_explicit_restaurant_category() {
        let mut request = RecommendationRequest::new("create-website");
        request.category = Some(TemplateCategory::Restaurant);
        assert_eq!(ids(&recommender().recommend(&request)), vec!["restaurant-modern"]);
    }

    #[test]
    fn test_category_inferred_from_intent_text() {
        assert_eq!(infer_category("I want a cafe menu site"), TemplateCategory::Restaurant);
        assert_eq!(infer_category("online STORE"), TemplateCategory::Ecommerce);
        assert_eq!(infer_category("product launch"), TemplateCategory::Landing);
        assert_eq!(infer_category("create-website"), TemplateCategory::Personal);

        let request = RecommendationRequest::new("portfolio for a designer");
        assert_eq!(ids(&recommender().recommend(&request)), vec!["portfolio-minimal"]);
    }

    #[test]
    fn test_every_website_type_entity_has_a_category() {
        let cases = [
            ("음식점", TemplateCategory::Restaurant),
            ("포트폴리오", TemplateCategory::Portfolio),
            ("블로그", TemplateCategory::Blog),
            ("e-commerce", TemplateCategory::Ecommerce),
            ("ecommerce", TemplateCategory::Ecommerce),
            ("이커머스", TemplateCategory::Ecommerce),
            ("온라인 스토어", TemplateCategory::Ecommerce),
            ("비즈니스", TemplateCategory::Business),
            ("랜딩 페이지", TemplateCategory::Landing),
        ];
        for (value, category) in cases {
            assert_eq!(infer_category(value), category, "{value}");
        }
    }

    #[test]
    fn test_empty_category_falls_back_to_most_popular() {
        let request = RecommendationRequest::new("my travel journal");
        let recommender = recommender();
        assert!(matches!(
            recommender.try_recommend(&request),
            Err(CoreError::NoCategoryMatch(TemplateCategory::Blog))
        ));
        assert_eq!(
            ids(&recommender.recommend(&request)),
            vec!["restaurant-modern", "portfolio-minimal", "business-corporate"]
        );
    }

    #[test]
    fn test_user_level_filter_is_not_relaxed() {
        let mut request = RecommendationRequest::new("restaurant");
        request.user_level = Some(Difficulty::Advanced);
        assert!(recommender().recommend(&request).is_empty());

        request.user_level = Some(Difficulty::Beginner);
        assert_eq!(ids(&recommender().recommend(&request)), vec!["restaurant-modern"]);
    }

    #[test]
    fn test_requirement_filters() {
        let recommender = recommender();
        let mut request = RecommendationRequest::new("corporate");
        request.requirements = Some(Requirements {
            responsive: Some(true),
            multi_page: Some(true),
        });
        assert_eq!(ids(&recommender.recommend(&request)), vec!["business-corporate"]);

        request.requirements = Some(Requirements {
            responsive: None,
            multi_page: Some(false),
        });
        assert!(recommender.recommend(&request).is_empty());
    }

    #[test]
    fn test_scoring_and_limit() {
        let builtin = TemplateCatalog::builtin();
        let base = builtin.get("portfolio-minimal").unwrap();
        let mut bold = variant(base, "portfolio-bold", "Bold Portfolio", 90);
        bold.tags = vec!["bold".to_string()];
        let catalog = TemplateCatalog::new(vec![
            bold,
            variant(base, "portfolio-minimal", "Minimal Portfolio", 80),
            variant(base, "portfolio-grid", "Grid Portfolio", 85),
            variant(base, "portfolio-dark", "Dark Portfolio", 70),
        ])
        .unwrap();
        let recommender = TemplateRecommender::new(catalog);

        let request = RecommendationRequest::new("portfolio");
        assert_eq!(
            ids(&recommender.recommend(&request)),
            vec!["portfolio-bold", "portfolio-grid", "portfolio-minimal"]
        );

        let mut request = RecommendationRequest::new("portfolio");
        request.preferences = Some(Preferences {
            style: Some("minimal".to_string()),
            color_scheme: Some("minimal".to_string()),
        });
        // minimal 115, grid 105, then bold and dark tie at 90 and catalog order wins
        assert_eq!(
            ids(&recommender.recommend(&request)),
            vec!["portfolio-minimal", "portfolio-grid", "portfolio-bold"]
        );
    }

    #[test]
    fn test_bonus_on_max_popularity_saturates() {
        let builtin = TemplateCatalog::builtin();
        let base = builtin.get("portfolio-minimal").unwrap();
        let catalog = TemplateCatalog::new(vec![
            variant(base, "portfolio-top", "Minimal Top", u32::MAX),
            variant(base, "portfolio-next", "Minimal Next", u32::MAX - 10),
        ])
        .unwrap();
        let recommender = TemplateRecommender::new(catalog);

        let mut request = RecommendationRequest::new("portfolio");
        request.preferences = Some(Preferences {
            style: Some("minimal".to_string()),
            color_scheme: Some("minimal".to_string()),
        });
        assert_eq!(
            ids(&recommender.recommend(&request)),
            vec!["portfolio-top", "portfolio-next"]
        );
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let builtin = TemplateCatalog::builtin();
        let base = builtin.get("restaurant-modern").unwrap();
        let catalog = TemplateCatalog::new(vec![
            variant(base, "restaurant-b", "B", 50),
            variant(base, "restaurant-a", "A", 50),
        ])
        .unwrap();
        let request = RecommendationRequest::new("restaurant");
        assert_eq!(
            ids(&TemplateRecommender::new(catalog).recommend(&request)),
            vec!["restaurant-b", "restaurant-a"]
        );
    }

    #[test]
    fn test_request_from_host_json() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"intent":"create-website","category":"restaurant","userLevel":"beginner","requirements":{"multiPage":false}}"#,
        )
        .unwrap();
        assert_eq!(request.category, Some(TemplateCategory::Restaurant));
        assert_eq!(request.user_level, Some(Difficulty::Beginner));
        assert_eq!(ids(&recommender().recommend(&request)), vec!["restaurant-modern"]);
    }

    #[test]
    fn test_apply_unknown_template() {
        let dir = TempDir::new().unwrap();
        let result = recommender().apply("nonexistent-id", None, &FsSiteWriter::new(dir.path()));

        assert!(!result.success);
        assert!(result.files_created.is_empty());
        assert_eq!(
            result.errors,
            Some(vec!["Template ID 'nonexistent-id' does not exist".to_string()])
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_apply_without_workspace() {
        let result = recommender().apply("restaurant-modern", None, &FsSiteWriter::detached());
        assert!(!result.success);
        assert!(result.files_created.is_empty());
        assert_eq!(result.errors, Some(vec!["no workspace folder is open".to_string()]));
    }

    #[test]
    fn test_apply_reports_write_errors() {
        let result = recommender().apply("restaurant-modern", None, &FailingWriter);
        assert!(!result.success);
        assert!(result.files_created.is_empty());
        assert_eq!(result.errors, Some(vec!["permission denied".to_string()]));
    }

    #[test]
    fn test_failed_apply_removes_new_files() {
        let dir = TempDir::new().unwrap();
        let writer = RefusingWriter {
            inner: FsSiteWriter::new(dir.path()),
            refused: "script.js",
        };
        let result = recommender().apply("restaurant-modern", None, &writer);

        assert!(!result.success);
        assert!(result.files_created.is_empty());
        assert_eq!(result.errors, Some(vec!["disk full".to_string()]));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_apply_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "mine").unwrap();
        let writer = RefusingWriter {
            inner: FsSiteWriter::new(dir.path()),
            refused: "styles.css",
        };
        let result = recommender().apply("restaurant-modern", None, &writer);

        assert!(!result.success);
        assert!(dir.path().join("index.html").exists());
        assert!(!dir.path().join("styles.css").exists());
    }

    #[test]
    fn test_recommend_then_apply() {
        let dir = TempDir::new().unwrap();
        let recommender = recommender();
        let top = recommender.recommend(&RecommendationRequest::new("restaurant"));

        let custom = Customizations {
            hero_title: Some("Seoul Bistro".to_string()),
            ..Customizations::default()
        };
        let result = recommender.apply(&top[0].id, Some(&custom), &FsSiteWriter::new(dir.path()));

        assert!(result.success);
        assert_eq!(result.files_created, vec!["index.html", "styles.css", "script.js"]);
        assert_eq!(result.preview_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(result.errors, None);

        let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("<h1>Seoul Bistro</h1>"));
        assert!(dir.path().join("styles.css").exists());
        assert!(dir.path().join("script.js").exists());
    }

    #[test]
    fn test_apply_result_wire_format() {
        let dir = TempDir::new().unwrap();
        let result = recommender().apply("portfolio-minimal", None, &FsSiteWriter::new(dir.path()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["templateId"], "portfolio-minimal");
        assert_eq!(json["filesCreated"][0], "index.html");
        assert!(json.get("errors").is_none());
    }
}
