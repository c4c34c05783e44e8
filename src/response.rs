//! Reply composition, personalisation and conversation context updates

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PhraseSelection;
use crate::error::{CoreError, Result};
use crate::types::{
    ColorPreference, ComplexityLevel, ConversationContext, Entity, EntityType, Intent, IntentLabel,
    MAX_PREVIOUS_INTENTS,
};

/// Confidence reported with the apology reply
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

const FALLBACK_MESSAGE: &str = "죄송합니다. 요청을 처리하는 중 문제가 발생했습니다. 다시 한 번 말씀해 주시겠어요?";
const DEFAULT_FOLLOW_UP: &str = "어떤 도움이 필요하신가요?";
const GENERIC_CONTEXT_QUESTION: &str = "다른 도움이 필요하신가요?";

const KNOWN_STYLES: &[&str] = &["modern", "classic", "creative", "minimal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ShowTemplates,
    ApplyTemplate,
    OpenDesignPanel,
    AddSection,
    OpenPreview,
    ShowGuide,
    AdvancedSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub kind: ActionKind,
    pub label: String,
}

impl SuggestedAction {
    fn new(kind: ActionKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
        }
    }
}

/// Reply bundle handed back to the chat view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub message: String,
    pub suggested_actions: Vec<SuggestedAction>,
    pub template_recommendations: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub confidence: f64,
}

impl Response {
    pub fn fallback() -> Self {
        Self {
            message: FALLBACK_MESSAGE.to_string(),
            suggested_actions: Vec::new(),
            template_recommendations: Vec::new(),
            follow_up_questions: vec![DEFAULT_FOLLOW_UP.to_string()],
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Phrase selection
// ---------------------------------------------------------------------------

/// Picks one phrase index out of `len` candidates.
pub trait PhraseSelector: Send + Sync {
    fn select(&self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl PhraseSelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            fastrand::usize(..len)
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSelector;

impl PhraseSelector for FirstSelector {
    fn select(&self, _len: usize) -> usize {
        0
    }
}

// ---------------------------------------------------------------------------
// Static reply tables
// ---------------------------------------------------------------------------

fn phrases(label: IntentLabel) -> &'static [&'static str] {
    match label {
        IntentLabel::CreateWebsite => &[
            "좋아요! 새로운 웹사이트를 함께 만들어 볼까요?",
            "멋진 웹사이트를 만들어 드릴게요. 먼저 어떤 사이트인지 알려주세요.",
            "웹사이트 제작을 시작합니다. 원하시는 스타일이 있나요?",
        ],
        IntentLabel::ApplyTemplate => &[
            "템플릿을 적용해 드릴게요.",
            "선택하신 템플릿으로 사이트를 구성해 볼게요.",
        ],
        IntentLabel::ModifyDesign => &[
            "디자인을 수정해 드릴게요. 어떤 부분을 바꾸고 싶으신가요?",
            "레이아웃과 색상을 원하시는 대로 커스터마이징할 수 있어요.",
        ],
        IntentLabel::AddContent => &[
            "새로운 콘텐츠를 추가해 드릴게요.",
            "어떤 섹션을 추가하고 싶으신가요?",
        ],
        IntentLabel::PreviewSite => &[
            "미리보기를 열어 드릴게요.",
            "현재 사이트가 어떻게 보이는지 확인해 보세요.",
        ],
        IntentLabel::HelpRequest | IntentLabel::Unknown => &[
            "무엇을 도와드릴까요? 웹사이트 만들기, 템플릿 적용, 디자인 수정을 도와드릴 수 있어요.",
            "WindWalker는 대화로 웹사이트를 만드는 도구예요. 만들고 싶은 사이트를 말씀해 주세요.",
        ],
    }
}

fn suggested_actions(label: IntentLabel) -> Vec<SuggestedAction> {
    let action = match label {
        IntentLabel::CreateWebsite => SuggestedAction::new(ActionKind::ShowTemplates, "템플릿 둘러보기"),
        IntentLabel::ApplyTemplate => SuggestedAction::new(ActionKind::ApplyTemplate, "템플릿 적용하기"),
        IntentLabel::ModifyDesign => SuggestedAction::new(ActionKind::OpenDesignPanel, "디자인 편집 열기"),
        IntentLabel::AddContent => SuggestedAction::new(ActionKind::AddSection, "섹션 추가하기"),
        IntentLabel::PreviewSite => SuggestedAction::new(ActionKind::OpenPreview, "미리보기 열기"),
        IntentLabel::HelpRequest => SuggestedAction::new(ActionKind::ShowGuide, "사용 가이드 보기"),
        IntentLabel::Unknown => return Vec::new(),
    };
    vec![action]
}

fn follow_up_questions(label: IntentLabel) -> Vec<String> {
    let questions: &[&str] = match label {
        IntentLabel::CreateWebsite => &[
            "어떤 종류의 웹사이트인가요? (레스토랑, 포트폴리오, 블로그 등)",
            "선호하는 디자인 스타일이 있으신가요?",
        ],
        IntentLabel::ApplyTemplate => &["바로 적용할까요, 먼저 미리보기를 볼까요?", "사이트 이름을 정하셨나요?"],
        IntentLabel::ModifyDesign => &["어떤 색상을 원하시나요?", "글꼴도 함께 바꿀까요?"],
        IntentLabel::AddContent => &["어떤 내용을 넣고 싶으신가요?", "이미지도 함께 추가할까요?"],
        IntentLabel::PreviewSite => &["수정하고 싶은 부분이 보이나요?", "모바일 화면도 확인해 볼까요?"],
        IntentLabel::HelpRequest => &["웹사이트를 새로 만들어 볼까요?", "템플릿 목록을 보여드릴까요?"],
        IntentLabel::Unknown => &[DEFAULT_FOLLOW_UP],
    };
    questions.iter().map(|q| q.to_string()).collect()
}

/// Website type keywords mapped to suggested template ids, checked in order.
const TEMPLATE_BUCKETS: &[(&[&str], &[&str])] = &[
    (
        &["레스토랑", "식당", "카페", "음식", "restaurant", "cafe", "food"],
        &["restaurant-modern", "restaurant-classic"],
    ),
    (&["포트폴리오", "portfolio"], &["portfolio-minimal", "portfolio-creative"]),
    (&["블로그", "blog"], &["blog-personal", "blog-magazine"]),
    (
        &["쇼핑몰", "스토어", "이커머스", "shop", "commerce"],
        &["ecommerce-modern", "ecommerce-boutique"],
    ),
    (
        &["회사", "기업", "비즈니스", "business", "company", "corporate"],
        &["business-corporate", "business-startup"],
    ),
];

fn recommended_template_ids(intent: &Intent) -> Vec<String> {
    let Some(website) = intent.first_entity(EntityType::WebsiteType) else {
        return Vec::new();
    };
    let value = website.value.to_lowercase();
    TEMPLATE_BUCKETS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| value.contains(k)))
        .map(|(_, ids)| ids.iter().map(|id| id.to_string()).collect())
        .unwrap_or_default()
}

/// Plain-language substitutions for beginners
const BEGINNER_REPLACEMENTS: &[(&str, &str)] = &[
    ("커스터마이징", "꾸미기"),
    ("레이아웃", "화면 배치"),
    ("템플릿", "디자인 틀"),
    ("섹션", "영역"),
    ("반응형", "모바일 대응"),
];

const COLOR_BUCKETS: &[(&[&str], ColorPreference)] = &[
    (
        &["red", "빨간", "빨강", "레드", "orange", "주황", "오렌지", "yellow", "노란", "노랑", "옐로우", "pink", "분홍", "핑크"],
        ColorPreference::Bright,
    ),
    (&["black", "검은", "검정", "블랙", "navy", "네이비"], ColorPreference::Dark),
    (
        &["white", "흰", "하얀", "화이트", "gray", "grey", "회색", "그레이"],
        ColorPreference::Neutral,
    ),
];

fn color_bucket(value: &str) -> Option<ColorPreference> {
    let value = value.to_lowercase();
    COLOR_BUCKETS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| value.contains(k)))
        .map(|(_, preference)| *preference)
}

fn context_question(previous: Option<IntentLabel>) -> &'static str {
    match previous {
        Some(IntentLabel::CreateWebsite) => "이전에 만들던 웹사이트 작업을 이어서 할까요?",
        Some(IntentLabel::ApplyTemplate) => "적용한 템플릿이 마음에 드시나요?",
        Some(IntentLabel::ModifyDesign) => "방금 바꾼 디자인이 마음에 드시나요?",
        Some(IntentLabel::AddContent) => "추가한 콘텐츠를 미리보기로 확인해 볼까요?",
        _ => GENERIC_CONTEXT_QUESTION,
    }
}

// ---------------------------------------------------------------------------
// ResponseComposer
// ---------------------------------------------------------------------------

pub struct ResponseComposer {
    selector: Box<dyn PhraseSelector>,
}

impl ResponseComposer {
    pub fn new() -> Self {
        Self::with_selector(Box::new(RandomSelector))
    }

    pub fn with_selector(selector: Box<dyn PhraseSelector>) -> Self {
        Self { selector }
    }

    pub fn from_selection(selection: PhraseSelection) -> Self {
        match selection {
            PhraseSelection::Random => Self::with_selector(Box::new(RandomSelector)),
            PhraseSelection::First => Self::with_selector(Box::new(FirstSelector)),
        }
    }

    /// Build the reply for `intent`. Never fails: errors yield [`Response::fallback`].
    pub fn respond(&self, intent: &Intent, original_message: &str) -> Response {
        match self.try_respond(intent, original_message) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "response generation failed, using fallback");
                Response::fallback()
            }
        }
    }

    pub fn try_respond(&self, intent: &Intent, original_message: &str) -> Result<Response> {
        let candidates = phrases(intent.primary);
        let index = self.selector.select(candidates.len());
        let phrase = candidates.get(index).ok_or(CoreError::PhraseOutOfRange {
            label: intent.primary,
            index,
            len: candidates.len(),
        })?;

        let mut message = phrase.to_string();
        if let Some(website) = intent.first_entity(EntityType::WebsiteType) {
            message.push_str(&format!(" {} 웹사이트에 어울리는 구성을 준비할게요.", website.value));
        }

        debug!(
            primary = %intent.primary,
            message_len = original_message.chars().count(),
            "composed response"
        );

        Ok(Response {
            message,
            suggested_actions: suggested_actions(intent.primary),
            template_recommendations: recommended_template_ids(intent),
            follow_up_questions: follow_up_questions(intent.primary),
            confidence: intent.confidence,
        })
    }

    /// Adapt a reply to the user's complexity level and recent history.
    pub fn personalize(&self, response: Response, context: &ConversationContext) -> Response {
        let mut response = response;

        match context.user_preferences.complexity_level {
            ComplexityLevel::Beginner => {
                for (from, to) in BEGINNER_REPLACEMENTS {
                    response.message = response.message.replace(from, to);
                }
                response.suggested_actions.truncate(2);
            }
            ComplexityLevel::Advanced => {
                response
                    .suggested_actions
                    .push(SuggestedAction::new(ActionKind::AdvancedSettings, "고급 설정 열기"));
            }
            ComplexityLevel::Intermediate => {}
        }

        let previous = context.previous_intents.first().copied();
        response
            .follow_up_questions
            .insert(0, context_question(previous).to_string());

        response
    }

    /// Return `context` advanced by one turn; the input is left untouched.
    pub fn update_context(
        &self,
        context: &ConversationContext,
        intent: &Intent,
        entities: &[Entity],
    ) -> ConversationContext {
        let mut updated = context.clone();

        updated.previous_intents.insert(0, intent.primary);
        updated.previous_intents.truncate(MAX_PREVIOUS_INTENTS);

        for entity in entities {
            match entity.entity_type {
                EntityType::TemplateStyle => {
                    let style = entity.value.to_lowercase();
                    if KNOWN_STYLES.contains(&style.as_str()) {
                        updated.user_preferences.preferred_style = Some(style);
                    }
                }
                EntityType::Color => {
                    if let Some(preference) = color_bucket(&entity.value) {
                        updated.user_preferences.color_preference = Some(preference);
                    }
                }
                EntityType::WebsiteType => {
                    updated.project_type = Some(entity.value.clone());
                }
                EntityType::Feature => {}
            }
        }

        updated
    }
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseComposer").finish_non_exhaustive()
    }
}
