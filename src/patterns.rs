//! Static pattern tables for intent and entity recognition
//!
//! Table order is significant: the classifier breaks score ties in favour of
//! the label declared first, and entities are reported in table order.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::error::{CoreError, Result};
use crate::types::{EntityType, IntentLabel};

/// Compiled patterns for one intent label
#[derive(Debug, Clone)]
pub struct IntentPatterns {
    pub label: IntentLabel,
    pub patterns: Vec<Regex>,
}

const INTENT_SOURCES: &[(IntentLabel, &[&str])] = &[
    (
        IntentLabel::CreateWebsite,
        &[
            r"웹사이트.*만들",
            r"사이트.*(만들|생성|제작)",
            r"홈페이지.*(만들|제작)",
            r"(create|build|make).*(website|site|homepage)",
            r"새.*(웹사이트|사이트|프로젝트)",
        ],
    ),
    (
        IntentLabel::ApplyTemplate,
        &[
            r"템플릿.*(적용|사용|선택)",
            r"(apply|use|choose).*template",
            r"(템플릿|template).*(보여|추천|show|recommend)",
            r"(이|그|저)\s*(템플릿|디자인)으로",
        ],
    ),
    (
        IntentLabel::ModifyDesign,
        &[
            r"(색|색상|컬러|color).*(바꾸|바꿔|변경|change)",
            r"(디자인|스타일|레이아웃).*(수정|변경|바꾸|바꿔)",
            r"(change|modify|update).*(design|style|layout|color|font)",
            r"(폰트|글꼴|font).*(바꾸|바꿔|변경|크게|작게)",
            r"(더|좀).*(밝게|어둡게|크게|작게|모던하게|심플하게)",
        ],
    ),
    (
        IntentLabel::AddContent,
        &[
            r"(추가|넣어|넣고)",
            r"(섹션|페이지|메뉴|갤러리|연락처).*(추가|만들)",
            r"(add|insert|include).*(section|page|content|gallery|form|image)",
            r"(이미지|사진|텍스트|글).*(넣|올리|추가)",
        ],
    ),
    (
        IntentLabel::PreviewSite,
        &[
            r"(미리\s*보기|프리뷰)",
            r"(preview|show me|look like)",
            r"(어떻게|어떤).*(보이|생겼)",
        ],
    ),
    (
        IntentLabel::HelpRequest,
        &[
            r"(도움|도와|help)",
            r"(어떻게|방법|how).*(해|하나|do|use)",
            r"(뭐|무엇|what).*(할 수|can)",
            r"(모르|헷갈|이해가)",
        ],
    ),
];

const ENTITY_SOURCES: &[(EntityType, &[&str])] = &[
    (
        EntityType::WebsiteType,
        &[
            r"(레스토랑|식당|카페|음식점|restaurant|cafe|food)",
            r"(포트폴리오|portfolio)",
            r"(블로그|blog)",
            r"(쇼핑몰|온라인\s*스토어|이커머스|e-?commerce|shop)",
            r"(회사|기업|비즈니스|business|company|corporate)",
            r"(랜딩\s*페이지|landing)",
        ],
    ),
    (
        EntityType::Color,
        &[
            r"(빨간|빨강|레드|red|파란|파랑|블루|blue|초록|녹색|그린|green|노란|노랑|옐로우|yellow|검은|검정|블랙|black|흰|하얀|화이트|white|회색|그레이|gr[ae]y|보라|퍼플|purple|주황|오렌지|orange|분홍|핑크|pink|네이비|navy)",
            r"#[0-9a-f]{6}\b",
        ],
    ),
    (
        EntityType::TemplateStyle,
        &[r"(모던|modern|클래식|classic|크리에이티브|creative|미니멀|minimal|심플|simple|엘레강트|elegant)"],
    ),
    (
        EntityType::Feature,
        &[r"(연락처|문의|contact|갤러리|gallery|예약|booking|reservation|뉴스레터|newsletter)"],
    ),
];

/// Compile one pattern case-insensitively.
pub fn compile_pattern(table: &str, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| CoreError::InvalidPattern {
            table: table.to_string(),
            pattern: source.to_string(),
            source: e,
        })
}

/// Compile an intent table, preserving label order.
pub fn compile_intent_table(sources: &[(IntentLabel, &[&str])]) -> Result<Vec<IntentPatterns>> {
    sources
        .iter()
        .map(|(label, patterns)| {
            let patterns = patterns
                .iter()
                .map(|p| compile_pattern(label.as_str(), p))
                .collect::<Result<Vec<_>>>()?;
            Ok(IntentPatterns { label: *label, patterns })
        })
        .collect()
}

/// Compile an entity table into a flat list, preserving type then pattern order.
pub fn compile_entity_table(sources: &[(EntityType, &[&str])]) -> Result<Vec<(Regex, EntityType)>> {
    let mut compiled = Vec::new();
    for (entity_type, patterns) in sources {
        for p in patterns.iter() {
            compiled.push((compile_pattern(entity_type.as_str(), p)?, *entity_type));
        }
    }
    Ok(compiled)
}

// Built-in tables are compiled once per process.
pub static INTENT_PATTERNS: LazyLock<Vec<IntentPatterns>> = LazyLock::new(|| {
    compile_intent_table(INTENT_SOURCES).expect("Invalid built-in intent pattern")
});

pub static ENTITY_PATTERNS: LazyLock<Vec<(Regex, EntityType)>> = LazyLock::new(|| {
    compile_entity_table(ENTITY_SOURCES).expect("Invalid built-in entity pattern")
});
