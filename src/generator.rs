//! Static site generation from a template and optional customizations

use serde::{Deserialize, Serialize};

use crate::catalog::{Section, SectionKind, Template};

pub const HTML_FILE: &str = "index.html";
pub const CSS_FILE: &str = "styles.css";
pub const JS_FILE: &str = "script.js";

/// Caller overrides for generated text; unset fields use template defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customizations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

/// The three files of a materialised template, in write order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSite {
    pub template_id: String,
    pub files: Vec<GeneratedFile>,
}

impl GeneratedSite {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

pub fn generate_site(template: &Template, customizations: Option<&Customizations>) -> GeneratedSite {
    let defaults = Customizations::default();
    let custom = customizations.unwrap_or(&defaults);

    let files = vec![
        GeneratedFile {
            path: HTML_FILE.to_string(),
            contents: generate_html(template, custom),
        },
        GeneratedFile {
            path: CSS_FILE.to_string(),
            contents: generate_css(template),
        },
        GeneratedFile {
            path: JS_FILE.to_string(),
            contents: generate_js(template),
        },
    ];

    GeneratedSite {
        template_id: template.id.clone(),
        files,
    }
}

/// Replace every `{{key}}` in `template` with its value in one pass.
///
/// Inserted values are never scanned again, so braces in customer text stay
/// literal. Unknown keys are left as written.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after
            .find("}}")
            .and_then(|end| vars.iter().find(|(key, _)| *key == &after[..end]).map(|(_, v)| (end, *v)));

        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

const HTML_SHELL: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{{description}}">
    <title>{{title}}</title>
    <link rel="stylesheet" href="styles.css">
</head>
<body data-template="{{template_id}}">
{{sections}}
    <script src="script.js"></script>
</body>
</html>
"#;

pub fn generate_html(template: &Template, custom: &Customizations) -> String {
    let site_name = escape_html(custom.site_name.as_deref().unwrap_or(&template.name));
    let title = custom
        .title
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| site_name.clone());
    let description = escape_html(custom.description.as_deref().unwrap_or(&template.description));

    let sections: Vec<String> = template
        .structure
        .sections
        .iter()
        .map(|section| match section.kind {
            SectionKind::Header => header_html(template, &site_name),
            SectionKind::Hero => hero_html(template, section, custom),
            SectionKind::Content => content_html(section, &description),
            SectionKind::Gallery => gallery_html(section),
            SectionKind::Contact => contact_html(section),
            SectionKind::Footer => footer_html(&site_name),
            SectionKind::Other => format!("    <!-- {} section -->", escape_html(&section.name)),
        })
        .collect();

    let body = sections.join("\n");
    let template_id = escape_html(&template.id);
    substitute(
        HTML_SHELL,
        &[
            ("title", title.as_str()),
            ("description", description.as_str()),
            ("template_id", template_id.as_str()),
            ("sections", body.as_str()),
        ],
    )
}

fn header_html(template: &Template, site_name: &str) -> String {
    let links: Vec<String> = template
        .structure
        .sections
        .iter()
        .filter(|s| !matches!(s.kind, SectionKind::Header | SectionKind::Hero | SectionKind::Footer))
        .map(|s| {
            format!(
                r##"                <li><a href="#{}">{}</a></li>"##,
                escape_html(&s.id),
                escape_html(&s.name)
            )
        })
        .collect();

    format!(
        r##"    <header class="site-header">
        <nav class="nav container">
            <a class="logo" href="#">{site_name}</a>
            <ul class="nav-links">
{links}
            </ul>
        </nav>
    </header>"##,
        links = links.join("\n"),
    )
}

fn hero_html(template: &Template, section: &Section, custom: &Customizations) -> String {
    let heading = custom
        .hero_title
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| format!("Welcome to {}", escape_html(&template.name)));
    let subtitle = escape_html(custom.hero_subtitle.as_deref().unwrap_or(&template.description));

    format!(
        r##"    <section id="{id}" class="hero">
        <div class="container">
            <h1>{heading}</h1>
            <p>{subtitle}</p>
            <a class="btn" href="#contact">Get Started</a>
        </div>
    </section>"##,
        id = escape_html(&section.id),
    )
}

fn content_html(section: &Section, description: &str) -> String {
    format!(
        r#"    <section id="{id}" class="content fade-in">
        <div class="container">
            <h2>{name}</h2>
            <p>{description}</p>
        </div>
    </section>"#,
        id = escape_html(&section.id),
        name = escape_html(&section.name),
    )
}

fn gallery_html(section: &Section) -> String {
    let items: Vec<String> = (1..=6)
        .map(|n| format!(r#"                <div class="gallery-item">Item {n}</div>"#))
        .collect();

    format!(
        r#"    <section id="{id}" class="gallery fade-in">
        <div class="container">
            <h2>{name}</h2>
            <div class="gallery-grid">
{items}
            </div>
        </div>
    </section>"#,
        id = escape_html(&section.id),
        name = escape_html(&section.name),
        items = items.join("\n"),
    )
}

fn contact_html(section: &Section) -> String {
    format!(
        r#"    <section id="{id}" class="contact fade-in">
        <div class="container">
            <h2>{name}</h2>
            <form class="contact-form" id="contact-form">
                <input type="text" name="name" placeholder="Name" required>
                <input type="email" name="email" placeholder="Email" required>
                <textarea name="message" placeholder="Message" required></textarea>
                <button type="submit" class="btn">Send</button>
            </form>
        </div>
    </section>"#,
        id = escape_html(&section.id),
        name = escape_html(&section.name),
    )
}

fn footer_html(site_name: &str) -> String {
    format!(
        r#"    <footer class="site-footer">
        <div class="container">
            <p>&copy; {site_name}. All rights reserved.</p>
        </div>
    </footer>"#
    )
}

// ---------------------------------------------------------------------------
// CSS
// ---------------------------------------------------------------------------

const CSS_TEMPLATE: &str = r#"/* {{template_name}} ({{template_id}}) */
:root {
    --color-primary: {{primary}};
    --color-secondary: {{secondary}};
    --color-accent: {{accent}};
    --color-background: {{background}};
    --color-text: {{text}};
    --font-heading: {{heading_font}};
    --font-body: {{body_font}};
    --font-size-base: {{base_size}};
    --space-sm: {{space_small}};
    --space-md: {{space_medium}};
    --space-lg: {{space_large}};
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: var(--font-body);
    font-size: var(--font-size-base);
    color: var(--color-text);
    background: var(--color-background);
    line-height: 1.6;
}

h1, h2, h3 {
    font-family: var(--font-heading);
    color: var(--color-primary);
    margin-bottom: var(--space-md);
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 0 var(--space-md);
}

.site-header {
    position: sticky;
    top: 0;
    background: var(--color-background);
    box-shadow: 0 1px 4px rgba(0, 0, 0, 0.08);
    z-index: 10;
}

.nav {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: var(--space-md);
}

.nav-links {
    display: flex;
    gap: var(--space-lg);
    list-style: none;
}

.nav-links a, .logo {
    color: var(--color-secondary);
    text-decoration: none;
}

.hero {
    padding: calc(var(--space-lg) * 3) 0;
    text-align: center;
}

.btn {
    display: inline-block;
    padding: var(--space-sm) var(--space-lg);
    background: var(--color-accent);
    color: #fff;
    border: none;
    border-radius: 4px;
    text-decoration: none;
    cursor: pointer;
}

section {
    padding: calc(var(--space-lg) * 2) 0;
}

.gallery-grid {
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: var(--space-md);
}

.gallery-item {
    aspect-ratio: 4 / 3;
    background: var(--color-secondary);
    color: #fff;
    display: flex;
    align-items: center;
    justify-content: center;
}

.contact-form {
    display: grid;
    gap: var(--space-md);
    max-width: 600px;
}

.contact-form input, .contact-form textarea {
    padding: var(--space-sm);
    border: 1px solid var(--color-secondary);
    border-radius: 4px;
    font: inherit;
}

.site-footer {
    padding: var(--space-lg) 0;
    text-align: center;
    color: var(--color-secondary);
}

.fade-in {
    opacity: 0;
    transform: translateY(20px);
    transition: opacity 0.6s ease, transform 0.6s ease;
}

.fade-in.visible {
    opacity: 1;
    transform: none;
}

@media (max-width: 768px) {
    .nav {
        flex-direction: column;
        gap: var(--space-sm);
    }

    .nav-links {
        gap: var(--space-md);
    }

    .gallery-grid {
        grid-template-columns: repeat(2, 1fr);
    }
}

@media (max-width: 480px) {
    .gallery-grid {
        grid-template-columns: 1fr;
    }
}
"#;

pub fn generate_css(template: &Template) -> String {
    let styles = &template.default_styles;
    substitute(
        CSS_TEMPLATE,
        &[
            ("template_name", template.name.as_str()),
            ("template_id", template.id.as_str()),
            ("primary", styles.colors.primary.as_str()),
            ("secondary", styles.colors.secondary.as_str()),
            ("accent", styles.colors.accent.as_str()),
            ("background", styles.colors.background.as_str()),
            ("text", styles.colors.text.as_str()),
            ("heading_font", styles.typography.heading_font.as_str()),
            ("body_font", styles.typography.body_font.as_str()),
            ("base_size", styles.typography.base_size.as_str()),
            ("space_small", styles.spacing.small.as_str()),
            ("space_medium", styles.spacing.medium.as_str()),
            ("space_large", styles.spacing.large.as_str()),
        ],
    )
}

// ---------------------------------------------------------------------------
// JS
// ---------------------------------------------------------------------------

const JS_TEMPLATE: &str = r##"// {{template_name}} ({{template_id}})
// Generated by WindWalker

document.addEventListener('DOMContentLoaded', () => {
    initContactForm();
    initSmoothScroll();
    initFadeIn();
});

function initContactForm() {
    const form = document.getElementById('contact-form');
    if (!form) return;

    form.addEventListener('submit', (event) => {
        event.preventDefault();
        const data = new FormData(form);
        const name = String(data.get('name') || '').trim();
        const email = String(data.get('email') || '').trim();
        const message = String(data.get('message') || '').trim();

        if (!name || !email || !message) {
            alert('모든 항목을 입력해 주세요.');
            return;
        }
        if (!/^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(email)) {
            alert('올바른 이메일 주소를 입력해 주세요.');
            return;
        }

        alert('메시지가 전송되었습니다. 감사합니다!');
        form.reset();
    });
}

function initSmoothScroll() {
    document.querySelectorAll('a[href^="#"]').forEach((link) => {
        link.addEventListener('click', (event) => {
            const id = link.getAttribute('href');
            if (!id || id === '#') return;
            const target = document.querySelector(id);
            if (!target) return;
            event.preventDefault();
            target.scrollIntoView({ behavior: 'smooth', block: 'start' });
        });
    });
}

function initFadeIn() {
    const elements = document.querySelectorAll('.fade-in');
    if (!('IntersectionObserver' in window)) {
        elements.forEach((el) => el.classList.add('visible'));
        return;
    }

    const observer = new IntersectionObserver((entries) => {
        entries.forEach((entry) => {
            if (entry.isIntersecting) {
                entry.target.classList.add('visible');
                observer.unobserve(entry.target);
            }
        });
    }, { threshold: 0.1 });

    elements.forEach((el) => observer.observe(el));
}
"##;

pub fn generate_js(template: &Template) -> String {
    substitute(
        JS_TEMPLATE,
        &[("template_name", template.name.as_str()), ("template_id", template.id.as_str())],
    )
}
