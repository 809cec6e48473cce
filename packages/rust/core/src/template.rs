//! Template rendering.
//!
//! The assembler hands the final state (sections merged with preferences)
//! and the request's [`FilterChain`] to a [`TemplateRenderer`]. The bundled
//! [`LayoutRenderer`] fills `{{ Name }}` placeholders in an HTML layout.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use pagebuilder_shared::{
    BREADCRUMB_TRAIL_ARRAY, PageBuilderError, Preferences, Result, Section, TranslatedCrumb,
};

use crate::breadcrumbs;
use crate::filters::{FilterChain, hooks};

/// Produces the final page markup.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, state: &Preferences, filters: &FilterChain) -> Result<String>;
}

/// Layout used when no custom layout file is configured.
pub const BUILTIN_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ Title }}</title>
{{ Head }}
</head>
<body>
<div id="banner">{{ banner }}</div>
<nav id="breadcrumbs">{{ breadcrumbTrail }}</nav>
<header>
<h1 id="title">{{ Title }}</h1>
<h2 id="subtitle">{{ Subtitle }}</h2>
</header>
<aside id="local-navigation">{{ LocalNavigation }}</aside>
<main id="content">{{ Content }}</main>
<aside id="focus-box">{{ FocusBox }}</aside>
<div id="messages">{{ messages }}</div>
{{ JavaScript }}
</body>
</html>
"#;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Placeholder substitution over an HTML layout.
///
/// `breadcrumbTrail`, `messages` and `banner` are hook regions: their value
/// comes from applying the matching hook. `LocalNavigation` renders empty
/// when the `localNavigation` preference is `false`. Every other name is
/// looked up in the state; strings are inserted verbatim, missing keys and
/// `null` render empty.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    layout: String,
}

impl Default for LayoutRenderer {
    fn default() -> Self {
        Self::new(BUILTIN_LAYOUT)
    }
}

impl LayoutRenderer {
    pub fn new(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
        }
    }

    /// Load a layout from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let layout = std::fs::read_to_string(path).map_err(|e| PageBuilderError::io(path, e))?;
        if layout.trim().is_empty() {
            return Err(PageBuilderError::template(format!(
                "layout {} is empty",
                path.display()
            )));
        }
        Ok(Self::new(layout))
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }
}

impl TemplateRenderer for LayoutRenderer {
    fn render(&self, state: &Preferences, filters: &FilterChain) -> Result<String> {
        let trail = breadcrumb_trail(state, filters)?;
        let show_navigation = state.get("localNavigation") != Some(&Value::Bool(false));

        let html = PLACEHOLDER_RE.replace_all(&self.layout, |caps: &Captures| {
            let name = &caps[1];
            match name {
                hooks::BREADCRUMB_TRAIL => trail.clone(),
                hooks::MESSAGES | hooks::BANNER => filters.apply(name, String::new(), None),
                _ if name == Section::LocalNavigation.as_str() && !show_navigation => String::new(),
                _ => state.get(name).map(display_value).unwrap_or_default(),
            }
        });

        Ok(html.into_owned())
    }
}

/// Base trail from the translated crumbs, then the trail hook.
fn breadcrumb_trail(state: &Preferences, filters: &FilterChain) -> Result<String> {
    let crumbs: Vec<TranslatedCrumb> = match state.get(BREADCRUMB_TRAIL_ARRAY) {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            PageBuilderError::template(format!("invalid {BREADCRUMB_TRAIL_ARRAY}: {e}"))
        })?,
        None => Vec::new(),
    };
    Ok(filters.apply(
        hooks::BREADCRUMB_TRAIL,
        breadcrumbs::render_trail(&crumbs),
        None,
    ))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
