//! Core domain types for page assembly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preference name → value mapping consumed by the template renderer.
pub type Preferences = Map<String, Value>;

/// Preference key holding the translated breadcrumb trail.
pub const BREADCRUMB_TRAIL_ARRAY: &str = "breadcrumbTrailArray";

/// Preferences every page starts from before caller overrides.
pub fn default_preferences() -> Preferences {
    let mut prefs = Map::new();
    prefs.insert("localNavigation".into(), Value::Bool(true));
    prefs.insert("auxBox".into(), Value::Bool(false));
    prefs
}

// ---------------------------------------------------------------------------
// Breadcrumbs
// ---------------------------------------------------------------------------

/// A single breadcrumb as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub url: String,
    pub text: String,
}

impl Breadcrumb {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// A breadcrumb in the shape the layout expects (`attributes` + `value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedCrumb {
    pub attributes: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// One entry of a structured local navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub url: String,
    pub text: String,
    /// Nested items rendered as a sub-list.
    #[serde(default, alias = "subItems", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Local navigation is either pre-rendered HTML or a structured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalNavigation {
    Html(String),
    Items(Vec<NavItem>),
}

impl LocalNavigation {
    /// Unset navigation: an empty list or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Html(html) => html.is_empty(),
            Self::Items(items) => items.is_empty(),
        }
    }
}

impl Default for LocalNavigation {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Named fragments handed to the template renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Title,
    Subtitle,
    Content,
    LocalNavigation,
    FocusBox,
    Head,
    JavaScript,
}

impl Section {
    /// Every section, in the order they are assembled.
    pub const ALL: [Section; 7] = [
        Section::Title,
        Section::Subtitle,
        Section::Content,
        Section::LocalNavigation,
        Section::FocusBox,
        Section::Head,
        Section::JavaScript,
    ];

    /// The state key the layout reads this section from.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Title => "Title",
            Section::Subtitle => "Subtitle",
            Section::Content => "Content",
            Section::LocalNavigation => "LocalNavigation",
            Section::FocusBox => "FocusBox",
            Section::Head => "Head",
            Section::JavaScript => "JavaScript",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
