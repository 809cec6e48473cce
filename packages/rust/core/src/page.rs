//! The page model: content fragments, breadcrumbs, and per-page preferences.
//!
//! A [`PageModel`] is built once per request, either fluently through the
//! `with_*` setters or from a keyed property map (see
//! [`PageModel::from_properties`]), and is then consumed by the assembler.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use pagebuilder_shared::{
    Breadcrumb, LocalNavigation, PageBuilderError, Preferences, RenderSettings, Result,
    UnknownKeyPolicy, default_preferences,
};

use crate::buffer::OutputBuffer;
use crate::merge;

/// Property key carrying preference overrides inside a property map.
const TEMPLATE_PREFERENCES_KEY: &str = "templatepreferences";

/// How property maps are turned into pages.
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    /// Site-wide preferences layered between the defaults and the page's own.
    pub base_preferences: Preferences,
    /// Handling of keys with no matching page field.
    pub unknown_keys: UnknownKeyPolicy,
}

impl From<&RenderSettings> for PropertyOptions {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            base_preferences: settings.preferences.clone(),
            unknown_keys: settings.unknown_keys,
        }
    }
}

/// Content fragments and configuration for a single page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    title: String,
    subtitle: String,
    content: String,
    focus_box: String,
    stylesheets: String,
    head: String,
    javascripts: String,
    messages: String,
    banners: String,
    local_navigation: LocalNavigation,
    bread_crumbs: Vec<Breadcrumb>,
    bread_crumb_additions: Vec<Breadcrumb>,
    template_preferences: Preferences,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            focus_box: String::new(),
            stylesheets: String::new(),
            head: String::new(),
            javascripts: String::new(),
            messages: String::new(),
            banners: String::new(),
            local_navigation: LocalNavigation::default(),
            bread_crumbs: Vec::new(),
            bread_crumb_additions: Vec::new(),
            template_preferences: default_preferences(),
        }
    }
}

impl PageModel {
    /// An empty page with default preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a page from a keyed property map.
    ///
    /// Keys are matched case-insensitively against the page fields
    /// (`subTitle` sets the subtitle). A `templatePreferences` entry is merged
    /// under `overrides`, and the result merged over the default and site
    /// preferences. Keys with no matching field follow the options' policy.
    pub fn from_properties(
        properties: &Map<String, Value>,
        overrides: &Preferences,
        options: &PropertyOptions,
    ) -> Result<Self> {
        let mut page = Self::new().with_preferences(&options.base_preferences);

        let mut preferences = Preferences::new();
        for (key, value) in properties {
            if key.eq_ignore_ascii_case(TEMPLATE_PREFERENCES_KEY) {
                match value {
                    Value::Object(map) => merge::merge_into(&mut preferences, map),
                    other => {
                        return Err(PageBuilderError::validation(format!(
                            "`{key}` must be an object, got {other}"
                        )));
                    }
                }
            }
        }
        merge::merge_into(&mut preferences, overrides);
        page = page.with_preferences(&preferences);

        for (key, value) in properties {
            page = match key.to_ascii_lowercase().as_str() {
                TEMPLATE_PREFERENCES_KEY => page,
                "title" => page.with_title(text(key, value)?),
                "subtitle" => page.with_subtitle(text(key, value)?),
                "content" => page.with_content(text(key, value)?),
                "focusbox" => page.with_focus_box(text(key, value)?),
                "stylesheets" => page.with_stylesheets(text(key, value)?),
                "head" => page.with_head(text(key, value)?),
                "javascripts" => page.with_javascripts(text(key, value)?),
                "messages" => page.with_messages(text(key, value)?),
                "banners" => page.with_banners(text(key, value)?),
                "localnavigation" => page.with_local_navigation(structured(key, value)?),
                "breadcrumbs" => page.with_bread_crumbs(structured(key, value)?),
                "breadcrumbadditions" => page.with_bread_crumb_additions(structured(key, value)?),
                _ => match options.unknown_keys {
                    UnknownKeyPolicy::Ignore => {
                        warn!(key = %key, "ignoring unknown page property");
                        page
                    }
                    UnknownKeyPolicy::Reject => {
                        return Err(PageBuilderError::validation(format!(
                            "unknown page property `{key}`"
                        )));
                    }
                },
            };
        }

        Ok(page)
    }

    // -- setters ------------------------------------------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_focus_box(mut self, focus_box: impl Into<String>) -> Self {
        self.focus_box = focus_box.into();
        self
    }

    pub fn with_stylesheets(mut self, stylesheets: impl Into<String>) -> Self {
        self.stylesheets = stylesheets.into();
        self
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }

    pub fn with_javascripts(mut self, javascripts: impl Into<String>) -> Self {
        self.javascripts = javascripts.into();
        self
    }

    pub fn with_messages(mut self, messages: impl Into<String>) -> Self {
        self.messages = messages.into();
        self
    }

    pub fn with_banners(mut self, banners: impl Into<String>) -> Self {
        self.banners = banners.into();
        self
    }

    pub fn with_local_navigation(mut self, local_navigation: LocalNavigation) -> Self {
        self.local_navigation = local_navigation;
        self
    }

    pub fn with_bread_crumbs(mut self, bread_crumbs: Vec<Breadcrumb>) -> Self {
        self.bread_crumbs = bread_crumbs;
        self
    }

    pub fn with_bread_crumb_additions(mut self, additions: Vec<Breadcrumb>) -> Self {
        self.bread_crumb_additions = additions;
        self
    }

    /// Merge preference overrides over the page's current preferences.
    pub fn with_preferences(mut self, overrides: &Preferences) -> Self {
        merge::merge_into(&mut self.template_preferences, overrides);
        self
    }

    // -- getters ------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Raw page content, without any buffered output.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Page content with any buffered side-channel output placed above it.
    pub fn content_with(&self, buffer: &mut OutputBuffer) -> String {
        buffer.prefix(&self.content)
    }

    pub fn focus_box(&self) -> &str {
        &self.focus_box
    }

    pub fn stylesheets(&self) -> &str {
        &self.stylesheets
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn javascripts(&self) -> &str {
        &self.javascripts
    }

    pub fn messages(&self) -> &str {
        &self.messages
    }

    pub fn banners(&self) -> &str {
        &self.banners
    }

    pub fn local_navigation(&self) -> &LocalNavigation {
        &self.local_navigation
    }

    pub fn bread_crumbs(&self) -> &[Breadcrumb] {
        &self.bread_crumbs
    }

    pub fn bread_crumb_additions(&self) -> &[Breadcrumb] {
        &self.bread_crumb_additions
    }

    /// Effective per-page preferences (defaults merged with overrides).
    pub fn preferences(&self) -> &Preferences {
        &self.template_preferences
    }
}

/// Read a text fragment. Scalars are stringified, `null` is empty.
fn text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        other => Err(PageBuilderError::validation(format!(
            "`{key}` must be a string, got {other}"
        ))),
    }
}

fn structured<T: serde::de::DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| PageBuilderError::validation(format!("invalid `{key}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_shared::NavItem;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn sample_properties() -> Map<String, Value> {
        object(json!({
            "title": "arst",
            "subTitle": "subtitle",
            "focusBox": "<p>FocusBox</p>",
            "stylesheets": "<style>some css here</style>",
            "javascripts": "<script>Some js here</script>",
            "head": "<meta name=\"x\">",
            "messages": "<p>msg</p>",
            "banners": "<div>banner</div>",
            "localNavigation": [{ "text": "testUrl", "url": "someUrl" }],
            "breadCrumbs": [{ "url": "/", "text": "Home" }],
            "breadCrumbAdditions": [{ "url": "some url", "text": "some text" }],
            "content": "<p>some random content</p>",
        }))
    }

    fn build(properties: &Map<String, Value>) -> PageModel {
        PageModel::from_properties(properties, &Preferences::new(), &PropertyOptions::default())
            .expect("build page")
    }

    #[test]
    fn properties_round_trip_through_getters() {
        let page = build(&sample_properties());

        assert_eq!(page.title(), "arst");
        assert_eq!(page.subtitle(), "subtitle");
        assert_eq!(page.focus_box(), "<p>FocusBox</p>");
        assert_eq!(page.stylesheets(), "<style>some css here</style>");
        assert_eq!(page.javascripts(), "<script>Some js here</script>");
        assert_eq!(page.head(), "<meta name=\"x\">");
        assert_eq!(page.messages(), "<p>msg</p>");
        assert_eq!(page.banners(), "<div>banner</div>");
        assert_eq!(page.content(), "<p>some random content</p>");
        assert_eq!(
            page.local_navigation(),
            &LocalNavigation::Items(vec![NavItem {
                url: "someUrl".into(),
                text: "testUrl".into(),
                children: vec![],
            }])
        );
        assert_eq!(page.bread_crumbs(), &[Breadcrumb::new("/", "Home")]);
        assert_eq!(
            page.bread_crumb_additions(),
            &[Breadcrumb::new("some url", "some text")]
        );
    }

    #[test]
    fn unknown_keys_are_ignored_by_default() {
        let mut properties = sample_properties();
        properties.insert("footer".into(), json!("nope"));

        let page = build(&properties);
        assert_eq!(page.title(), "arst");
    }

    #[test]
    fn unknown_keys_rejected_under_strict_policy() {
        let properties = object(json!({ "title": "t", "footer": "nope" }));
        let options = PropertyOptions {
            unknown_keys: UnknownKeyPolicy::Reject,
            ..Default::default()
        };
        let err =
            PageModel::from_properties(&properties, &Preferences::new(), &options).unwrap_err();
        assert!(err.to_string().contains("`footer`"));
    }

    #[test]
    fn default_preferences_apply() {
        let page = build(&sample_properties());
        assert_eq!(page.preferences()["localNavigation"], json!(true));
        assert_eq!(page.preferences()["auxBox"], json!(false));
    }

    #[test]
    fn template_preferences_property_overrides_defaults() {
        let mut properties = sample_properties();
        properties.insert(
            "templatePreferences".into(),
            json!({ "localNavigation": false }),
        );

        let page = build(&properties);
        assert_eq!(
            Value::Object(page.preferences().clone()),
            json!({ "localNavigation": false, "auxBox": false })
        );
    }

    #[test]
    fn explicit_overrides_beat_property_preferences() {
        let properties = object(json!({
            "templatePreferences": { "localNavigation": false, "auxBox": true }
        }));
        let overrides = object(json!({ "auxBox": false, "theme": "dark" }));

        let page =
            PageModel::from_properties(&properties, &overrides, &PropertyOptions::default())
                .unwrap();
        assert_eq!(
            Value::Object(page.preferences().clone()),
            json!({ "localNavigation": false, "auxBox": false, "theme": "dark" })
        );
    }

    #[test]
    fn site_preferences_sit_between_defaults_and_page() {
        let options = PropertyOptions {
            base_preferences: object(json!({ "auxBox": true, "theme": "gold" })),
            ..Default::default()
        };
        let properties = object(json!({ "templatePreferences": { "theme": "black" } }));

        let page =
            PageModel::from_properties(&properties, &Preferences::new(), &options).unwrap();
        assert_eq!(
            Value::Object(page.preferences().clone()),
            json!({ "localNavigation": true, "auxBox": true, "theme": "black" })
        );
    }

    #[test]
    fn template_preferences_must_be_object() {
        let properties = object(json!({ "templatePreferences": "wide" }));
        let options = PropertyOptions::default();
        let result = PageModel::from_properties(&properties, &Preferences::new(), &options);
        assert!(result.is_err());
    }

    #[test]
    fn navigation_may_be_html() {
        let properties = object(json!({ "localNavigation": "<ul><li>x</li></ul>" }));
        let page = build(&properties);
        assert_eq!(
            page.local_navigation(),
            &LocalNavigation::Html("<ul><li>x</li></ul>".into())
        );
    }

    #[test]
    fn malformed_breadcrumbs_are_rejected() {
        let properties = object(json!({ "breadCrumbs": [{ "href": "/" }] }));
        let err = PageModel::from_properties(
            &properties,
            &Preferences::new(),
            &PropertyOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("breadCrumbs"));
    }

    #[test]
    fn fluent_setters_chain() {
        let page = PageModel::new()
            .with_title("Admissions")
            .with_subtitle("Visit")
            .with_bread_crumb_additions(vec![Breadcrumb::new("/visit", "Visit")]);

        assert_eq!(page.title(), "Admissions");
        assert_eq!(page.subtitle(), "Visit");
        assert_eq!(page.bread_crumb_additions().len(), 1);
    }

    #[test]
    fn content_with_buffer_prefixes_output() {
        let page = PageModel::new().with_content("<p>body</p>");
        let mut buffer = OutputBuffer::new(pagebuilder_shared::BufferMode::Server);
        buffer.write("Warning: x ");

        assert_eq!(page.content_with(&mut buffer), "Warning: x <p>body</p>");
        assert_eq!(page.content(), "<p>body</p>");
    }
}
