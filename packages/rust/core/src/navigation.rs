//! Local navigation resolution.
//!
//! | navigation value      | result                                        |
//! |-----------------------|-----------------------------------------------|
//! | non-empty item list   | rendered by the [`NavigationRenderer`]        |
//! | empty                 | discovered navigation file, or site fallback  |
//! | non-empty HTML string | returned verbatim                             |

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use pagebuilder_shared::{LocalNavigation, NavItem, PageBuilderError, RenderSettings, Result};

/// Renders a structured navigation list to HTML.
pub trait NavigationRenderer: Send + Sync {
    fn render(&self, items: &[NavItem]) -> Result<String>;
}

/// Renders items as nested `<ul>` lists.
#[derive(Debug, Clone, Default)]
pub struct ListNavigationRenderer;

impl NavigationRenderer for ListNavigationRenderer {
    fn render(&self, items: &[NavItem]) -> Result<String> {
        let mut html = String::from("<ul class=\"local-navigation\">");
        render_items(&mut html, items);
        html.push_str("</ul>");
        Ok(html)
    }
}

fn render_items(html: &mut String, items: &[NavItem]) {
    for item in items {
        html.push_str(&format!("<li><a href=\"{}\">{}</a>", item.url, item.text));
        if !item.children.is_empty() {
            html.push_str("<ul>");
            render_items(html, &item.children);
            html.push_str("</ul>");
        }
        html.push_str("</li>");
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Upward search for a navigation file with a site-wide fallback.
#[derive(Debug, Clone)]
pub struct NavigationDiscovery {
    /// File name searched for in each directory.
    pub file_name: String,
    /// Used when no directory in range contains `file_name`.
    pub fallback: PathBuf,
    /// Parent directories searched above the start directory.
    pub max_levels: usize,
}

impl From<&RenderSettings> for NavigationDiscovery {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            file_name: settings.nav_file_name.clone(),
            fallback: settings.nav_fallback.clone(),
            max_levels: settings.nav_max_levels,
        }
    }
}

impl NavigationDiscovery {
    /// Locate the navigation file for `start`.
    ///
    /// Checks `start` and then up to `max_levels` of its ancestors; returns
    /// the fallback path when none of them holds the file.
    #[instrument(skip_all, fields(start = %start.display(), max_levels = self.max_levels))]
    pub fn find(&self, start: &Path) -> PathBuf {
        for dir in start.ancestors().take(self.max_levels + 1) {
            let candidate = dir.join(&self.file_name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found local navigation file");
                return candidate;
            }
        }
        debug!(
            start = %start.display(),
            fallback = %self.fallback.display(),
            "no local navigation file in range, using fallback"
        );
        self.fallback.clone()
    }

    /// Find and read the navigation fragment for `start`.
    #[instrument(skip_all, fields(file_name = %self.file_name))]
    pub fn load(&self, start: &Path) -> Result<String> {
        let path = self.find(start);
        std::fs::read_to_string(&path).map_err(|e| PageBuilderError::io(&path, e))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns a page's navigation value into HTML.
pub struct NavigationResolver {
    renderer: Box<dyn NavigationRenderer>,
    discovery: NavigationDiscovery,
}

impl NavigationResolver {
    pub fn new(renderer: Box<dyn NavigationRenderer>, discovery: NavigationDiscovery) -> Self {
        Self {
            renderer,
            discovery,
        }
    }

    pub fn discovery(&self) -> &NavigationDiscovery {
        &self.discovery
    }

    /// Resolve `navigation` to HTML. `start` anchors auto-discovery.
    #[instrument(skip_all, fields(start = %start.display()))]
    pub fn resolve(&self, navigation: &LocalNavigation, start: &Path) -> Result<String> {
        if navigation.is_empty() {
            return self.discovery.load(start);
        }
        match navigation {
            LocalNavigation::Items(items) => {
                debug!(items = items.len(), "rendering structured navigation");
                self.renderer.render(items)
            }
            LocalNavigation::Html(html) => Ok(html.clone()),
        }
    }
}

impl std::fmt::Debug for NavigationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("discovery", &self.discovery)
            .finish_non_exhaustive()
    }
}
