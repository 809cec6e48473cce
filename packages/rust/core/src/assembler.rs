//! Page assembler.
//!
//! Takes a [`PageModel`] and a per-request [`RenderContext`], resolves
//! navigation and breadcrumbs, registers the page's hook contributions, and
//! hands the merged state to the template renderer.

use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use pagebuilder_shared::{
    BREADCRUMB_TRAIL_ARRAY, PageBuilderError, Preferences, RenderSettings, Result, Section,
};

use crate::breadcrumbs;
use crate::buffer::OutputBuffer;
use crate::capture::CaptureRegistry;
use crate::filters::{FilterChain, hooks};
use crate::merge;
use crate::navigation::{ListNavigationRenderer, NavigationDiscovery, NavigationResolver};
use crate::page::PageModel;
use crate::request::{InitOutcome, NoopInitializer, RequestInfo, RequestInitializer};
use crate::template::{LayoutRenderer, TemplateRenderer};

/// What a render call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The finished page.
    Rendered(String),
    /// Capture mode was on; the page was stored instead of rendered.
    Captured(Box<PageModel>),
    /// The request initializer answered the request itself.
    Intercepted(String),
}

impl RenderOutcome {
    /// Markup to send back, if any.
    pub fn into_html(self) -> Option<String> {
        match self {
            Self::Rendered(html) | Self::Intercepted(html) => Some(html),
            Self::Captured(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Per-request render state.
///
/// Preferences set here before rendering override same-named sections
/// computed from the page. Hook registrations made here persist across
/// renders; registrations made by a render are dropped when it returns.
#[derive(Debug)]
pub struct RenderContext {
    id: Uuid,
    request: RequestInfo,
    preferences: Preferences,
    filters: FilterChain,
    buffer: OutputBuffer,
    capture: CaptureRegistry,
    initialized: bool,
}

impl RenderContext {
    pub fn new(request: RequestInfo) -> Self {
        Self {
            id: Uuid::now_v7(),
            request,
            preferences: Preferences::new(),
            filters: FilterChain::new(),
            buffer: OutputBuffer::inactive(),
            capture: CaptureRegistry::new(),
            initialized: false,
        }
    }

    /// A context with an armed output buffer in the configured mode.
    pub fn from_settings(request: RequestInfo, settings: &RenderSettings) -> Self {
        Self::new(request).with_buffer(OutputBuffer::new(settings.buffer_mode))
    }

    pub fn with_buffer(mut self, buffer: OutputBuffer) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// Set a preference ahead of rendering.
    pub fn set_preference(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.preferences.insert(key.into(), value.into());
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterChain {
        &mut self.filters
    }

    pub fn buffer_mut(&mut self) -> &mut OutputBuffer {
        &mut self.buffer
    }

    pub fn capture(&self) -> &CaptureRegistry {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut CaptureRegistry {
        &mut self.capture
    }
}

// ---------------------------------------------------------------------------
// PageAssembler
// ---------------------------------------------------------------------------

/// Composes pages with a navigation resolver, template renderer, and
/// request initializer.
pub struct PageAssembler {
    navigation: NavigationResolver,
    template: Box<dyn TemplateRenderer>,
    initializer: Box<dyn RequestInitializer>,
}

impl PageAssembler {
    pub fn new(navigation: NavigationResolver, template: Box<dyn TemplateRenderer>) -> Self {
        Self {
            navigation,
            template,
            initializer: Box::new(NoopInitializer),
        }
    }

    /// Assembler with the bundled list navigation and layout renderers.
    pub fn from_settings(settings: &RenderSettings) -> Result<Self> {
        let template = match &settings.layout_path {
            Some(path) => LayoutRenderer::from_file(path)?,
            None => LayoutRenderer::default(),
        };
        let navigation = NavigationResolver::new(
            Box::new(ListNavigationRenderer),
            NavigationDiscovery::from(settings),
        );
        Ok(Self::new(navigation, Box::new(template)))
    }

    pub fn with_initializer(mut self, initializer: Box<dyn RequestInitializer>) -> Self {
        self.initializer = initializer;
        self
    }

    /// Render `page`, or store it if capture mode is on.
    #[instrument(skip_all, fields(request_id = %ctx.id, title = %page.title()))]
    pub fn render(&self, page: PageModel, ctx: &mut RenderContext) -> Result<RenderOutcome> {
        if ctx.capture.is_capturing() {
            info!("capture mode on, storing page");
            ctx.capture.store(page.clone());
            return Ok(RenderOutcome::Captured(Box::new(page)));
        }

        if let InitOutcome::Respond(body) = self.initialize(ctx)? {
            info!(bytes = body.len(), "request answered during initialization");
            return Ok(RenderOutcome::Intercepted(body));
        }

        let checkpoint = ctx.filters.checkpoint();
        let buffered = ctx.buffer.contents().to_string();
        let result = self.assemble(&page, ctx);
        ctx.filters.rollback(checkpoint);
        if result.is_err() {
            ctx.buffer.restore(buffered);
        }

        let html = result?;
        info!(bytes = html.len(), "page rendered");
        Ok(RenderOutcome::Rendered(html))
    }

    /// Run the initializer once per context.
    fn initialize(&self, ctx: &mut RenderContext) -> Result<InitOutcome> {
        if ctx.initialized {
            return Ok(InitOutcome::Continue);
        }
        let outcome = self.initializer.initialize(&ctx.request)?;
        ctx.initialized = true;
        Ok(outcome)
    }

    fn assemble(&self, page: &PageModel, ctx: &mut RenderContext) -> Result<String> {
        let trail = serde_json::to_value(breadcrumbs::translate(page.bread_crumbs()))
            .map_err(|e| PageBuilderError::template(format!("breadcrumb trail: {e}")))?;
        let mut page_preferences = Preferences::new();
        page_preferences.insert(BREADCRUMB_TRAIL_ARRAY.into(), trail);
        merge::merge_into(&mut page_preferences, page.preferences());
        breadcrumbs::append_additions(&mut ctx.filters, page.bread_crumb_additions());

        let pending = merge::merge(&ctx.preferences, &page_preferences);

        append_to_hook(&mut ctx.filters, hooks::MESSAGES, page.messages());
        append_to_hook(&mut ctx.filters, hooks::BANNER, page.banners());

        let mut sections = self.sections(page, ctx)?;

        if ctx.filters.exists(hooks::CMS_CHECK_EDITABLE) {
            debug!("applying CMS edit-mode hook to sections");
            for (section, value) in sections.iter_mut() {
                let current = std::mem::take(value);
                *value = ctx
                    .filters
                    .apply(hooks::CMS_CHECK_EDITABLE, current, Some(section.as_str()));
            }
        }

        let mut state: Preferences = sections
            .into_iter()
            .map(|(section, value)| (section.as_str().to_string(), Value::String(value)))
            .collect();
        merge::merge_into(&mut state, &pending);

        self.template.render(&state, &ctx.filters)
    }

    fn sections(
        &self,
        page: &PageModel,
        ctx: &mut RenderContext,
    ) -> Result<Vec<(Section, String)>> {
        let start = ctx.request.start_dir()?;
        let navigation = self.navigation.resolve(page.local_navigation(), &start)?;

        let content = page.content_with(&mut ctx.buffer);
        let head = format!("{}{}", page.stylesheets(), page.head());

        Ok(vec![
            (Section::Title, page.title().trim().to_string()),
            (Section::Subtitle, page.subtitle().trim().to_string()),
            (Section::Content, content.trim().to_string()),
            (Section::LocalNavigation, navigation.trim().to_string()),
            (Section::FocusBox, page.focus_box().trim().to_string()),
            (Section::Head, head.trim().to_string()),
            (Section::JavaScript, page.javascripts().trim().to_string()),
        ])
    }
}

impl std::fmt::Debug for PageAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageAssembler")
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

/// Append `text` to whatever `hook` produces.
fn append_to_hook(filters: &mut FilterChain, hook: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    let text = text.to_string();
    filters.add(hook, move |content, _| content + &text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
