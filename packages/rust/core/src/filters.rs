//! Named content hooks.
//!
//! Collaborators register transformations against a hook name; applying the
//! hook runs every transformation for that name in registration order.
//! A [`FilterChain`] is owned by a render context, and registrations made
//! during a render are rolled back to a [`Checkpoint`] when it finishes.

/// Hook names used by the assembler and layout.
pub mod hooks {
    /// The rendered breadcrumb trail.
    pub const BREADCRUMB_TRAIL: &str = "breadcrumbTrail";
    /// Messages shown at the bottom of the page.
    pub const MESSAGES: &str = "messages";
    /// Banner region.
    pub const BANNER: &str = "banner";
    /// CMS edit-mode pass over each section; the argument is the section name.
    pub const CMS_CHECK_EDITABLE: &str = "cmsCheckEditable";
}

/// A transformation: current value and optional argument in, new value out.
pub type FilterFn = Box<dyn Fn(String, Option<&str>) -> String + Send + Sync>;

struct Registration {
    hook: String,
    filter: FilterFn,
}

/// Position in a [`FilterChain`] to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Ordered registry of hook transformations.
#[derive(Default)]
pub struct FilterChain {
    registrations: Vec<Registration>,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|r| &r.hook))
            .finish()
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `filter` on `hook`, after any existing registrations.
    pub fn add<F>(&mut self, hook: impl Into<String>, filter: F)
    where
        F: Fn(String, Option<&str>) -> String + Send + Sync + 'static,
    {
        let hook = hook.into();
        tracing::trace!(hook = %hook, "registering filter");
        self.registrations.push(Registration {
            hook,
            filter: Box::new(filter),
        });
    }

    /// Whether anything is registered on `hook`.
    pub fn exists(&self, hook: &str) -> bool {
        self.registrations.iter().any(|r| r.hook == hook)
    }

    /// Run every transformation registered on `hook` over `value`.
    pub fn apply(&self, hook: &str, value: String, arg: Option<&str>) -> String {
        self.registrations
            .iter()
            .filter(|r| r.hook == hook)
            .fold(value, |acc, r| (r.filter)(acc, arg))
    }

    /// Total registrations across all hooks.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.registrations.len())
    }

    /// Drop every registration made after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.registrations.truncate(checkpoint.0);
    }
}
