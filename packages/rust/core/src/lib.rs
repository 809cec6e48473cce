//! Page assembly for PageBuilder.
//!
//! This crate turns a [`PageModel`] into a finished HTML page: preferences are
//! merged, breadcrumbs translated, local navigation resolved, hook
//! contributions registered, and the resulting state handed to a
//! [`TemplateRenderer`].

pub mod assembler;
pub mod breadcrumbs;
pub mod buffer;
pub mod capture;
pub mod filters;
pub mod merge;
pub mod navigation;
pub mod page;
pub mod request;
pub mod template;

pub use assembler::{PageAssembler, RenderContext, RenderOutcome};
pub use capture::{CaptureRegistry, CapturedPage};
pub use filters::FilterChain;
pub use navigation::{NavigationRenderer, NavigationResolver};
pub use page::{PageModel, PropertyOptions};
pub use request::{InitOutcome, RequestInfo, RequestInitializer};
pub use template::{LayoutRenderer, TemplateRenderer};
