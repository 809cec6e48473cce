//! Shared types, error model, and configuration for PageBuilder.
//!
//! This crate is the foundation depended on by all other PageBuilder crates.
//! It provides:
//! - [`PageBuilderError`]: the unified error type
//! - Domain types ([`Breadcrumb`], [`LocalNavigation`], [`Section`], [`Preferences`])
//! - Configuration ([`AppConfig`], [`RenderSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BufferMode, NavigationConfig, OutputConfig, PropertiesConfig, RenderSettings,
    TemplateConfig, UnknownKeyPolicy, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{PageBuilderError, Result};
pub use types::{
    BREADCRUMB_TRAIL_ARRAY, Breadcrumb, LocalNavigation, NavItem, Preferences, Section,
    TranslatedCrumb, default_preferences,
};
