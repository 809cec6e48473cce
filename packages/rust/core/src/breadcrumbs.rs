//! Breadcrumb translation.
//!
//! Caller crumbs are `{url, text}` pairs. The layout consumes them as
//! `{attributes, value}` pairs, and additional crumbs are contributed to the
//! `breadcrumbTrail` hook so other collaborators can extend the same trail.
//!
//! Every rendered crumb is followed by [`CRUMB_SEPARATOR`].

use pagebuilder_shared::{Breadcrumb, TranslatedCrumb};

use crate::filters::{FilterChain, hooks};

/// Separator written after each crumb.
pub const CRUMB_SEPARATOR: &str = " / ";

/// Map crumbs into the layout's attribute/value shape, preserving order.
pub fn translate(crumbs: &[Breadcrumb]) -> Vec<TranslatedCrumb> {
    crumbs
        .iter()
        .map(|crumb| TranslatedCrumb {
            attributes: format!("href=\"{}\"", crumb.url),
            value: crumb.text.clone(),
        })
        .collect()
}

/// Render additional crumbs as anchors, each followed by the separator.
pub fn build_additions(additions: &[Breadcrumb]) -> String {
    additions
        .iter()
        .map(|crumb| format!("<a href=\"{}\">{}</a>{CRUMB_SEPARATOR}", crumb.url, crumb.text))
        .collect()
}

/// Render a translated trail the same way additions are rendered.
pub fn render_trail(trail: &[TranslatedCrumb]) -> String {
    trail
        .iter()
        .map(|crumb| format!("<a {}>{}</a>{CRUMB_SEPARATOR}", crumb.attributes, crumb.value))
        .collect()
}

/// Contribute `additions` to the end of the breadcrumb trail.
pub fn append_additions(filters: &mut FilterChain, additions: &[Breadcrumb]) {
    if additions.is_empty() {
        return;
    }
    let built = build_additions(additions);
    filters.add(hooks::BREADCRUMB_TRAIL, move |trail, _| trail + &built);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_preserves_order_and_mapping() {
        let crumbs = vec![Breadcrumb::new("u1", "t1"), Breadcrumb::new("u2", "t2")];
        let translated = translate(&crumbs);

        assert_eq!(
            translated,
            vec![
                TranslatedCrumb {
                    attributes: "href=\"u1\"".into(),
                    value: "t1".into(),
                },
                TranslatedCrumb {
                    attributes: "href=\"u2\"".into(),
                    value: "t2".into(),
                },
            ]
        );
    }

    #[test]
    fn build_single_addition() {
        let additions = vec![Breadcrumb::new("some url", "some text")];
        assert_eq!(
            build_additions(&additions),
            "<a href=\"some url\">some text</a> / "
        );
    }

    #[test]
    fn build_no_additions_is_empty() {
        assert_eq!(build_additions(&[]), "");
    }

    #[test]
    fn render_trail_matches_addition_format() {
        let crumbs = vec![Breadcrumb::new("/", "Home"), Breadcrumb::new("/about", "About")];
        assert_eq!(
            render_trail(&translate(&crumbs)),
            "<a href=\"/\">Home</a> / <a href=\"/about\">About</a> / "
        );
    }

    #[test]
    fn additions_contribute_to_trail_hook() {
        let mut filters = FilterChain::new();
        append_additions(&mut filters, &[Breadcrumb::new("/x", "X")]);

        let home = "<a href=\"/\">Home</a> / ".to_string();
        let trail = filters.apply(hooks::BREADCRUMB_TRAIL, home, None);
        assert_eq!(trail, "<a href=\"/\">Home</a> / <a href=\"/x\">X</a> / ");
    }

    #[test]
    fn empty_additions_register_nothing() {
        let mut filters = FilterChain::new();
        append_additions(&mut filters, &[]);
        assert!(!filters.exists(hooks::BREADCRUMB_TRAIL));
    }
}
