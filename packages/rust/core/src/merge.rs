//! Preference merging.
//!
//! Overrides win key by key. When both sides hold an object under the same
//! key the children are merged; any other value replaces the base outright.

use serde_json::Value;

use pagebuilder_shared::Preferences;

/// Merge `overrides` on top of `defaults`, returning a new map.
pub fn merge(defaults: &Preferences, overrides: &Preferences) -> Preferences {
    let mut effective = defaults.clone();
    merge_into(&mut effective, overrides);
    effective
}

/// Merge `overrides` into `base` in place.
pub fn merge_into(base: &mut Preferences, overrides: &Preferences) {
    for (key, value) in overrides {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) = (base.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_shared::default_preferences;
    use serde_json::json;

    fn prefs(value: Value) -> Preferences {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn override_replaces_scalar() {
        let merged = merge(
            &default_preferences(),
            &prefs(json!({ "localNavigation": false })),
        );
        assert_eq!(
            Value::Object(merged),
            json!({ "localNavigation": false, "auxBox": false })
        );
    }

    #[test]
    fn nested_objects_merge_children() {
        let base = prefs(json!({ "layout": { "columns": 2, "sidebar": "left" }, "auxBox": false }));
        let overrides = prefs(json!({ "layout": { "sidebar": "right", "footer": true } }));

        let merged = merge(&base, &overrides);
        assert_eq!(
            Value::Object(merged),
            json!({
                "layout": { "columns": 2, "sidebar": "right", "footer": true },
                "auxBox": false
            })
        );
    }

    #[test]
    fn non_object_replaces_object() {
        let base = prefs(json!({ "layout": { "columns": 2 } }));
        let overrides = prefs(json!({ "layout": "wide" }));
        assert_eq!(merge(&base, &overrides)["layout"], json!("wide"));
    }

    #[test]
    fn arrays_replace_wholesale() {
        let base = prefs(json!({ "crumbs": [1, 2, 3] }));
        let overrides = prefs(json!({ "crumbs": [9] }));
        assert_eq!(merge(&base, &overrides)["crumbs"], json!([9]));
    }

    #[test]
    fn inputs_are_untouched() {
        let base = default_preferences();
        let overrides = prefs(json!({ "auxBox": true }));
        let _ = merge(&base, &overrides);
        assert_eq!(base, default_preferences());
        assert_eq!(overrides["auxBox"], json!(true));
    }
}
