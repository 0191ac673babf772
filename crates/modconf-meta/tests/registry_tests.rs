//! Integration tests for the in-memory module registry

use modconf_meta::id::{annotation_full_id, resolve_module_id};
use modconf_meta::{ModuleLoader, ModuleRegistry, Registry};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_module("app/views/chart", json!({"kind": "chart"}));
    registry.register_module("app/theme/dark", json!({"background": "black"}));
    registry.register_alias("chart", "app/views/chart");
    registry.register_alias("dark", "app/theme/dark");
    registry
}

#[test]
fn test_alias_lookup_then_relative_fallback() {
    let registry = sample_registry();

    // Known alias wins
    assert_eq!(
        registry.resolve_alias("chart"),
        Some("app/views/chart".to_string())
    );

    // Unknown ids fall through to relative resolution
    assert_eq!(registry.resolve_alias("./table"), None);
    assert_eq!(
        registry
            .resolve_relative("./table", Some("app/views/chart"))
            .unwrap(),
        "app/views/table"
    );
}

#[test]
fn test_annotation_ids_resolve_relative_to_context() {
    let full = annotation_full_id("./Style");
    let id = resolve_module_id(&full, Some("app/views/chart")).unwrap();
    assert_eq!(id, "app/views/StyleAnnotation");
}

#[tokio::test]
async fn test_loader_and_handle_agree() {
    let registry = sample_registry();

    let via_handle = registry
        .get("app/theme/dark")
        .unwrap()
        .load()
        .await
        .unwrap();
    let via_loader = registry.load_by_id("app/theme/dark").await.unwrap();

    assert_eq!(via_handle, via_loader);
    assert_eq!(via_loader["background"], "black");
}

#[test]
fn test_list_modules_sorted() {
    let registry = sample_registry();
    assert_eq!(
        registry.list_modules(),
        vec!["app/theme/dark", "app/views/chart"]
    );
    assert_eq!(registry.len(), 2);
}
