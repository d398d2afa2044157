mod common;

use common::*;
use content_architecture::config::{FlagOrSlug, RewriteConfig, RewriteRules};
use content_architecture::{
    ArchitectureError, ArchitectureManager, ArchitectureSettings, ConfigError, ContentTypeOptions, LifecycleEvent,
};

#[test]
fn forwards_content_type_options_exactly_once() {
    let dir = shop_schema();
    let host = TestHost::new();
    host.manager(shop_settings(&dir))
        .initialize_types_and_taxonomies()
        .unwrap();

    let types = host.recorder.types.lock().unwrap().clone();
    let expected = ContentTypeOptions {
        public: Some(true),
        ..ContentTypeOptions::default()
    };
    assert_eq!(types, vec![("product".to_string(), expected)]);
}

#[test]
fn taxonomy_without_object_types_gets_an_empty_list() {
    let dir = shop_schema();
    let host = TestHost::new();
    host.manager(shop_settings(&dir))
        .initialize_types_and_taxonomies()
        .unwrap();

    let taxonomies = host.recorder.taxonomies.lock().unwrap().clone();
    assert_eq!(taxonomies.len(), 2);
    assert_eq!(taxonomies[0].0, "brand");
    assert_eq!(taxonomies[0].1, vec!["product".to_string()]);
    assert_eq!(taxonomies[0].2.label.as_deref(), Some("Brands"));
    assert_eq!(taxonomies[1].0, "tag");
    assert!(taxonomies[1].1.is_empty());
}

#[test]
fn rich_type_definitions_deserialize_into_typed_options() {
    let dir = shop_schema();
    write(
        dir.path(),
        "post_type/product.json",
        r#"{
            "label": "Products",
            "labels": { "singular_name": "Product" },
            "public": true,
            "show_in_menu": "edit.php",
            "supports": ["title", "editor"],
            "has_archive": "products",
            "rewrite": { "slug": "product", "with_front": false },
            "query_var": false
        }"#,
    );
    let host = TestHost::new();
    host.manager(shop_settings(&dir))
        .initialize_types_and_taxonomies()
        .unwrap();

    let (_, options) = host.recorder.types.lock().unwrap()[0].clone();
    assert_eq!(options.labels.get("singular_name").map(String::as_str), Some("Product"));
    assert_eq!(options.show_in_menu, Some(FlagOrSlug::Slug("edit.php".into())));
    assert_eq!(options.has_archive, Some(FlagOrSlug::Slug("products".into())));
    assert_eq!(options.query_var, Some(FlagOrSlug::Flag(false)));
    assert_eq!(
        options.rewrite,
        Some(RewriteConfig::Rules(RewriteRules {
            slug: Some("product".into()),
            with_front: Some(false),
            hierarchical: None,
        }))
    );
}

#[test]
fn repeated_initialization_forwards_again() {
    let dir = shop_schema();
    let host = TestHost::new();
    let manager = host.manager(shop_settings(&dir));
    manager.initialize_types_and_taxonomies().unwrap();
    manager.initialize_types_and_taxonomies().unwrap();
    assert_eq!(host.recorder.types.lock().unwrap().len(), 2);
    assert_eq!(host.recorder.taxonomies.lock().unwrap().len(), 4);
}

#[test]
fn missing_type_definition_stops_the_pass() {
    let dir = shop_schema();
    std::fs::remove_file(dir.path().join("post_type/product.json")).unwrap();
    let host = TestHost::new();
    let err = host
        .manager(shop_settings(&dir))
        .initialize_types_and_taxonomies()
        .unwrap_err();
    match err {
        ArchitectureError::DefinitionNotFound { kind, key, .. } => {
            assert_eq!(kind, "content type");
            assert_eq!(key, "product");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(host.recorder.taxonomies.lock().unwrap().is_empty());
}

#[test]
fn unknown_option_fields_are_rejected() {
    let dir = shop_schema();
    write(dir.path(), "taxonomy/tag.json", r#"{ "label": "Tags", "colour": "blue" }"#);
    let host = TestHost::new();
    let err = host
        .manager(shop_settings(&dir))
        .initialize_types_and_taxonomies()
        .unwrap_err();
    assert!(matches!(
        err,
        ArchitectureError::Config(ConfigError::InvalidDefinition { kind: "taxonomy", .. })
    ));
}

#[tokio::test]
async fn init_binds_meta_tables_and_context_switch_rebinds() {
    let dir = shop_schema();
    let host = TestHost::new();
    let manager = host.manager(shop_settings(&dir));

    let results = manager.dispatch(LifecycleEvent::Init).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(host.recorder.types.lock().unwrap().len(), 1);
    assert_eq!(
        host.recorder.meta.lock().unwrap().clone(),
        vec![("order_log".to_string(), "wp_shop_order_logmeta".to_string())]
    );

    manager.dispatch(LifecycleEvent::ContextSwitch).await.unwrap();
    assert_eq!(host.recorder.meta.lock().unwrap().len(), 2);
    assert_eq!(host.recorder.types.lock().unwrap().len(), 1);
    assert_eq!(host.reconciler.call_count(), 0);

    let installed = manager.dispatch(LifecycleEvent::Activation).await.unwrap();
    assert_eq!(installed.len(), 3);
}

#[tokio::test]
async fn inert_manager_without_namespace_or_path() {
    let dir = shop_schema();
    for settings in [
        ArchitectureSettings::new(dir.path(), ""),
        ArchitectureSettings::new("", "shop"),
    ] {
        let host = TestHost::new();
        let manager = ArchitectureManager::try_new(settings, host.capabilities()).unwrap();
        assert!(!manager.is_ready());
        assert!(manager.install().await.unwrap().is_empty());
        manager.initialize_types_and_taxonomies().unwrap();
        assert_eq!(manager.bind_meta_tables_on_init(), 0);
        assert!(manager.list_managed_table_names().is_empty());
        assert_eq!(manager.installed_version().await.unwrap(), None);
        assert_eq!(host.reconciler.call_count(), 0);
        assert!(host.options.values.lock().unwrap().is_empty());
        assert!(host.recorder.types.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn bad_manifest_leaves_manager_inert() {
    let dir = shop_schema();
    write(dir.path(), "config.json", r#"{ "custom": ["order-log"] }"#);
    let host = TestHost::new();

    let err = ArchitectureManager::try_new(shop_settings(&dir), host.capabilities())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::ManifestMalformed { .. }));

    let manager = host.manager(shop_settings(&dir));
    assert!(!manager.is_ready());
    assert!(manager.manifest().is_none());
    assert!(manager.install().await.unwrap().is_empty());
    assert_eq!(host.reconciler.call_count(), 0);
}

#[test]
fn missing_manifest_or_bad_namespace_leaves_manager_inert() {
    let empty = tempfile::tempdir().unwrap();
    let host = TestHost::new();
    assert!(matches!(
        ArchitectureManager::try_new(ArchitectureSettings::new(empty.path(), "shop"), host.capabilities()),
        Err(ConfigError::ManifestMissing { .. })
    ));

    let dir = shop_schema();
    let manager = host.manager(ArchitectureSettings::new(dir.path(), "shop-1"));
    assert!(!manager.is_ready());
}
