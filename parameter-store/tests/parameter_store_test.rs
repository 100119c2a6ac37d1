use std::{env, sync::Arc};

use serde_json::json;
use serial_test::serial;
use ssm_parameter_store::{
    FlatMapping, ParameterRecord, ParameterStore, ParameterStoreError, RetrievalOptions,
    configs::StoreConfig,
    remote::adapters::InMemoryParameterClient,
};

fn fixture() -> InMemoryParameterClient {
    let mut records = vec![
        ParameterRecord::secret("key", "hello"),
        ParameterRecord::new("second-key", "world"),
        ParameterRecord::secret("/path/to/third-key", "danger"),
        ParameterRecord::secret("/path/to/fourth-key", "will"),
        ParameterRecord::new("/path/to/another/key/fifth-key", "robinson"),
    ];
    // more than one page of 10
    records.extend((0..20).map(|n| ParameterRecord::secret(format!("/test/path/{n}"), n.to_string())));

    InMemoryParameterClient::with_records(records)
}

fn store_over(client: &InMemoryParameterClient) -> ParameterStore {
    ParameterStore::new(Arc::new(client.clone()))
}

fn parameter_store() -> ParameterStore {
    store_over(&fixture())
}

fn keys(mapping: &FlatMapping) -> Vec<&str> {
    mapping.keys().map(String::as_str).collect()
}

#[tokio::test]
async fn test_get_parameter() {
    let parameters = parameter_store()
        .get_parameter("key", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters.get("key").map(String::as_str), Some("hello"));
}

#[tokio::test]
async fn test_get_parameter_not_found() {
    let result = parameter_store()
        .get_parameter("missing", RetrievalOptions::default())
        .await;

    assert_eq!(
        result,
        Err(ParameterStoreError::NotFound("missing".to_string()))
    );
}

#[tokio::test]
async fn test_stripping_path_in_parameter() {
    let store = parameter_store();

    let full = store
        .get_parameter("/path/to/third-key", RetrievalOptions::default().strip_path(false))
        .await
        .unwrap();
    assert_eq!(keys(&full), vec!["/path/to/third-key"]);

    let stripped = store
        .get_parameter("/path/to/third-key", RetrievalOptions::default())
        .await
        .unwrap();
    assert_eq!(stripped.get("third-key").map(String::as_str), Some("danger"));

    let plain = store
        .get_parameter("key", RetrievalOptions::default())
        .await
        .unwrap();
    assert_eq!(keys(&plain), vec!["key"]);
}

#[tokio::test]
async fn test_get_parameters() {
    let parameters = parameter_store()
        .get_parameters(&["key", "second-key"], RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters.get("key").map(String::as_str), Some("hello"));
    assert_eq!(parameters.get("second-key").map(String::as_str), Some("world"));
}

#[tokio::test]
async fn test_get_parameters_omits_unknown_names() {
    let parameters = parameter_store()
        .get_parameters(&["key", "does-not-exist"], RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(keys(&parameters), vec!["key"]);
}

#[tokio::test]
async fn test_get_parameters_across_pages() {
    let client = fixture().with_page_size(3);
    let names: Vec<String> = (0..20).map(|n| format!("/test/path/{n}")).collect();

    let parameters = store_over(&client)
        .get_parameters(&names, RetrievalOptions::default().strip_path(false))
        .await
        .unwrap();

    assert_eq!(parameters.len(), 20);
    assert_eq!(client.request_count(), 7);
}

#[tokio::test]
async fn test_get_paginated_parameters() {
    let client = fixture();

    let parameters = store_over(&client)
        .get_parameters_by_path("/test/path/", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(parameters.len(), 20);
    assert_eq!(client.request_count(), 2);
    assert_eq!(parameters.get("19").map(String::as_str), Some("19"));
}

#[tokio::test]
async fn test_pagination_completeness_for_any_page_size() {
    for page_size in [1, 2, 7, 10, 19, 20, 50] {
        let client = fixture().with_page_size(page_size);

        let parameters = store_over(&client)
            .get_parameters_by_path("/test/path", RetrievalOptions::default())
            .await
            .unwrap();

        assert_eq!(parameters.len(), 20, "page size {page_size}");
        assert_eq!(client.request_count(), 20usize.div_ceil(page_size).max(1));
    }
}

#[tokio::test]
async fn test_page_guard_stops_long_listings() {
    let client = fixture().with_page_size(1);
    let store = ParameterStore::with_config(
        Arc::new(client),
        StoreConfig {
            max_pages: 5,
            ..StoreConfig::default()
        },
    );

    let result = store
        .get_parameters_by_path("/test/path", RetrievalOptions::default())
        .await;

    assert!(matches!(result, Err(ParameterStoreError::RemoteFetch(_))));
}

#[tokio::test]
async fn test_get_parameters_by_path() {
    let parameters = parameter_store()
        .get_parameters_by_path("/path/to/another/key/", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(keys(&parameters), vec!["fifth-key"]);
}

#[tokio::test]
async fn test_get_parameters_by_path_with_recursion() {
    let parameters = parameter_store()
        .get_parameters_by_path("/path/to/", RetrievalOptions::default().recursive(true))
        .await
        .unwrap();

    assert_eq!(keys(&parameters), vec!["fifth-key", "fourth-key", "third-key"]);
}

#[tokio::test]
async fn test_get_parameters_by_path_without_recursion() {
    let parameters = parameter_store()
        .get_parameters_by_path("/path/to/", RetrievalOptions::default().recursive(false))
        .await
        .unwrap();

    assert_eq!(keys(&parameters), vec!["fourth-key", "third-key"]);
}

#[tokio::test]
async fn test_stripped_key_collision_keeps_later_record() {
    let client = InMemoryParameterClient::with_records(vec![
        ParameterRecord::new("/p/x", "1"),
        ParameterRecord::new("/p/y", "2"),
        ParameterRecord::new("/p/q/x", "3"),
    ]);

    let parameters = store_over(&client)
        .get_parameters_by_path("/p", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(keys(&parameters), vec!["x", "y"]);
    assert_eq!(parameters.get("x").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn test_get_parameters_with_hierarchy() {
    let store = parameter_store();
    let expected = json!({
        "third-key": "danger",
        "fourth-key": "will",
        "another": {
            "key": {
                "fifth-key": "robinson",
            },
        },
    });

    let stripped = store
        .get_parameters_with_hierarchy("/path/to", RetrievalOptions::default())
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(&stripped).unwrap(), expected);

    let full = store
        .get_parameters_with_hierarchy("/path/to", RetrievalOptions::default().strip_path(false))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&full).unwrap(),
        json!({ "path": { "to": expected } })
    );
}

#[tokio::test]
async fn test_hierarchy_ignores_non_recursive_option() {
    let tree = parameter_store()
        .get_parameters_with_hierarchy("/path/to", RetrievalOptions::default().recursive(false))
        .await
        .unwrap();

    assert!(tree.get("another").and_then(|n| n.as_branch()).is_some());
}

#[tokio::test]
async fn test_get_parameters_with_hierarchy_for_path_with_no_nesting() {
    let tree = parameter_store()
        .get_parameters_with_hierarchy("/path/to/another/key/", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(
        tree.get("fifth-key").and_then(|n| n.as_leaf()),
        Some("robinson")
    );
}

#[tokio::test]
async fn test_get_parameters_with_hierarchy_for_nonexistent_path() {
    let tree = parameter_store()
        .get_parameters_with_hierarchy("/does/not/exist", RetrievalOptions::default())
        .await
        .unwrap();

    assert!(tree.is_empty());
}

#[tokio::test]
async fn test_hierarchy_round_trip() {
    let client = InMemoryParameterClient::with_records(vec![
        ParameterRecord::new("/a/b", "1"),
        ParameterRecord::new("/a/c", "2"),
        ParameterRecord::new("/a/d/e", "3"),
    ]);

    let tree = store_over(&client)
        .get_parameters_with_hierarchy("/a", RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&tree).unwrap(),
        json!({"b": "1", "c": "2", "d": {"e": "3"}})
    );
}

#[tokio::test]
#[serial]
async fn test_set_environment_first_write_wins() {
    unsafe {
        env::set_var("PS_IT_FOO", "orig");
        env::remove_var("PS_IT_BAR");
    }
    let first = FlatMapping::from([
        ("PS_IT_FOO".to_string(), "new".to_string()),
        ("PS_IT_BAR".to_string(), "bar".to_string()),
    ]);
    let second = FlatMapping::from([("PS_IT_BAR".to_string(), "later".to_string())]);

    ParameterStore::set_environment(&first);
    ParameterStore::set_environment(&second);

    assert_eq!(env::var("PS_IT_FOO").unwrap(), "orig");
    assert_eq!(env::var("PS_IT_BAR").unwrap(), "bar");

    unsafe {
        env::remove_var("PS_IT_FOO");
        env::remove_var("PS_IT_BAR");
    }
}

#[tokio::test]
#[serial]
async fn test_set_environment_from_path() {
    let client = InMemoryParameterClient::with_records(vec![
        ParameterRecord::new("/svc/PS_IT_DATABASE_HOST", "db.internal"),
        ParameterRecord::secret("/svc/PS_IT_DATABASE_PASSWORD", "hunter2"),
    ]);
    unsafe {
        env::remove_var("PS_IT_DATABASE_HOST");
        env::remove_var("PS_IT_DATABASE_PASSWORD");
    }

    let parameters = store_over(&client)
        .get_parameters_by_path("/svc", RetrievalOptions::default())
        .await
        .unwrap();
    ParameterStore::set_environment(&parameters);

    assert_eq!(env::var("PS_IT_DATABASE_HOST").unwrap(), "db.internal");
    assert_eq!(env::var("PS_IT_DATABASE_PASSWORD").unwrap(), "hunter2");

    unsafe {
        env::remove_var("PS_IT_DATABASE_HOST");
        env::remove_var("PS_IT_DATABASE_PASSWORD");
    }
}
