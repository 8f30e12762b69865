//! End-to-end lifecycle tests: options file to context, sessions, topic logs
//! and teardown, against in-memory and temporary-directory collaborators.

mod common;

use std::time::Duration;

use feed_context::database::{DatabaseError, ScriptedConnector, Step};
use feed_context::storage::{
    MemoryConnector, MemoryObjectStore, ObjectStoreConnector, StorageBackend, CSV_CONTAINER,
    LOG_CONTAINER,
};
use feed_context::{AppContext, InitError, SessionError};

fn memory_connector() -> MemoryConnector {
    MemoryConnector::new(MemoryObjectStore::new())
}

fn is_blob_name(topic: &str, name: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(topic)
        .and_then(|r| r.strip_prefix('-'))
        .and_then(|r| r.strip_suffix(".txt"))
    else {
        return false;
    };
    let bytes = rest.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}

#[tokio::test]
async fn test_initialize_exposes_options_exactly() {
    let file = common::write_options(&common::options_json("mongodb://test", 50, 10));
    let connector = memory_connector();

    let context = AppContext::initialize(file.path(), &connector).await.unwrap();

    let feeds = context.feeds();
    assert_eq!(feeds.countries, "https://feeds.example.org/countries.csv");
    assert_eq!(feeds.regions, "https://feeds.example.org/regions.csv");
    assert_eq!(feeds.airports, "https://feeds.example.org/airports.csv");
    assert_eq!(feeds.runways, "https://feeds.example.org/runways.csv");
    assert_eq!(
        feeds.frequencies.as_deref(),
        Some("https://feeds.example.org/airport-frequencies.csv")
    );
    assert_eq!(context.max_results(), 50);
    assert_eq!(context.database().uri, "mongodb://test");
    assert_eq!(context.database().timeout, Duration::from_secs(10));

    let store = connector.store();
    assert_eq!(store.containers_created(), 2);
    assert_eq!(store.container_region(CSV_CONTAINER).as_deref(), Some("us-east-1"));
    assert_eq!(store.container_region(LOG_CONTAINER).as_deref(), Some("us-east-1"));

    context.destroy();
}

#[tokio::test]
async fn test_second_initialize_reuses_existing_containers() {
    let file = common::write_options(&common::options_json("mongodb://test", 50, 10));
    let connector = memory_connector();

    let first = AppContext::initialize(file.path(), &connector).await.unwrap();
    let second = AppContext::initialize(file.path(), &connector).await.unwrap();

    assert_eq!(connector.store().containers_created(), 2);

    first.destroy();
    second.destroy();
}

#[tokio::test]
async fn test_missing_options_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let connector = memory_connector();

    let err = AppContext::initialize(&dir.path().join("options.json"), &connector)
        .await
        .unwrap_err();

    assert!(matches!(err, InitError::Config(_)));
    assert_eq!(connector.store().containers_created(), 0);
}

#[tokio::test]
async fn test_malformed_options_file_is_config_error() {
    let file = common::write_options("{ \"source\": ");
    let connector = memory_connector();

    let err = AppContext::initialize(file.path(), &connector)
        .await
        .unwrap_err();

    assert!(matches!(err, InitError::Config(_)));
}

#[tokio::test]
async fn test_negative_max_results_is_rejected() {
    let file = common::write_options(&common::options_json("mongodb://test", -1, 10));

    let err = AppContext::initialize(file.path(), &memory_connector())
        .await
        .unwrap_err();

    assert!(matches!(err, InitError::Config(_)));
    assert!(err.to_string().contains("max-results"));
}

#[tokio::test]
async fn test_refused_storage_is_storage_connect_error() {
    let file = common::write_options(&common::options_json("mongodb://test", 50, 10));
    let connector = memory_connector();
    connector.refuse_connections(true);

    let err = AppContext::initialize(file.path(), &connector)
        .await
        .unwrap_err();

    assert!(matches!(err, InitError::StorageConnect(_)));
}

#[tokio::test]
async fn test_container_failures_are_storage_connect_errors() {
    let config = common::app_config("mongodb://test", 50, 10);

    let checks = memory_connector();
    checks.store().fail_container_checks(true);
    let err = AppContext::from_config(&config, &checks).await.unwrap_err();
    assert!(matches!(err, InitError::StorageConnect(_)));

    let creates = memory_connector();
    creates.store().fail_container_creates(true);
    let err = AppContext::from_config(&config, &creates).await.unwrap_err();
    assert!(matches!(err, InitError::StorageConnect(_)));
}

#[tokio::test]
async fn test_minio_options_select_s3_backend() {
    let file = common::write_options(&common::options_json("mongodb://test", 50, 10));
    let config = feed_context::config::load_config(file.path()).unwrap();

    let backend = StorageBackend::for_endpoint(&config.storage.server);
    assert_eq!(backend, StorageBackend::S3);
    assert!(backend.connect(&config.storage).await.is_ok());
}

#[tokio::test]
async fn test_file_endpoint_initializes_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::app_config("mongodb://test", 50, 10);
    config.storage.server = url::Url::from_directory_path(dir.path())
        .unwrap()
        .to_string();

    let backend = StorageBackend::for_endpoint(&config.storage.server);
    assert_eq!(backend, StorageBackend::Local);
    let context = AppContext::from_config(&config, &backend).await.unwrap();
    assert!(dir.path().join(CSV_CONTAINER).is_dir());
    assert!(dir.path().join(LOG_CONTAINER).is_dir());

    let log = context.start_log("countries");
    log.write_line("stored on disk");
    let blob = log.close().await.unwrap();
    let text = std::fs::read_to_string(dir.path().join(LOG_CONTAINER).join(&blob)).unwrap();
    assert!(text.contains("stored on disk"));

    context.destroy();
}

#[tokio::test]
async fn test_healthy_session_opens_and_closes() {
    let config = common::app_config("mongodb://test", 50, 10);
    let context = AppContext::from_config(&config, &memory_connector())
        .await
        .unwrap();
    let db = ScriptedConnector::healthy();

    let mut session = context.open_session(&db).await.unwrap();
    assert!(session.is_open());
    assert!(session.handle().is_some());
    assert_eq!(context.outstanding_sessions(), 1);

    session.close().await;
    assert!(!session.is_open());
    assert_eq!(db.disconnects(), 1);
    assert_eq!(context.outstanding_sessions(), 0);

    context.destroy();
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_database_fails_no_earlier_than_timeout() {
    let config = common::app_config("mongodb://test", 50, 10);
    let context = AppContext::from_config(&config, &memory_connector())
        .await
        .unwrap();

    let started = tokio::time::Instant::now();
    let err = context
        .open_session(&ScriptedConnector::new(Step::Hang, Step::Succeed))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(
        err,
        SessionError::Connect(DatabaseError::Timeout(_))
    ));
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(11));

    let started = tokio::time::Instant::now();
    let err = context
        .open_session(&ScriptedConnector::new(Step::Succeed, Step::Hang))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Unreachable(_)));
    assert!(started.elapsed() >= Duration::from_secs(10));

    context.destroy();
}

#[tokio::test(start_paused = true)]
async fn test_session_expires_after_deadline() {
    let config = common::app_config("mongodb://test", 50, 2);
    let context = AppContext::from_config(&config, &memory_connector())
        .await
        .unwrap();
    let db = ScriptedConnector::healthy();

    let mut session = context.open_session(&db).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(session.is_expired());
    assert!(session.handle().is_none());
    session.close().await;
    assert_eq!(db.disconnects(), 0);

    context.destroy();
}

#[tokio::test]
async fn test_destroy_expires_open_sessions() {
    let config = common::app_config("mongodb://test", 50, 10);
    let context = AppContext::from_config(&config, &memory_connector())
        .await
        .unwrap();
    let db = ScriptedConnector::healthy();

    let mut session = context.open_session(&db).await.unwrap();
    context.destroy();

    assert!(session.is_expired());
    session.close().await;
    assert_eq!(db.disconnects(), 0);
}

#[tokio::test]
async fn test_destroy_without_sessions() {
    let config = common::app_config("mongodb://test", 50, 10);
    let context = AppContext::from_config(&config, &memory_connector())
        .await
        .unwrap();

    assert_eq!(context.outstanding_sessions(), 0);
    context.destroy();
}

#[tokio::test]
async fn test_topic_log_is_flushed_to_log_container() {
    let config = common::app_config("mongodb://test", 50, 10);
    let connector = memory_connector();
    let context = AppContext::from_config(&config, &connector).await.unwrap();

    let log = context.start_log("airports");
    log.write_line("x");
    let blob = log.close().await.unwrap();

    assert!(is_blob_name("airports", &blob), "unexpected blob name {blob}");
    let stored = connector.store().object(LOG_CONTAINER, &blob).unwrap();
    assert_eq!(stored.content_type, "text/plain");
    let text = String::from_utf8(stored.content).unwrap();
    assert!(text.ends_with(" x\n"), "unexpected log content {text:?}");

    context.destroy();
}

#[tokio::test]
async fn test_topic_logs_are_independent() {
    let config = common::app_config("mongodb://test", 50, 10);
    let connector = memory_connector();
    let context = AppContext::from_config(&config, &connector).await.unwrap();

    let countries = context.start_log("countries");
    let runways = context.start_log("runways");
    countries.write_line("countries only");
    runways.write_line("runways only");

    let countries_blob = countries.close().await.unwrap();
    let runways_blob = runways.close().await.unwrap();

    let store = connector.store();
    let countries_text =
        String::from_utf8(store.object(LOG_CONTAINER, &countries_blob).unwrap().content).unwrap();
    let runways_text =
        String::from_utf8(store.object(LOG_CONTAINER, &runways_blob).unwrap().content).unwrap();
    assert!(countries_text.contains("countries only"));
    assert!(!countries_text.contains("runways only"));
    assert!(runways_text.contains("runways only"));
    assert!(!runways_text.contains("countries only"));

    context.destroy();
}

#[tokio::test]
async fn test_log_flush_failure_is_reported() {
    let config = common::app_config("mongodb://test", 50, 10);
    let connector = memory_connector();
    let context = AppContext::from_config(&config, &connector).await.unwrap();
    connector.store().fail_puts(true);

    let log = context.start_log("regions");
    log.write_line("lost");
    let err = log.close().await.unwrap_err();

    assert_eq!(err.topic, "regions");
    assert!(connector.store().object_names(LOG_CONTAINER).is_empty());

    context.destroy();
}
