//! Integration tests for `SqliteKeyValueStore`.

use witnesslab_core::store::KeyValueStore;
use witnesslab_storage::sqlite_store::SqliteKeyValueStore;

async fn memory_store() -> SqliteKeyValueStore {
    SqliteKeyValueStore::connect("sqlite::memory:").await.unwrap()
}

// --- get ---

#[tokio::test]
async fn test_get_returns_none_for_missing_key() {
    let store = memory_store().await;

    let value = store.get("witnessLabEpisodeState:v1").await.unwrap();

    assert!(value.is_none());
}

// --- set + get round-trip ---

#[tokio::test]
async fn test_set_then_get_returns_value() {
    let store = memory_store().await;

    store.set("k", r#"{"episodeId":"episode-001"}"#).await.unwrap();

    let value = store.get("k").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"episodeId":"episode-001"}"#));
}

#[tokio::test]
async fn test_set_overwrites_existing_value() {
    let store = memory_store().await;
    store.set("k", "first").await.unwrap();

    store.set("k", "second").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
}

#[tokio::test]
async fn test_keys_are_independent() {
    let store = memory_store().await;

    store.set("episode", "a").await.unwrap();
    store.set("stage", "b").await.unwrap();

    assert_eq!(store.get("episode").await.unwrap().as_deref(), Some("a"));
    assert_eq!(store.get("stage").await.unwrap().as_deref(), Some("b"));
}

// --- remove ---

#[tokio::test]
async fn test_remove_deletes_key_and_tolerates_absent_keys() {
    let store = memory_store().await;
    store.set("k", "v").await.unwrap();

    store.remove("k").await.unwrap();
    store.remove("never-written").await.unwrap();

    assert!(store.get("k").await.unwrap().is_none());
}

// --- connect ---

#[tokio::test]
async fn test_connect_fails_when_directory_is_missing() {
    let result =
        SqliteKeyValueStore::connect("sqlite:///nonexistent-witnesslab-dir/state.db").await;

    assert!(result.is_err());
}
