//! End-to-end cache lifecycle tests.
//!
//! These tests drive [`CacheManager`] against real files to verify freshness
//! detection, machine binding, and recovery from damaged caches.

use passcache_cache::{parse_source, CacheState, LoadOrigin, RebuildReason};
use passcache_integration_tests::{identity, Workspace};

const EXPORT: &str = "name,username,password,url\nExample,alice,s3cr3t,https://example.com\n";

#[tokio::test]
async fn test_repeated_loads_rebuild_once() {
    let ws = Workspace::with_source(EXPORT);
    let manager = ws.manager();

    let first = manager.load(false).await.unwrap();
    assert_eq!(first.origin, LoadOrigin::Rebuilt(RebuildReason::Missing));

    for _ in 0..3 {
        let again = manager.load(false).await.unwrap();
        assert_eq!(again.origin, LoadOrigin::Cached);
        assert_eq!(again.snapshot.last_updated, first.snapshot.last_updated);
    }

    let cred = &first.snapshot.credentials[0];
    assert_eq!(cred.name, "Example");
    assert_eq!(cred.username.as_deref(), Some("alice"));
    assert_eq!(cred.password, "s3cr3t");
    assert_eq!(cred.url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn test_same_length_edit_is_stale() {
    let ws = Workspace::with_source(EXPORT);
    let manager = ws.manager();
    manager.load(false).await.unwrap();

    // Same byte length, different content.
    ws.write_source(&EXPORT.replace("s3cr3t", "s3cr3T"));
    assert_eq!(manager.status().await.unwrap(), CacheState::Stale);

    let loaded = manager.load(false).await.unwrap();
    assert_eq!(loaded.origin, LoadOrigin::Rebuilt(RebuildReason::Stale));
    assert_eq!(loaded.snapshot.credentials[0].password, "s3cr3T");
    assert_eq!(manager.status().await.unwrap(), CacheState::Fresh);
}

#[tokio::test]
async fn test_cache_is_bound_to_machine() {
    let ws = Workspace::with_source(EXPORT);
    ws.manager_for(&identity("laptop")).load(false).await.unwrap();

    // The cache file is unreadable on another machine and gets rebuilt there.
    let other = ws.manager_for(&identity("desktop"));
    assert_eq!(other.status().await.unwrap(), CacheState::Corrupt);
    let loaded = other.load(false).await.unwrap();
    assert_eq!(loaded.origin, LoadOrigin::Rebuilt(RebuildReason::Corrupt));
    assert_eq!(loaded.snapshot.credentials.len(), 1);
}

#[tokio::test]
async fn test_cache_file_is_not_plaintext() {
    let ws = Workspace::with_source(EXPORT);
    ws.manager().load(false).await.unwrap();

    let raw = std::fs::read_to_string(&ws.cache_file).unwrap();
    assert!(!raw.contains("s3cr3t"));
    let token: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(token.get("iv").is_some());
    assert!(token.get("authTag").is_some());
    assert!(token.get("encrypted").is_some());
}

#[tokio::test]
async fn test_truncated_cache_recovers() {
    let ws = Workspace::with_source(EXPORT);
    let manager = ws.manager();
    manager.load(false).await.unwrap();

    let raw = std::fs::read(&ws.cache_file).unwrap();
    std::fs::write(&ws.cache_file, &raw[..raw.len() / 2]).unwrap();

    let loaded = manager.load(false).await.unwrap();
    assert_eq!(loaded.origin, LoadOrigin::Rebuilt(RebuildReason::Corrupt));
    assert_eq!(manager.load(false).await.unwrap().origin, LoadOrigin::Cached);
}

#[tokio::test]
async fn test_missing_source_serves_cache() {
    let ws = Workspace::with_source(EXPORT);
    let manager = ws.manager();
    manager.load(false).await.unwrap();

    std::fs::remove_file(&ws.source).unwrap();
    let loaded = manager.load(false).await.unwrap();
    assert_eq!(loaded.origin, LoadOrigin::Cached);
    assert_eq!(loaded.snapshot.credentials.len(), 1);

    // A forced rebuild cannot succeed without the source.
    assert!(manager.refresh().await.is_err());
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let ws = Workspace::with_source(EXPORT);
    let manager = ws.manager();

    manager.clear().await;
    assert!(!ws.cache_file.exists());

    manager.load(false).await.unwrap();
    assert!(ws.cache_file.exists());
    manager.clear().await;
    manager.clear().await;
    assert!(!ws.cache_file.exists());
    assert_eq!(manager.status().await.unwrap(), CacheState::Empty);
}

#[tokio::test]
async fn test_mixed_export_classification() {
    let export = "\
type,name,username,password,cardNumber,expiryDate,cvv,notes
,Example,alice,s3cr3t,,,,
,Visa,,,4111111111111111,12/27,123,
,Odd,bob,pw,5500000000000004,,,
,Wifi,,,,,,door code 1234
note,Labelled,carol,pw2,,,,kept as note
";
    let ws = Workspace::with_source(export);
    let (credentials, cards, notes) = parse_source(&ws.source).await.unwrap();

    let names = |v: Vec<String>| v.join(",");
    assert_eq!(
        names(credentials.into_iter().map(|c| c.name).collect()),
        "Example"
    );
    // Card fields win over credential fields.
    assert_eq!(names(cards.into_iter().map(|c| c.name).collect()), "Visa,Odd");
    // An explicit type label wins over everything.
    assert_eq!(
        names(notes.into_iter().map(|n| n.name).collect()),
        "Wifi,Labelled"
    );
}

#[tokio::test]
async fn test_card_scenario() {
    let ws =
        Workspace::with_source("name,cardNumber,expiryDate,cvv\nVisa,4111111111111111,12/27,123\n");
    let (credentials, cards, notes) = parse_source(&ws.source).await.unwrap();
    assert!(credentials.is_empty());
    assert!(notes.is_empty());
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].card_number.as_deref(), Some("4111111111111111"));
    assert_eq!(cards[0].expiry_date.as_deref(), Some("12/27"));
    assert_eq!(cards[0].cvv.as_deref(), Some("123"));
}
