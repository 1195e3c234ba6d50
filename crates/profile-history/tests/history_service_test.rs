//! Integration tests for [`profile_history::HistoryService`] over the in-memory store.
//!
//! Time is driven by [`ManualClock`] so TTL boundaries are exact.

use std::sync::Arc;
use std::time::Duration;

use lens_core::{Platform, UserInfo};
use profile_history::{
    HistoryConfig, HistoryService, InMemoryKvStore, KvStore, ManualClock, ProfileUpdate,
    CACHE_DURATION, HISTORY_STORAGE_KEY,
};
use serde_json::json;

const START_MS: i64 = 1_700_000_000_000;

fn service_with(max_users: usize) -> (HistoryService, Arc<ManualClock>, InMemoryKvStore) {
    let store = InMemoryKvStore::new();
    let clock = Arc::new(ManualClock::new(START_MS));
    let config = HistoryConfig {
        max_users,
        ..HistoryConfig::default()
    };
    let service = HistoryService::with_config(Arc::new(store.clone()), clock.clone(), config);
    (service, clock, store)
}

fn update(category: &str, summary: &str) -> ProfileUpdate {
    ProfileUpdate {
        category: category.to_string(),
        profile_data: json!({ "summary": summary }),
        context: String::new(),
        model: "test-model".to_string(),
    }
}

/// **Test: saved profile is readable, then expires after 25 simulated hours.**
#[tokio::test]
async fn test_profile_expires_after_25_hours() {
    let (service, clock, _) = service_with(200);

    service
        .save_profile("u1", Platform::Zhihu, update("tech", "x"), None)
        .await
        .unwrap();

    let cached = service.get_profile("u1", Platform::Zhihu, "tech").await.unwrap();
    assert_eq!(cached.unwrap().profile_data["summary"], "x");

    clock.advance(Duration::from_secs(25 * 60 * 60));
    assert!(service
        .get_profile("u1", Platform::Zhihu, "tech")
        .await
        .unwrap()
        .is_none());

    // masked, not deleted
    let record = service.get_user_record("u1", Platform::Zhihu).await.unwrap().unwrap();
    assert!(record.profiles.contains_key("tech"));
}

/// **Test: a profile exactly 24h old is still valid; one millisecond more expires it.**
#[tokio::test]
async fn test_expiry_boundary_is_exclusive() {
    let (service, clock, _) = service_with(200);
    service
        .save_profile("u1", Platform::Reddit, update("politics", "p"), None)
        .await
        .unwrap();

    clock.advance(CACHE_DURATION);
    assert!(service
        .get_profile("u1", Platform::Reddit, "politics")
        .await
        .unwrap()
        .is_some());

    clock.advance(Duration::from_millis(1));
    assert!(service
        .get_profile("u1", Platform::Reddit, "politics")
        .await
        .unwrap()
        .is_none());
}

/// **Test: is_fresh agrees with get_profile on both sides of the 24h boundary.**
#[tokio::test]
async fn test_is_fresh_follows_service_clock() {
    let (service, clock, _) = service_with(200);
    service
        .save_profile("u1", Platform::Quora, update("culture", "c"), None)
        .await
        .unwrap();
    let record = service.get_user_record("u1", Platform::Quora).await.unwrap().unwrap();
    let profile = &record.profiles["culture"];

    clock.advance(CACHE_DURATION);
    assert!(service.is_fresh(profile));
    assert!(service
        .get_profile("u1", Platform::Quora, "culture")
        .await
        .unwrap()
        .is_some());

    clock.advance(Duration::from_millis(1));
    assert!(!service.is_fresh(profile));
    assert!(service
        .get_profile("u1", Platform::Quora, "culture")
        .await
        .unwrap()
        .is_none());
}

/// **Test: first save creates one record with one category at index 0.**
#[tokio::test]
async fn test_fresh_save_creates_single_record_at_front() {
    let (service, _, _) = service_with(200);
    service
        .save_profile("old", Platform::Quora, update("general", "o"), None)
        .await
        .unwrap();
    service
        .save_profile("u1", Platform::Twitter, update("technology", "t"), None)
        .await
        .unwrap();

    let records = service.get_all_user_records().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_id, "u1");
    assert_eq!(records[0].profiles.len(), 1);
    assert_eq!(records[0].last_updated, START_MS);
}

/// **Test: two categories for one user keep independent timestamps; record stays at index 0.**
#[tokio::test]
async fn test_two_categories_independent_timestamps() {
    let (service, clock, _) = service_with(200);
    service
        .save_profile("u1", Platform::Zhihu, update("technology", "a"), None)
        .await
        .unwrap();
    clock.advance(Duration::from_secs(60));
    service
        .save_profile("other", Platform::Zhihu, update("general", "b"), None)
        .await
        .unwrap();
    clock.advance(Duration::from_secs(60));
    service
        .save_profile("u1", Platform::Zhihu, update("economy", "c"), None)
        .await
        .unwrap();

    let records = service.get_all_user_records().await.unwrap();
    assert_eq!(records.len(), 2);
    let record = &records[0];
    assert_eq!(record.user_id, "u1");
    assert_eq!(record.profiles["technology"].timestamp, START_MS);
    assert_eq!(record.profiles["economy"].timestamp, START_MS + 120_000);
    assert_eq!(record.last_updated, START_MS + 120_000);
}

/// **Test: same user id on different platforms are separate records.**
#[tokio::test]
async fn test_platform_is_part_of_the_key() {
    let (service, _, _) = service_with(200);
    service
        .save_profile("u1", Platform::Zhihu, update("general", "z"), None)
        .await
        .unwrap();
    service
        .save_profile("u1", Platform::Reddit, update("general", "r"), None)
        .await
        .unwrap();

    assert_eq!(service.get_all_user_records().await.unwrap().len(), 2);
    let zhihu = service.get_profile("u1", Platform::Zhihu, "general").await.unwrap().unwrap();
    assert_eq!(zhihu.profile_data["summary"], "z");
}

/// **Test: collection is truncated to max_users, dropping the least recent.**
#[tokio::test]
async fn test_eviction_at_cap() {
    let (service, _, _) = service_with(3);
    for user in ["a", "b", "c", "d"] {
        service
            .save_profile(user, Platform::Reddit, update("general", user), None)
            .await
            .unwrap();
    }
    // touching "b" promotes it
    service
        .save_profile("b", Platform::Reddit, update("culture", "b2"), None)
        .await
        .unwrap();

    let ids: Vec<String> = service
        .get_all_user_records()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(ids, vec!["b", "d", "c"]);
}

/// **Test: user info is replaced when given and kept when omitted.**
#[tokio::test]
async fn test_user_info_snapshot() {
    let (service, _, _) = service_with(200);
    let info = UserInfo {
        name: "Alice".to_string(),
        headline: Some("Engineer".to_string()),
        ..UserInfo::default()
    };
    service
        .save_profile("u1", Platform::Zhihu, update("general", "g"), Some(info.clone()))
        .await
        .unwrap();
    service
        .save_profile("u1", Platform::Zhihu, update("culture", "c"), None)
        .await
        .unwrap();

    let record = service.get_user_record("u1", Platform::Zhihu).await.unwrap().unwrap();
    assert_eq!(record.user_info, Some(info));
}

/// **Test: deleting the last category removes the record; deleting one of several keeps the rest.**
#[tokio::test]
async fn test_delete_profile_semantics() {
    let (service, _, _) = service_with(200);
    service
        .save_profile("u1", Platform::Zhihu, update("technology", "t"), None)
        .await
        .unwrap();
    service
        .save_profile("u1", Platform::Zhihu, update("economy", "e"), None)
        .await
        .unwrap();

    service.delete_profile("u1", Platform::Zhihu, "technology").await.unwrap();
    let record = service.get_user_record("u1", Platform::Zhihu).await.unwrap().unwrap();
    assert_eq!(record.profiles.keys().collect::<Vec<_>>(), vec!["economy"]);

    service.delete_profile("u1", Platform::Zhihu, "economy").await.unwrap();
    assert!(service.get_user_record("u1", Platform::Zhihu).await.unwrap().is_none());
    assert!(service.get_all_user_records().await.unwrap().is_empty());

    // deleting from a missing record is a no-op
    service.delete_profile("nobody", Platform::Zhihu, "economy").await.unwrap();
}

/// **Test: delete_user_record and clear_all.**
#[tokio::test]
async fn test_delete_user_record_and_clear_all() {
    let (service, _, store) = service_with(200);
    for user in ["a", "b"] {
        service
            .save_profile(user, Platform::Quora, update("general", user), None)
            .await
            .unwrap();
    }

    service.delete_user_record("a", Platform::Quora).await.unwrap();
    let records = service.get_all_user_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, "b");

    service.clear_all().await.unwrap();
    assert!(service.get_all_user_records().await.unwrap().is_empty());
    assert!(store.get(HISTORY_STORAGE_KEY).await.unwrap().is_none());
}

/// **Test: an undecodable stored blob reads as empty history and is overwritten on save.**
#[tokio::test]
async fn test_corrupt_blob_reads_as_empty() {
    let (service, _, store) = service_with(200);
    store
        .set(HISTORY_STORAGE_KEY, json!({"not": "an array"}))
        .await
        .unwrap();

    assert!(service.get_all_user_records().await.unwrap().is_empty());
    service
        .save_profile("u1", Platform::Zhihu, update("general", "g"), None)
        .await
        .unwrap();
    assert_eq!(service.get_all_user_records().await.unwrap().len(), 1);
}

/// **Test: concurrent saves on one service lose no update.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_are_serialized() {
    let (service, _, _) = service_with(200);
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .save_profile(
                    &format!("user-{}", i % 5),
                    Platform::Twitter,
                    update(&format!("cat-{}", i), "x"),
                    None,
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = service.get_all_user_records().await.unwrap();
    assert_eq!(records.len(), 5);
    let total: usize = records.iter().map(|r| r.profiles.len()).sum();
    assert_eq!(total, 20);
}
