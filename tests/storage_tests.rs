//! Storage backend tests
//!
//! Tests for RedbStorage using temporary redb files.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use linkvault::config::DatabaseConfig;
use linkvault::errors::LinkvaultError;
use linkvault::storage::{RedbStorage, UrlDb, UrlRecord};
use tempfile::TempDir;

/// 创建临时 redb 文件的存储实例
fn create_temp_storage() -> (RedbStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.redb");
    let storage = RedbStorage::new(&db_path, 6, 64).expect("Failed to create storage");
    (storage, temp_dir)
}

fn record(url: &str) -> UrlRecord {
    UrlRecord::new(url)
}

// =============================================================================
// 打开与配置
// =============================================================================

#[cfg(test)]
mod open_tests {
    use super::*;

    #[test]
    fn test_open_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: temp_dir.path().join("cfg.redb").display().to_string(),
            id_length: 9,
            max_id_attempts: 4,
        };

        let storage = RedbStorage::open(&config).unwrap();
        assert_eq!(storage.id_length(), 9);

        let id = storage.put(&record("https://example.com"), "alice").unwrap();
        assert_eq!(id.len(), 9);
    }

    #[test]
    fn test_reopen_keeps_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("persist.redb");

        let id = {
            let storage = RedbStorage::new(&path, 6, 64).unwrap();
            storage.put(&record("https://persist.example.com"), "alice").unwrap()
        };

        let storage = RedbStorage::new(&path, 6, 64).unwrap();
        let found = storage.get(&id).unwrap().expect("record survives reopen");
        assert_eq!(found.url, "https://persist.example.com");
    }

    #[test]
    fn test_rejects_zero_id_length() {
        let temp_dir = TempDir::new().unwrap();
        let result = RedbStorage::new(temp_dir.path().join("x.redb"), 0, 64);
        assert!(matches!(result, Err(LinkvaultError::Validation(_))));
    }
}

// =============================================================================
// put / get
// =============================================================================

#[cfg(test)]
mod put_get_tests {
    use super::*;

    #[test]
    fn test_put_then_get_round_trip() {
        let (storage, _dir) = create_temp_storage();
        let expires = Utc::now() + Duration::days(7);

        let id = storage
            .put(&record("https://example.com/a").with_expires(Some(expires)), "alice")
            .unwrap();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

        let found = storage.get(&id).unwrap().expect("record should exist");
        assert_eq!(found.id, id);
        assert_eq!(found.user, "alice");
        assert_eq!(found.url, "https://example.com/a");
        assert_eq!(found.views, 0);
        assert_eq!(found.expires, Some(expires));
        assert!(found.last_modified.is_some());
        assert!(!found.is_deleted());
    }

    #[test]
    fn test_put_without_expiry() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "bob").unwrap();

        let found = storage.get(&id).unwrap().unwrap();
        assert_eq!(found.expires, None);
    }

    #[test]
    fn test_put_resets_views_and_owner() {
        let (storage, _dir) = create_temp_storage();
        let mut input = record("https://example.com");
        input.views = 42;
        input.user = "mallory".to_string();

        let id = storage.put(&input, "alice").unwrap();
        let found = storage.get(&id).unwrap().unwrap();
        assert_eq!(found.views, 0);
        assert_eq!(found.user, "alice");
    }

    #[test]
    fn test_put_with_explicit_id() {
        let (storage, _dir) = create_temp_storage();
        let id = storage
            .put(&record("https://example.com").with_id("custom"), "alice")
            .unwrap();
        assert_eq!(id, "custom");
        assert!(storage.get("custom").unwrap().is_some());
    }

    #[test]
    fn test_put_requires_user() {
        let (storage, _dir) = create_temp_storage();
        let result = storage.put(&record("https://example.com"), "");
        assert!(matches!(result, Err(LinkvaultError::Validation(_))));
        assert!(storage.urls("").unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_is_none() {
        let (storage, _dir) = create_temp_storage();
        assert!(storage.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_explicit_id_collision_fails() {
        let (storage, _dir) = create_temp_storage();
        storage
            .put(&record("https://first.example.com").with_id("dup"), "alice")
            .unwrap();

        let result = storage.put(&record("https://second.example.com").with_id("dup"), "bob");
        assert!(matches!(result, Err(LinkvaultError::AlreadyExists(_))));

        // 原记录和索引都不受影响
        assert_eq!(storage.get("dup").unwrap().unwrap().url, "https://first.example.com");
        assert!(storage.urls("bob").unwrap().is_empty());
    }

    #[test]
    fn test_soft_deleted_id_cannot_be_reused() {
        let (storage, _dir) = create_temp_storage();
        storage
            .put(&record("https://example.com").with_id("gone"), "alice")
            .unwrap();
        storage.delete("gone").unwrap();

        let result = storage.put(&record("https://other.example.com").with_id("gone"), "bob");
        assert!(matches!(result, Err(LinkvaultError::AlreadyExists(_))));
        assert!(storage.urls("bob").unwrap().is_empty());
    }

    #[test]
    fn test_generated_ids_are_fresh() {
        let (storage, _dir) = create_temp_storage();
        let deleted = storage.put(&record("https://deleted.example.com"), "alice").unwrap();
        storage.delete(&deleted).unwrap();

        let mut seen = HashSet::from([deleted]);
        for i in 0..50 {
            let id = storage
                .put(&record(&format!("https://example.com/{}", i)), "alice")
                .unwrap();
            assert!(seen.insert(id), "generated id was reused");
        }
    }

    #[test]
    fn test_id_allocation_exhaustion() {
        let temp_dir = TempDir::new().unwrap();
        let storage = RedbStorage::new(temp_dir.path().join("tiny.redb"), 1, 8).unwrap();

        // 长度为 1 的 ID 只有 62 个，全部占满后必然失败
        let mut exhausted = false;
        for i in 0..200 {
            match storage.put(&record(&format!("https://example.com/{}", i)), "alice") {
                Ok(_) => {}
                Err(LinkvaultError::IdExhausted(_)) => {
                    exhausted = true;
                    break;
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert!(exhausted);
        assert!(storage.urls("alice").unwrap().len() <= 62);
    }
}

// =============================================================================
// update
// =============================================================================

#[cfg(test)]
mod update_tests {
    use super::*;

    #[test]
    fn test_update_missing_fails() {
        let (storage, _dir) = create_temp_storage();
        let result = storage.update("missing", &record("https://example.com"));
        assert!(matches!(result, Err(LinkvaultError::NotFound(_))));
        assert!(storage.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_deleted_fails() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "alice").unwrap();
        storage.delete(&id).unwrap();

        let result = storage.update(&id, &record("https://new.example.com"));
        assert!(matches!(result, Err(LinkvaultError::NotFound(_))));
    }

    #[test]
    fn test_update_preserves_user_and_views() {
        let (storage, _dir) = create_temp_storage();
        let id = storage
            .put(
                &record("https://old.example.com").with_expires(Some(Utc::now() + Duration::days(1))),
                "alice",
            )
            .unwrap();
        storage.view(&id).unwrap();
        storage.view(&id).unwrap();
        let before = storage.get(&id).unwrap().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));

        let mut change = record("https://new.example.com");
        change.user = "mallory".to_string();
        change.views = 1000;
        storage.update(&id, &change).unwrap();

        let after = storage.get(&id).unwrap().unwrap();
        assert_eq!(after.user, "alice");
        assert_eq!(after.views, 2);
        assert_eq!(after.url, "https://new.example.com");
        assert_eq!(after.expires, None);
        assert!(after.last_modified > before.last_modified);
    }

    #[test]
    fn test_update_sets_expiry() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "alice").unwrap();
        let expires = Utc::now() + Duration::hours(3);

        storage
            .update(&id, &record("https://example.com").with_expires(Some(expires)))
            .unwrap();
        assert_eq!(storage.get(&id).unwrap().unwrap().expires, Some(expires));
    }
}

// =============================================================================
// delete
// =============================================================================

#[cfg(test)]
mod delete_tests {
    use super::*;

    #[test]
    fn test_delete_missing_fails() {
        let (storage, _dir) = create_temp_storage();
        assert!(matches!(
            storage.delete("missing"),
            Err(LinkvaultError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_hides_record() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "alice").unwrap();
        let keep = storage.put(&record("https://keep.example.com"), "alice").unwrap();

        storage.delete(&id).unwrap();

        assert!(storage.get(&id).unwrap().is_none());
        assert_eq!(storage.view(&id).unwrap(), "");

        let listed = storage.urls("alice").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep);
        assert!(storage.urls("").unwrap().iter().all(|r| r.id != id));
    }

    #[test]
    fn test_delete_twice_succeeds() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "alice").unwrap();
        storage.delete(&id).unwrap();
        storage.delete(&id).unwrap();
        assert!(storage.get(&id).unwrap().is_none());
    }
}

// =============================================================================
// view
// =============================================================================

#[cfg(test)]
mod view_tests {
    use super::*;

    #[test]
    fn test_view_unknown_is_empty() {
        let (storage, _dir) = create_temp_storage();
        assert_eq!(storage.view("unknown").unwrap(), "");
    }

    #[test]
    fn test_view_counts_each_visit() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com/target"), "alice").unwrap();

        for _ in 0..25 {
            assert_eq!(storage.view(&id).unwrap(), "https://example.com/target");
        }

        assert_eq!(storage.get(&id).unwrap().unwrap().views, 25);
    }

    #[test]
    fn test_view_expired_is_empty_and_not_counted() {
        let (storage, _dir) = create_temp_storage();
        let id = storage
            .put(
                &record("https://example.com").with_expires(Some(Utc::now() - Duration::seconds(1))),
                "alice",
            )
            .unwrap();

        assert_eq!(storage.view(&id).unwrap(), "");
        assert_eq!(storage.get(&id).unwrap().unwrap().views, 0);
    }

    #[test]
    fn test_view_future_expiry_resolves() {
        let (storage, _dir) = create_temp_storage();
        let id = storage
            .put(
                &record("https://example.com").with_expires(Some(Utc::now() + Duration::hours(1))),
                "alice",
            )
            .unwrap();
        assert_eq!(storage.view(&id).unwrap(), "https://example.com");
    }

    #[test]
    fn test_concurrent_views_are_all_counted() {
        let (storage, _dir) = create_temp_storage();
        let id = storage.put(&record("https://example.com"), "alice").unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        storage.view(&id).unwrap();
                    }
                });
            }
        });

        assert_eq!(storage.get(&id).unwrap().unwrap().views, 40);
    }
}

// =============================================================================
// urls
// =============================================================================

#[cfg(test)]
mod list_tests {
    use super::*;

    #[test]
    fn test_urls_empty_store() {
        let (storage, _dir) = create_temp_storage();
        assert!(storage.urls("").unwrap().is_empty());
        assert!(storage.urls("alice").unwrap().is_empty());
    }

    #[test]
    fn test_urls_by_user_and_all() {
        let (storage, _dir) = create_temp_storage();
        let a1 = storage.put(&record("https://a1.example.com"), "alice").unwrap();
        let a2 = storage.put(&record("https://a2.example.com"), "alice").unwrap();
        let b1 = storage.put(&record("https://b1.example.com"), "bob").unwrap();

        let alice: HashSet<String> = storage.urls("alice").unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(alice, HashSet::from([a1.clone(), a2.clone()]));

        let bob = storage.urls("bob").unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].id, b1);
        assert_eq!(bob[0].user, "bob");

        let all: HashSet<String> = storage.urls("").unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(all, HashSet::from([a1, a2, b1]));
    }

    #[test]
    fn test_urls_prefix_ids_do_not_mix() {
        let (storage, _dir) = create_temp_storage();
        storage.put(&record("https://short.example.com").with_id("ab"), "al").unwrap();
        storage.put(&record("https://long.example.com").with_id("abc"), "alice").unwrap();

        let al = storage.urls("al").unwrap();
        assert_eq!(al.len(), 1);
        assert_eq!(al[0].id, "ab");
        assert_eq!(storage.get("ab").unwrap().unwrap().url, "https://short.example.com");
        assert_eq!(storage.get("abc").unwrap().unwrap().url, "https://long.example.com");
    }

    #[test]
    fn test_urls_unknown_user_is_empty() {
        let (storage, _dir) = create_temp_storage();
        storage.put(&record("https://example.com"), "alice").unwrap();
        assert!(storage.urls("nobody").unwrap().is_empty());
    }
}

// =============================================================================
// UrlDb trait (async)
// =============================================================================

#[cfg(test)]
mod trait_tests {
    use super::*;

    #[tokio::test]
    async fn test_trait_object_round_trip() {
        let (storage, _dir) = create_temp_storage();
        let db: Arc<dyn UrlDb> = Arc::new(storage);

        let id = db.put(UrlRecord::new("https://example.com"), "alice").await.unwrap();
        assert_eq!(db.view(&id).await.unwrap(), "https://example.com");
        assert_eq!(db.get(&id).await.unwrap().unwrap().views, 1);

        db.update(&id, UrlRecord::new("https://changed.example.com"))
            .await
            .unwrap();
        assert_eq!(db.urls("alice").await.unwrap()[0].url, "https://changed.example.com");

        db.delete(&id).await.unwrap();
        assert!(db.get(&id).await.unwrap().is_none());
        assert_eq!(db.view(&id).await.unwrap(), "");
        assert!(db.urls("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trait_errors_propagate() {
        let (storage, _dir) = create_temp_storage();
        let db: Arc<dyn UrlDb> = Arc::new(storage);

        let err = db.delete("missing").await.unwrap_err();
        assert_eq!(err.code(), "E005");
    }
}
