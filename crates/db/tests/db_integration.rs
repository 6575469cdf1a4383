//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `fbarchive_test`)
//!   `TEST_DB_PASSWORD` (default: `fbarchive_test`)
//!   `TEST_DB_NAME` (default: `fbarchive_test`)

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use fbarchive_db::entities::{fb_user, group, group::GroupPrivacy, post};
use fbarchive_db::repositories::{
    FbUserRepository, GroupRepository, MonthContentRepository, PostRepository,
    UserActivityRepository,
};
use fbarchive_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ActiveModelTrait, Set};

async fn seed_group_and_user(db: &TestDatabase) {
    let now = Utc::now();
    FbUserRepository::new(db.connection())
        .upsert(fb_user::ActiveModel {
            id: Set("u1".to_string()),
            name: Set("Tester".to_string()),
            picture: Set(None),
            updated_time: Set(now.into()),
        })
        .await
        .unwrap();

    GroupRepository::new(db.connection())
        .upsert(group::ActiveModel {
            id: Set("g1".to_string()),
            name: Set("Test group".to_string()),
            description: Set(None),
            updated_time: Set(now.into()),
            privacy: Set(GroupPrivacy::Open),
            is_stored: Set(false),
            post_count: Set(0),
            comment_count: Set(0),
            owner_id: Set(None),
        })
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::with_config(TestDbConfig::default()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_activity_add_then_sub_restores_count() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_group_and_user(&db).await;
    let repo = UserActivityRepository::new(db.connection());

    repo.add_post_count("u1", "g1").await.unwrap();
    repo.add_post_count("u1", "g1").await.unwrap();
    repo.sub_post_count("u1", "g1").await.unwrap();

    let activity = repo.find("u1", "g1").await.unwrap().unwrap();
    assert_eq!(activity.post_count, 1);
    assert_eq!(activity.comment_count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_activity_sub_never_goes_negative() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_group_and_user(&db).await;
    let repo = UserActivityRepository::new(db.connection());

    repo.sub_comment_count("u1", "g1").await.unwrap();
    repo.sub_comment_count("u1", "g1").await.unwrap();

    let activity = repo.find("u1", "g1").await.unwrap().unwrap();
    assert_eq!(activity.comment_count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_adds_are_not_lost() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_group_and_user(&db).await;
    let repo = UserActivityRepository::new(db.connection());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.add_comment_count("u1", "g1").await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let activity = repo.find("u1", "g1").await.unwrap().unwrap();
    assert_eq!(activity.comment_count, 16);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_month_shadow_insert_and_purge() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_group_and_user(&db).await;

    let t0 = Utc.with_ymd_and_hms(2015, 10, 1, 12, 0, 0).unwrap();
    let posts = PostRepository::new(db.connection());
    let mut created = Vec::new();
    for (id, age_days) in [("old", 40), ("recent", 3)] {
        let at = t0 - Duration::days(age_days);
        let model = post::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set("u1".to_string()),
            group_id: Set("g1".to_string()),
            created_time: Set(at.into()),
            updated_time: Set(at.into()),
            message: Set(None),
            picture: Set(None),
            comment_count: Set(0),
            like_count: Set(0),
            share_count: Set(0),
            is_show: Set(true),
        };
        created.push(posts.create(model).await.unwrap());
    }

    let shadows = MonthContentRepository::new(db.connection());
    for post in &created {
        assert!(shadows.insert_post_if_absent(post).await.unwrap());
        assert!(!shadows.insert_post_if_absent(post).await.unwrap());
    }
    assert_eq!(shadows.count_posts("g1").await.unwrap(), 2);

    let purged = shadows
        .purge_posts_older_than("g1", (t0 - Duration::days(30)).into())
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert!(shadows.post_exists("recent").await.unwrap());
    assert!(!shadows.post_exists("old").await.unwrap());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_group_counter_decrement_floors_at_zero() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_group_and_user(&db).await;
    let groups = GroupRepository::new(db.connection());

    groups.decrement_post_count("g1").await.unwrap();
    groups.increment_comment_count("g1").await.unwrap();

    let group = groups.get_by_id("g1").await.unwrap();
    assert_eq!(group.post_count, 0);
    assert_eq!(group.comment_count, 1);

    let mut active: group::ActiveModel = group.into();
    active.is_stored = Set(true);
    active.update(db.conn.as_ref()).await.unwrap();

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}
