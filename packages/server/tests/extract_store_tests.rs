//! Postgres store tests against a shared testcontainers database.

mod common;

use common::{sample_geom, TestHarness};
use server_core::domains::extracts::models::{ExtractJob, STATUS_PENDING};
use server_core::kernel::{BaseExtractJobStore, BaseHistoryStore};
use test_context::test_context;
use uuid::Uuid;

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[test_context(TestHarness)]
#[tokio::test]
async fn inserted_job_is_pending(ctx: &TestHarness) {
    let store = ctx.job_store();
    let job_id = unique("job");

    store.insert(&job_id, "owner@example.org").await.unwrap();

    let job = ExtractJob::find_by_job_id(&job_id, &ctx.db_pool)
        .await
        .unwrap()
        .expect("job should be stored");
    assert_eq!(job.email, "owner@example.org");
    assert_eq!(job.status, STATUS_PENDING);

    let pending = store.list_pending().await.unwrap();
    assert!(pending.iter().any(|j| j.job_id == job_id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_insert_keeps_first_owner(ctx: &TestHarness) {
    let store = ctx.job_store();
    let job_id = unique("job");

    store.insert(&job_id, "first@example.org").await.unwrap();
    store.insert(&job_id, "second@example.org").await.unwrap();

    let job = ExtractJob::find_by_job_id(&job_id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.email, "first@example.org");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_is_idempotent(ctx: &TestHarness) {
    let store = ctx.job_store();
    let job_id = unique("job");

    store.insert(&job_id, "owner@example.org").await.unwrap();
    store.delete(&job_id).await.unwrap();
    store.delete(&job_id).await.unwrap();
    store.delete(&unique("never-existed")).await.unwrap();

    assert!(ExtractJob::find_by_job_id(&job_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
    let pending = store.list_pending().await.unwrap();
    assert!(!pending.iter().any(|j| j.job_id == job_id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn history_round_trips_geometry(ctx: &TestHarness) {
    let store = ctx.history_store();
    let user_id = unique("user");
    let geom = sample_geom("Bosque");

    let id = store.insert(&user_id, &geom, &geom.title).await.unwrap();

    let areas = store.list_for_user(&user_id).await.unwrap();
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].id, id);
    assert_eq!(areas[0].title, "Bosque");
    assert_eq!(areas[0].geom.0.rings, geom.rings);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn history_delete_requires_ownership(ctx: &TestHarness) {
    let store = ctx.history_store();
    let owner = unique("user");
    let stranger = unique("user");
    let geom = sample_geom("Owned");

    let id = store.insert(&owner, &geom, &geom.title).await.unwrap();

    assert!(!store.delete_for_user(id, &stranger).await.unwrap());
    assert_eq!(store.list_for_user(&owner).await.unwrap().len(), 1);

    assert!(store.delete_for_user(id, &owner).await.unwrap());
    assert!(store.list_for_user(&owner).await.unwrap().is_empty());
}
