//! Interaction workflow tests.

mod support;

use catalog_service::InteractionService;
use common::AppError;
use domain::{AdminInteractionUpdate, InteractionStatusUpdate};

use support::{now, setup, TestContext};

async fn open(ctx: &TestContext, listing_index: usize, notes: Option<&str>) -> i32 {
    ctx.catalog
        .interactions
        .create(
            ctx.fixture.client,
            ctx.fixture.agent,
            ctx.fixture.listings[listing_index],
            notes.map(str::to_string),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_starts_in_first_status() {
    let ctx = setup().await;

    let id = open(&ctx, 0, Some("Call after six")).await;

    let list = ctx.catalog.interactions.for_agent(ctx.fixture.agent).await.unwrap();
    assert_eq!(list.len(), 1);
    let summary = &list[0];
    assert_eq!(summary.id, id);
    assert_eq!(summary.status, "New");
    assert_eq!(summary.client_name, "Petrova Anna");
    assert_eq!(summary.agent_name, "Sidorov Oleg");
    assert_eq!(summary.client_phone, "+7 900 000-00-00");
    assert_eq!(summary.address, "Lenina, д. 12");
    assert_eq!(summary.contacted_at, now());
    assert_eq!(summary.updated_at, now());
    assert_eq!(summary.notes.as_deref(), Some("Call after six"));
}

#[tokio::test]
async fn test_overlong_notes_are_rejected() {
    let ctx = setup().await;
    let notes = "x".repeat(501);

    let err = ctx
        .catalog
        .interactions
        .create(
            ctx.fixture.client,
            ctx.fixture.agent,
            ctx.fixture.listings[0],
            Some(notes),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidFields(ref v) if v[0].field == "notes"));
}

#[tokio::test]
async fn test_lists_require_positive_ids() {
    let ctx = setup().await;

    assert!(matches!(
        ctx.catalog.interactions.for_agent(0).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        ctx.catalog.interactions.for_client(-3).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_assigned_agent_updates_status() {
    let ctx = setup().await;
    let id = open(&ctx, 0, None).await;
    let statuses = ctx.catalog.interactions.statuses().await.unwrap();
    let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["New", "In progress", "Viewing scheduled", "Closed"]);

    ctx.catalog
        .interactions
        .update_status(
            InteractionStatusUpdate {
                interaction_id: id,
                status_id: statuses[2].id,
                notes: Some("Saturday 11:00".to_string()),
            },
            ctx.fixture.agent,
            false,
        )
        .await
        .unwrap();

    let list = ctx.catalog.interactions.for_client(ctx.fixture.client).await.unwrap();
    assert_eq!(list[0].status, "Viewing scheduled");
    assert_eq!(list[0].notes.as_deref(), Some("Saturday 11:00"));
}

#[tokio::test]
async fn test_other_agent_is_forbidden_without_override() {
    let ctx = setup().await;
    let id = open(&ctx, 0, None).await;
    let request = InteractionStatusUpdate {
        interaction_id: id,
        status_id: 4,
        notes: None,
    };

    let err = ctx
        .catalog
        .interactions
        .update_status(request.clone(), ctx.fixture.other_agent, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    ctx.catalog
        .interactions
        .update_status(request, ctx.fixture.other_agent, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_of_missing_interaction_is_not_found() {
    let ctx = setup().await;

    let err = ctx
        .catalog
        .interactions
        .update_status(
            InteractionStatusUpdate {
                interaction_id: 404,
                status_id: 1,
                notes: None,
            },
            ctx.fixture.agent,
            true,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_admin_reassigns_agent() {
    let ctx = setup().await;
    let id = open(&ctx, 1, None).await;

    let rejected = ctx
        .catalog
        .interactions
        .admin_update(AdminInteractionUpdate {
            interaction_id: id,
            status_id: 2,
            agent_id: 0,
            notes: None,
        })
        .await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));

    ctx.catalog
        .interactions
        .admin_update(AdminInteractionUpdate {
            interaction_id: id,
            status_id: 2,
            agent_id: ctx.fixture.other_agent,
            notes: Some("Reassigned".to_string()),
        })
        .await
        .unwrap();

    assert!(ctx
        .catalog
        .interactions
        .for_agent(ctx.fixture.agent)
        .await
        .unwrap()
        .is_empty());
    let moved = ctx
        .catalog
        .interactions
        .for_agent(ctx.fixture.other_agent)
        .await
        .unwrap();
    assert_eq!(moved[0].agent_name, "Kuznetsova Irina");
    assert_eq!(moved[0].status, "In progress");
    assert_eq!(moved[0].address, "Mira, д. 7a");
}

#[tokio::test]
async fn test_delete_is_soft_and_idempotent() {
    let ctx = setup().await;
    let kept = open(&ctx, 0, None).await;
    let removed = open(&ctx, 2, None).await;

    ctx.catalog.interactions.delete(removed).await.unwrap();
    ctx.catalog.interactions.delete(removed).await.unwrap();
    ctx.catalog.interactions.delete(9_999).await.unwrap();

    let recent = ctx.catalog.interactions.all_recent().await.unwrap();
    let ids: Vec<i32> = recent.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![kept]);

    let err = ctx
        .catalog
        .interactions
        .update_status(
            InteractionStatusUpdate {
                interaction_id: removed,
                status_id: 1,
                notes: None,
            },
            ctx.fixture.agent,
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_lists_are_newest_update_first() {
    let ctx = setup().await;
    let older = open(&ctx, 0, None).await;
    let newer = open(&ctx, 2, None).await;

    // equal timestamps from the fixed clock fall back to id, newest first
    let list = ctx.catalog.interactions.for_client(ctx.fixture.client).await.unwrap();
    let ids: Vec<i32> = list.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![newer, older]);
}
