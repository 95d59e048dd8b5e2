//! Listing create, edit and detail tests.

mod support;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};

use catalog_service::{ListingEditor, ListingSearch};
use common::AppError;
use domain::ListingForm;
use storage::entities::{house, street};

use support::{insert_photo, now, setup, TestContext};

fn lenina_form(ctx: &TestContext) -> ListingForm {
    ListingForm {
        district_id: Some(ctx.fixture.central),
        street_id: Some(ctx.fixture.lenina),
        house_number: "12".to_string(),
        total_floors: 9,
        has_parking: true,
        has_elevator: true,
        building_year: Some(1985),
        type_id: Some(ctx.fixture.apartment),
        price: Decimal::from(4_500_000),
        rooms: 2,
        area: Decimal::from(54),
        floor: 3,
        ..Default::default()
    }
}

fn field_names(err: &AppError) -> Vec<String> {
    match err {
        AppError::InvalidFields(violations) => violations.iter().map(|v| v.field.clone()).collect(),
        other => panic!("expected field violations, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_adds_street_and_house() {
    let ctx = setup().await;
    let houses_before = house::Entity::find().count(ctx.conn()).await.unwrap();

    let form = ListingForm {
        street_id: None,
        new_street_name: Some("  Sadovaya ".to_string()),
        house_number: " 3 ".to_string(),
        total_floors: 5,
        floor: 2,
        description: Some("  Quiet courtyard ".to_string()),
        ..lenina_form(&ctx)
    };
    let id = ctx.catalog.editor.create(form, ctx.fixture.agent).await.unwrap();

    let details = ctx.catalog.editor.details(id).await.unwrap().unwrap();
    assert_eq!(details.agent_id, ctx.fixture.agent);
    assert_eq!(details.agent, "Sidorov Oleg");
    assert_eq!(details.listing_type, "Apartment");
    assert_eq!(details.address, "Sadovaya, д. 3");
    assert_eq!(details.description.as_deref(), Some("Quiet courtyard"));
    assert_eq!(details.created_at, now());
    assert_eq!(details.house.street, "Sadovaya");
    assert_eq!(details.house.district, "Central");
    assert_eq!(details.house.total_floors, 5);
    assert!(details.photos.is_empty());

    let houses_after = house::Entity::find().count(ctx.conn()).await.unwrap();
    assert_eq!(houses_after, houses_before + 1);

    let streets = ctx.catalog.listings.streets().await.unwrap();
    assert!(streets.iter().any(|s| s.name == "Sadovaya"));
}

#[tokio::test]
async fn test_create_reuses_active_house_and_refreshes_it() {
    let ctx = setup().await;
    let houses_before = house::Entity::find().count(ctx.conn()).await.unwrap();

    let form = ListingForm {
        house_number: " 12 ".to_string(),
        total_floors: 12,
        floor: 11,
        ..lenina_form(&ctx)
    };
    let id = ctx.catalog.editor.create(form, ctx.fixture.other_agent).await.unwrap();

    let details = ctx.catalog.editor.details(id).await.unwrap().unwrap();
    assert_eq!(details.house.id, ctx.fixture.lenina_house);
    assert_eq!(details.house.total_floors, 12);
    assert_eq!(details.agent, "Kuznetsova Irina");

    let houses_after = house::Entity::find().count(ctx.conn()).await.unwrap();
    assert_eq!(houses_after, houses_before);

    let summary = ctx.catalog.listings.summary(id).await.unwrap().unwrap();
    assert_eq!(summary.total_floors, 12);
    assert_eq!(summary.floor, 11);
}

#[tokio::test]
async fn test_floor_above_house_is_rejected() {
    let ctx = setup().await;
    let form = ListingForm {
        total_floors: 5,
        floor: 6,
        ..lenina_form(&ctx)
    };

    let err = ctx.catalog.editor.create(form, ctx.fixture.agent).await.unwrap_err();
    assert_eq!(field_names(&err), vec!["floor"]);
}

#[tokio::test]
async fn test_create_needs_an_agent() {
    let ctx = setup().await;
    let err = ctx.catalog.editor.create(lenina_form(&ctx), 0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_references_roll_back() {
    let ctx = setup().await;
    let streets_before = street::Entity::find().count(ctx.conn()).await.unwrap();

    let err = ctx
        .catalog
        .editor
        .create(
            ListingForm {
                street_id: Some(9_999),
                ..lenina_form(&ctx)
            },
            ctx.fixture.agent,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Street not found"));

    let err = ctx
        .catalog
        .editor
        .create(
            ListingForm {
                type_id: Some(9_999),
                street_id: None,
                new_street_name: Some("Zarechnaya".to_string()),
                ..lenina_form(&ctx)
            },
            ctx.fixture.agent,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Listing type not found"));

    let streets_after = street::Entity::find().count(ctx.conn()).await.unwrap();
    assert_eq!(streets_after, streets_before);
}

#[tokio::test]
async fn test_owner_updates_listing() {
    let ctx = setup().await;
    let id = ctx.fixture.listings[0];
    let details = ctx.catalog.editor.details(id).await.unwrap().unwrap();

    let form = ListingForm {
        price: Decimal::from(2_000_000),
        has_balcony: true,
        ..ListingForm::from(&details)
    };
    ctx.catalog
        .editor
        .update(id, form, ctx.fixture.agent, false)
        .await
        .unwrap();

    let summary = ctx.catalog.listings.summary(id).await.unwrap().unwrap();
    assert_eq!(summary.price, Decimal::from(2_000_000));
    assert!(summary.has_balcony);
    assert_eq!(summary.address, "Lenina, д. 12");
}

#[tokio::test]
async fn test_other_agent_needs_admin_to_update() {
    let ctx = setup().await;
    let id = ctx.fixture.listings[1];
    let details = ctx.catalog.editor.details(id).await.unwrap().unwrap();
    let form = ListingForm {
        rooms: 4,
        ..ListingForm::from(&details)
    };

    let err = ctx
        .catalog
        .editor
        .update(id, form.clone(), ctx.fixture.other_agent, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let unchanged = ctx.catalog.listings.summary(id).await.unwrap().unwrap();
    assert_eq!(unchanged.rooms, details.rooms);

    ctx.catalog
        .editor
        .update(id, form, ctx.fixture.other_agent, true)
        .await
        .unwrap();
    let changed = ctx.catalog.listings.summary(id).await.unwrap().unwrap();
    assert_eq!(changed.rooms, 4);
    assert_eq!(changed.agent_id, ctx.fixture.agent);
}

#[tokio::test]
async fn test_update_of_missing_or_deleted_listing_is_not_found() {
    let ctx = setup().await;
    let form = lenina_form(&ctx);

    let err = ctx
        .catalog
        .editor
        .update(9_999, form.clone(), ctx.fixture.agent, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let deleted = ctx.fixture.listings[49];
    let err = ctx
        .catalog
        .editor
        .update(deleted, form.clone(), ctx.fixture.agent, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = ctx
        .catalog
        .editor
        .update(0, form, ctx.fixture.agent, false)
        .await
        .unwrap_err();
    assert_eq!(field_names(&err), vec!["id"]);
}

#[tokio::test]
async fn test_details_include_active_photos() {
    let ctx = setup().await;
    let id = ctx.fixture.listings[2];
    insert_photo(ctx.conn(), id, "front.jpg", true).await;
    insert_photo(ctx.conn(), id, "kitchen.jpg", false).await;

    let details = ctx.catalog.editor.details(id).await.unwrap().unwrap();
    let names: Vec<&str> = details.photos.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["front.jpg", "kitchen.jpg"]);
    assert!(details.photos[0].is_primary);
    assert_eq!(details.photos[0].file_path, "/uploads/front.jpg");
    assert_eq!(details.agent_phone, "+7 900 000-00-00");

    let form = ListingForm::from(&details);
    assert_eq!(form.street_id, Some(ctx.fixture.lenina));
    assert_eq!(form.district_id, Some(ctx.fixture.central));
    assert_eq!(form.house_number, "12");
    assert!(form.violations().is_empty());
}

#[tokio::test]
async fn test_details_hide_deleted_listings() {
    let ctx = setup().await;
    assert!(ctx.catalog.editor.details(ctx.fixture.listings[49]).await.unwrap().is_none());
    assert!(ctx.catalog.editor.details(9_999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ensure_street_finds_or_creates() {
    let ctx = setup().await;

    let mira = ctx.catalog.editor.ensure_street("  Mira ").await.unwrap();
    assert_eq!(mira.id, ctx.fixture.mira);

    let first = ctx.catalog.editor.ensure_street("Novaya").await.unwrap();
    let second = ctx.catalog.editor.ensure_street(" Novaya").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Novaya");

    let err = ctx.catalog.editor.ensure_street("   ").await.unwrap_err();
    assert_eq!(field_names(&err), vec!["new_street_name"]);

    let err = ctx
        .catalog
        .editor
        .ensure_street(&"x".repeat(101))
        .await
        .unwrap_err();
    assert_eq!(field_names(&err), vec!["new_street_name"]);
}

#[tokio::test]
async fn test_agents_lookup_lists_active_agents_by_name() {
    let ctx = setup().await;
    let agents = ctx.catalog.listings.agents().await.unwrap();
    let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Kuznetsova Irina", "Sidorov Oleg"]);
    assert_eq!(agents[1].id, ctx.fixture.agent);
}
