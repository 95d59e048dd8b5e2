//! Listing search and summary tests against an in-memory SQLite database.

mod support;

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseBackend, EntityTrait, MockDatabase, Set};

use catalog_service::{ListingCatalog, ListingSearch};
use common::AppError;
use domain::{ListingFilter, SortKey, DEFAULT_PAGE_SIZE};
use storage::entities::house;
use storage::Persistence;

use support::{insert_photo, price_of, setup, ACTIVE_LISTINGS};

fn filter() -> ListingFilter {
    ListingFilter::default()
}

#[tokio::test]
async fn test_pagination_counts_active_listings_only() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let first = search.search(&filter()).await.unwrap();
    assert_eq!(first.total_count, ACTIVE_LISTINGS);
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.page_size, 20);
    assert_eq!(first.total_pages(), 3);

    let third = search
        .search(&ListingFilter {
            page: 3,
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(third.total_count, ACTIVE_LISTINGS);
    assert_eq!(third.items.len(), 5);

    let beyond = search
        .search(&ListingFilter {
            page: 10,
            ..filter()
        })
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, ACTIVE_LISTINGS);
}

#[tokio::test]
async fn test_inverted_price_range_is_rejected() {
    let ctx = setup().await;

    let result = ctx
        .catalog
        .listings
        .search(&ListingFilter {
            min_price: Some(Decimal::from(100_000)),
            max_price: Some(Decimal::from(50_000)),
            ..filter()
        })
        .await;

    match result {
        Err(AppError::InvalidFields(violations)) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "min_price");
        }
        other => panic!("expected field violations, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_filter_issues_no_statements() {
    let conn = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
    let catalog = ListingCatalog::new(Persistence::new(conn.clone()));

    let inverted = catalog
        .search(&ListingFilter {
            min_area: Some(Decimal::from(80)),
            max_area: Some(Decimal::from(40)),
            ..filter()
        })
        .await;
    assert!(matches!(inverted, Err(AppError::InvalidFields(ref v)) if v[0].field == "min_area"));

    let far_page = catalog
        .search(&ListingFilter {
            page: (i64::MAX as u64) / DEFAULT_PAGE_SIZE + 2,
            ..filter()
        })
        .await;
    assert!(matches!(far_page, Err(AppError::InvalidFields(ref v)) if v[0].field == "page"));

    assert!(conn.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_page_beyond_row_range_is_rejected() {
    let ctx = setup().await;

    let err = ctx
        .catalog
        .listings
        .search(&ListingFilter {
            page: u64::MAX,
            page_size: 200,
            ..filter()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidFields(ref v) if v.len() == 1 && v[0].field == "page"));
}

#[tokio::test]
async fn test_every_violation_is_reported_together() {
    let ctx = setup().await;

    let err = ctx
        .catalog
        .listings
        .search(&ListingFilter {
            rooms: Some(-1),
            min_area: Some(Decimal::from(20_000)),
            page: 0,
            ..filter()
        })
        .await
        .unwrap_err();

    let fields: Vec<String> = err.violations().into_iter().map(|v| v.field).collect();
    assert_eq!(fields, vec!["min_area", "rooms", "page"]);
}

#[tokio::test]
async fn test_house_and_listing_filters_combine() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let central = search
        .search(&ListingFilter {
            district_id: Some(ctx.fixture.central),
            page_size: 200,
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(central.total_count, 23);
    assert!(central.items.iter().all(|s| s.district == "Central"));
    assert!(central.items.iter().all(|s| s.address == "Lenina, д. 12"));

    let without_elevator = search
        .search(&ListingFilter {
            has_elevator: Some(false),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(without_elevator.total_count, 22);

    let with_balcony_and_parking = search
        .search(&ListingFilter {
            has_balcony: Some(true),
            has_parking: Some(true),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(with_balcony_and_parking.total_count, 0);

    let cottages = search
        .search(&ListingFilter {
            type_id: Some(ctx.fixture.cottage),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(cottages.total_count, 9);
    assert!(cottages.items.iter().all(|s| s.listing_type == "Cottage"));
}

#[tokio::test]
async fn test_ranges_are_inclusive() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let priced = search
        .search(&ListingFilter {
            min_price: Some(price_of(10)),
            max_price: Some(price_of(20)),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(priced.total_count, 11);
    assert_eq!(priced.items.first().map(|s| s.price), Some(price_of(10)));

    let sized = search
        .search(&ListingFilter {
            min_area: Some(Decimal::from(70)),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(sized.total_count, 6);

    let one_room = search
        .search(&ListingFilter {
            rooms: Some(1),
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(one_room.total_count, 11);
    assert!(one_room.items.iter().all(|s| s.rooms == 1));
}

#[tokio::test]
async fn test_sorting() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let cheapest = search.search(&filter()).await.unwrap();
    assert_eq!(cheapest.items[0].price, price_of(1));

    let dearest = search
        .search(&ListingFilter {
            sort_descending: true,
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(dearest.items[0].price, price_of(45));

    let by_area = search
        .search(&ListingFilter {
            sort_by: SortKey::Area,
            sort_descending: true,
            page: 2,
            page_size: 10,
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(by_area.items[0].area, Decimal::from(30 + 35));

    let by_district = search
        .search(&ListingFilter {
            sort_by: SortKey::District,
            page_size: 200,
            ..filter()
        })
        .await
        .unwrap();
    assert_eq!(by_district.items.len(), 45);
    assert!(by_district.items[..23].iter().all(|s| s.district == "Central"));
    assert!(by_district.items[23..].iter().all(|s| s.district == "Northern"));
    assert_eq!(by_district.items[0].id, ctx.fixture.listings[0]);
    assert_eq!(by_district.items[23].id, ctx.fixture.listings[1]);
}

#[tokio::test]
async fn test_listings_in_deleted_houses_are_hidden() {
    let ctx = setup().await;

    let mira = house::Entity::find_by_id(ctx.fixture.mira_house)
        .one(ctx.conn())
        .await
        .unwrap()
        .unwrap();
    let mut active: house::ActiveModel = mira.into();
    active.deleted_at = Set(Some(support::now()));
    active.update(ctx.conn()).await.unwrap();

    let page = ctx.catalog.listings.search(&filter()).await.unwrap();
    assert_eq!(page.total_count, 23);
}

#[tokio::test]
async fn test_summary_fields_and_primary_photo() {
    let ctx = setup().await;
    let first = ctx.fixture.listings[0];
    let third = ctx.fixture.listings[2];
    insert_photo(ctx.conn(), first, "a.jpg", false).await;
    insert_photo(ctx.conn(), first, "b.jpg", true).await;
    insert_photo(ctx.conn(), third, "c.jpg", false).await;

    let summary = ctx.catalog.listings.summary(first).await.unwrap().unwrap();
    assert_eq!(summary.address, "Lenina, д. 12");
    assert_eq!(summary.district, "Central");
    assert_eq!(summary.listing_type, "Apartment");
    assert_eq!(summary.agent, "Sidorov Oleg");
    assert_eq!(summary.agent_id, ctx.fixture.agent);
    assert_eq!(summary.price, price_of(1));
    assert_eq!(summary.rooms, 2);
    assert_eq!(summary.area, Decimal::from(31));
    assert_eq!(summary.total_floors, 9);
    assert!(summary.has_parking && summary.has_elevator && !summary.has_balcony);
    assert_eq!(summary.primary_photo.as_deref(), Some("/uploads/b.jpg"));

    let third = ctx.catalog.listings.summary(third).await.unwrap().unwrap();
    assert_eq!(third.primary_photo.as_deref(), Some("/uploads/c.jpg"));

    let second = ctx.fixture.listings[1];
    let second = ctx.catalog.listings.summary(second).await.unwrap().unwrap();
    assert_eq!(second.address, "Mira, д. 7a");
    assert_eq!(second.primary_photo, None);

    let deleted = ctx.fixture.listings[47];
    assert!(ctx.catalog.listings.summary(deleted).await.unwrap().is_none());
}

#[tokio::test]
async fn test_summaries_by_ids_collapse_duplicates() {
    let ctx = setup().await;
    let ids = &ctx.fixture.listings;

    let summaries = ctx
        .catalog
        .listings
        .summaries_by_ids(&[ids[2], ids[0], ids[2], ids[47]])
        .await
        .unwrap();

    let found: Vec<i32> = summaries.iter().map(|s| s.id).collect();
    assert_eq!(found, vec![ids[2], ids[0]]);

    let empty = tokio_test::assert_ok!(ctx.catalog.listings.summaries_by_ids(&[]).await);
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_by_agent_newest_first() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let mine = search.by_agent(ctx.fixture.agent).await.unwrap();
    assert_eq!(mine.len(), 45);
    assert_eq!(mine[0].id, ctx.fixture.listings[44]);
    assert_eq!(mine[44].id, ctx.fixture.listings[0]);

    assert!(search.by_agent(ctx.fixture.other_agent).await.unwrap().is_empty());
    assert!(search.by_agent(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookups_are_ordered_by_name() {
    let ctx = setup().await;
    let search = &ctx.catalog.listings;

    let names = |items: Vec<domain::LookupItem>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

    assert_eq!(names(search.districts().await.unwrap()), vec!["Central", "Northern"]);
    assert_eq!(names(search.types().await.unwrap()), vec!["Apartment", "Cottage"]);
    assert_eq!(names(search.streets().await.unwrap()), vec!["Lenina", "Mira"]);
}
