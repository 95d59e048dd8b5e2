//! Shared fixtures: a migrated in-memory database with a small catalog.
//!
//! Listing `n` (1..=50) costs `1_000_000 + n * 10_000`, has `n % 4 + 1` rooms and
//! `30 + n` square meters, and sits in the Lenina house when `n` is odd, else
//! in the Mira house. Listings 46..=50 are soft-deleted.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use catalog_service::CatalogModule;
use domain::{Clock, FixedClock};
use storage::entities::{
    district, house, real_estate, real_estate_photo, real_estate_type, street, user,
};
use storage::seed::seed_reference_data;
use storage::{Database, Persistence};

pub const CLIENT_ROLE_ID: i32 = 1;
pub const AGENT_ROLE_ID: i32 = 2;

pub const ACTIVE_LISTINGS: u64 = 45;
pub const TOTAL_LISTINGS: i32 = 50;

pub struct Fixture {
    pub central: i32,
    pub northern: i32,
    pub apartment: i32,
    pub cottage: i32,
    pub mira: i32,
    pub lenina: i32,
    /// Lenina 12, Central, parking and elevator
    pub lenina_house: i32,
    /// Mira 7a, Northern, neither
    pub mira_house: i32,
    pub agent: i32,
    pub other_agent: i32,
    pub client: i32,
    /// Listing ids in insertion order, `listings[n - 1]` is listing `n`
    pub listings: Vec<i32>,
}

pub struct TestContext {
    pub db: Database,
    pub persistence: Persistence,
    pub catalog: CatalogModule,
    pub fixture: Fixture,
}

impl TestContext {
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.connection()
    }
}

pub fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-01T10:00:00+03:00").unwrap()
}

pub fn price_of(n: i32) -> Decimal {
    Decimal::from(1_000_000 + n * 10_000)
}

pub async fn setup() -> TestContext {
    let db = Database::in_memory().await.unwrap();
    seed_reference_data(db.connection()).await.unwrap();
    let fixture = populate(db.connection()).await;

    let persistence = Persistence::new(db.get_connection());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let catalog = CatalogModule::new(persistence.clone(), clock);

    TestContext {
        db,
        persistence,
        catalog,
        fixture,
    }
}

pub async fn insert_user(
    conn: &DatabaseConnection,
    last_name: &str,
    first_name: &str,
    email: &str,
    role_id: i32,
) -> i32 {
    user::ActiveModel {
        last_name: Set(last_name.to_string()),
        first_name: Set(first_name.to_string()),
        middle_name: Set(None),
        phone: Set("+7 900 000-00-00".to_string()),
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        role_id: Set(role_id),
        created_at: Set(now()),
        deleted_at: Set(None),
        phone_verified: Set(false),
        email_verified: Set(false),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
    .id
}

pub async fn insert_house(
    conn: &DatabaseConnection,
    street_id: i32,
    district_id: i32,
    number: &str,
    amenities: bool,
) -> i32 {
    house::ActiveModel {
        street_id: Set(street_id),
        district_id: Set(district_id),
        number: Set(number.to_string()),
        total_floors: Set(9),
        has_parking: Set(amenities),
        has_elevator: Set(amenities),
        building_year: Set(Some(1985)),
        latitude: Set(None),
        longitude: Set(None),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
    .id
}

pub async fn insert_listing(
    conn: &DatabaseConnection,
    n: i32,
    agent_id: i32,
    type_id: i32,
    house_id: i32,
    deleted: bool,
) -> i32 {
    real_estate::ActiveModel {
        agent_id: Set(agent_id),
        type_id: Set(type_id),
        house_id: Set(house_id),
        description: Set(None),
        price: Set(price_of(n)),
        rooms: Set(n % 4 + 1),
        area: Set(Decimal::from(30 + n)),
        floor: Set(n % 9 + 1),
        has_balcony: Set(n % 2 == 0),
        created_at: Set(now() + Duration::minutes(n as i64)),
        deleted_at: Set(deleted.then(now)),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap()
    .id
}

pub async fn insert_photo(conn: &DatabaseConnection, listing_id: i32, name: &str, is_primary: bool) {
    real_estate_photo::ActiveModel {
        real_estate_id: Set(listing_id),
        file_path: Set(format!("/uploads/{}", name)),
        file_name: Set(name.to_string()),
        is_primary: Set(is_primary),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .unwrap();
}

async fn populate(conn: &DatabaseConnection) -> Fixture {
    let mut district_ids = Vec::new();
    for name in ["Northern", "Central"] {
        let model = district::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .unwrap();
        district_ids.push(model.id);
    }
    let (northern, central) = (district_ids[0], district_ids[1]);

    let mut type_ids = Vec::new();
    for name in ["Cottage", "Apartment"] {
        let model = real_estate_type::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .unwrap();
        type_ids.push(model.id);
    }
    let (cottage, apartment) = (type_ids[0], type_ids[1]);

    let mut street_ids = Vec::new();
    for name in ["Mira", "Lenina"] {
        let model = street::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .unwrap();
        street_ids.push(model.id);
    }
    let (mira, lenina) = (street_ids[0], street_ids[1]);

    let lenina_house = insert_house(conn, lenina, central, "12", true).await;
    let mira_house = insert_house(conn, mira, northern, "7a", false).await;

    let agent = insert_user(conn, "Sidorov", "Oleg", "oleg@example.com", AGENT_ROLE_ID).await;
    let other_agent = insert_user(conn, "Kuznetsova", "Irina", "irina@example.com", AGENT_ROLE_ID).await;
    let client = insert_user(conn, "Petrova", "Anna", "anna@example.com", CLIENT_ROLE_ID).await;

    let mut listings = Vec::new();
    for n in 1..=TOTAL_LISTINGS {
        let house_id = if n % 2 == 1 { lenina_house } else { mira_house };
        let type_id = if n % 5 == 0 { cottage } else { apartment };
        let deleted = n > ACTIVE_LISTINGS as i32;
        listings.push(insert_listing(conn, n, agent, type_id, house_id, deleted).await);
    }

    Fixture {
        central,
        northern,
        apartment,
        cottage,
        mira,
        lenina,
        lenina_house,
        mira_house,
        agent,
        other_agent,
        client,
        listings,
    }
}
