//! Listing create and edit.
//!
//! A listing points at a house, and the house at a street. Both are found by
//! name and number or created on the way, inside the listing's transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use common::{AppError, AppResult};
use domain::{
    format, Clock, FieldViolation, HouseDetails, ListingDetails, ListingForm, ListingPhoto,
    LookupItem, MAX_STREET_NAME_LENGTH,
};
use storage::entities::{
    district, house, real_estate, real_estate_photo, real_estate_type, street, user,
};
use storage::{with_transaction, Persistence};

#[async_trait]
pub trait ListingEditor: Send + Sync {
    /// Create a listing owned by `agent_id`. Returns the new id.
    async fn create(&self, form: ListingForm, agent_id: i32) -> AppResult<i32>;

    /// Edit a listing. Only its own agent may, unless `is_admin`.
    async fn update(
        &self,
        id: i32,
        form: ListingForm,
        requester_id: i32,
        is_admin: bool,
    ) -> AppResult<()>;

    /// The street named `name` (trimmed), created when missing.
    async fn ensure_street(&self, name: &str) -> AppResult<LookupItem>;

    /// Active listing with its house, agent and active photos.
    async fn details(&self, id: i32) -> AppResult<Option<ListingDetails>>;
}

pub struct ListingRegistry {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
}

impl ListingRegistry {
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self { persistence, clock }
    }
}

fn check_form(form: &ListingForm) -> AppResult<()> {
    let violations = form.violations();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(violations))
    }
}

fn required(value: Option<i32>, field: &str, message: &str) -> AppResult<i32> {
    value.ok_or_else(|| AppError::InvalidFields(vec![FieldViolation::new(field, message)]))
}

/// Type and district ids, both checked to exist.
async fn references<C: ConnectionTrait>(db: &C, form: &ListingForm) -> AppResult<(i32, i32)> {
    let type_id = required(form.type_id, "type_id", "Choose a listing type")?;
    let district_id = required(form.district_id, "district_id", "Choose a district")?;

    let types = real_estate_type::Entity::find_by_id(type_id)
        .count(db)
        .await
        .map_err(AppError::from)?;
    if types == 0 {
        return Err(AppError::validation("Listing type not found"));
    }

    let districts = district::Entity::find_by_id(district_id)
        .count(db)
        .await
        .map_err(AppError::from)?;
    if districts == 0 {
        return Err(AppError::validation("District not found"));
    }

    Ok((type_id, district_id))
}

async fn find_or_create_street<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<street::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidFields(vec![FieldViolation::new(
            "new_street_name",
            "Street name is required",
        )]));
    }
    if name.chars().count() > MAX_STREET_NAME_LENGTH {
        return Err(AppError::InvalidFields(vec![FieldViolation::new(
            "new_street_name",
            format!("Street name must be at most {} characters", MAX_STREET_NAME_LENGTH),
        )]));
    }

    let existing = street::Entity::find()
        .filter(street::Column::Name.eq(name))
        .order_by_asc(street::Column::Id)
        .one(db)
        .await
        .map_err(AppError::from)?;
    if let Some(existing) = existing {
        return Ok(existing);
    }

    let created = street::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(AppError::from)?;
    tracing::info!("Street {} added as {}", created.id, created.name);
    Ok(created)
}

async fn resolve_street<C: ConnectionTrait>(db: &C, form: &ListingForm) -> AppResult<i32> {
    match form.street_id {
        Some(street_id) => {
            let found = street::Entity::find_by_id(street_id)
                .count(db)
                .await
                .map_err(AppError::from)?;
            if found == 0 {
                return Err(AppError::validation("Street not found"));
            }
            Ok(street_id)
        }
        None => {
            let name = form.new_street_name.as_deref().unwrap_or_default();
            Ok(find_or_create_street(db, name).await?.id)
        }
    }
}

fn apply_house(active: &mut house::ActiveModel, district_id: i32, form: &ListingForm) {
    active.district_id = Set(district_id);
    active.total_floors = Set(form.total_floors);
    active.has_parking = Set(form.has_parking);
    active.has_elevator = Set(form.has_elevator);
    active.building_year = Set(form.building_year);
    active.latitude = Set(form.latitude);
    active.longitude = Set(form.longitude);
}

/// The active house at street and number, refreshed from the form, or a new one.
async fn upsert_house<C: ConnectionTrait>(
    db: &C,
    street_id: i32,
    district_id: i32,
    form: &ListingForm,
) -> AppResult<i32> {
    let number = form.house_number.trim();
    let existing = house::Entity::find()
        .filter(house::Column::StreetId.eq(street_id))
        .filter(house::Column::Number.eq(number))
        .filter(house::Column::DeletedAt.is_null())
        .order_by_asc(house::Column::Id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    match existing {
        Some(existing) => {
            let mut active: house::ActiveModel = existing.into();
            apply_house(&mut active, district_id, form);
            Ok(active.update(db).await.map_err(AppError::from)?.id)
        }
        None => {
            let mut active = house::ActiveModel {
                street_id: Set(street_id),
                number: Set(number.to_string()),
                deleted_at: Set(None),
                ..Default::default()
            };
            apply_house(&mut active, district_id, form);
            Ok(active.insert(db).await.map_err(AppError::from)?.id)
        }
    }
}

/// Trimmed description; blank means none.
fn description(form: &ListingForm) -> Option<String> {
    form.description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

async fn insert_listing<C: ConnectionTrait>(
    db: &C,
    form: ListingForm,
    agent_id: i32,
    now: DateTime<FixedOffset>,
) -> AppResult<i32> {
    let (type_id, district_id) = references(db, &form).await?;
    let street_id = resolve_street(db, &form).await?;
    let house_id = upsert_house(db, street_id, district_id, &form).await?;

    let model = real_estate::ActiveModel {
        agent_id: Set(agent_id),
        type_id: Set(type_id),
        house_id: Set(house_id),
        description: Set(description(&form)),
        price: Set(form.price),
        rooms: Set(form.rooms),
        area: Set(form.area),
        floor: Set(form.floor),
        has_balcony: Set(form.has_balcony),
        created_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(AppError::from)?;

    Ok(model.id)
}

async fn apply_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    form: ListingForm,
    requester_id: i32,
    is_admin: bool,
) -> AppResult<()> {
    let existing = real_estate::Entity::find_by_id(id)
        .filter(real_estate::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotFound)?;
    if !is_admin && existing.agent_id != requester_id {
        return Err(AppError::Forbidden);
    }

    let (type_id, district_id) = references(db, &form).await?;
    let street_id = resolve_street(db, &form).await?;
    let house_id = upsert_house(db, street_id, district_id, &form).await?;

    let mut active: real_estate::ActiveModel = existing.into();
    active.type_id = Set(type_id);
    active.house_id = Set(house_id);
    active.description = Set(description(&form));
    active.price = Set(form.price);
    active.rooms = Set(form.rooms);
    active.area = Set(form.area);
    active.floor = Set(form.floor);
    active.has_balcony = Set(form.has_balcony);
    active.update(db).await.map_err(AppError::from)?;
    Ok(())
}

#[async_trait]
impl ListingEditor for ListingRegistry {
    async fn create(&self, form: ListingForm, agent_id: i32) -> AppResult<i32> {
        if agent_id <= 0 {
            return Err(AppError::validation("The listing agent could not be determined"));
        }
        check_form(&form)?;
        let now = self.clock.now();

        let id = with_transaction!(self.persistence, |txn| {
            insert_listing(txn, form, agent_id, now).await
        })?;

        tracing::info!("Listing {} created by agent {}", id, agent_id);
        Ok(id)
    }

    async fn update(
        &self,
        id: i32,
        form: ListingForm,
        requester_id: i32,
        is_admin: bool,
    ) -> AppResult<()> {
        if requester_id <= 0 {
            return Err(AppError::validation("The requesting user could not be determined"));
        }
        let mut violations = Vec::new();
        if id <= 0 {
            violations.push(FieldViolation::new("id", "Invalid listing id"));
        }
        violations.extend(form.violations());
        if !violations.is_empty() {
            return Err(AppError::InvalidFields(violations));
        }

        let result = with_transaction!(self.persistence, |txn| {
            apply_update(txn, id, form, requester_id, is_admin).await
        });
        match &result {
            Ok(()) => tracing::info!("Listing {} updated by user {}", id, requester_id),
            Err(AppError::Forbidden) => {
                tracing::warn!("User {} may not edit listing {}", requester_id, id)
            }
            Err(_) => {}
        }
        result
    }

    async fn ensure_street(&self, name: &str) -> AppResult<LookupItem> {
        let name = name.to_string();
        let street = with_transaction!(self.persistence, |txn| {
            find_or_create_street(txn, &name).await
        })?;
        Ok(LookupItem::from(street))
    }

    async fn details(&self, id: i32) -> AppResult<Option<ListingDetails>> {
        let db = self.persistence.connection();
        let Some((listing, Some(house))) = real_estate::Entity::find_by_id(id)
            .filter(real_estate::Column::DeletedAt.is_null())
            .find_also_related(house::Entity)
            .one(db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let street = street::Entity::find_by_id(house.street_id)
            .one(db)
            .await
            .map_err(AppError::from)?;
        let district = district::Entity::find_by_id(house.district_id)
            .one(db)
            .await
            .map_err(AppError::from)?;
        let listing_type = real_estate_type::Entity::find_by_id(listing.type_id)
            .one(db)
            .await
            .map_err(AppError::from)?;
        let agent = user::Entity::find_by_id(listing.agent_id)
            .one(db)
            .await
            .map_err(AppError::from)?;
        let photos = real_estate_photo::Entity::find()
            .filter(real_estate_photo::Column::RealEstateId.eq(listing.id))
            .filter(real_estate_photo::Column::DeletedAt.is_null())
            .order_by_asc(real_estate_photo::Column::Id)
            .all(db)
            .await
            .map_err(AppError::from)?;

        let street_name = street.map(|s| s.name).unwrap_or_default();
        Ok(Some(ListingDetails {
            id: listing.id,
            agent_id: listing.agent_id,
            agent: agent
                .as_ref()
                .map(|u| format::full_name(&u.last_name, &u.first_name, u.middle_name.as_deref()))
                .unwrap_or_default(),
            agent_phone: agent.map(|u| u.phone).unwrap_or_default(),
            type_id: listing.type_id,
            listing_type: listing_type.map(|t| t.name).unwrap_or_default(),
            address: format::address(Some(&street_name), &house.number),
            description: listing.description,
            price: listing.price,
            rooms: listing.rooms,
            area: listing.area,
            floor: listing.floor,
            has_balcony: listing.has_balcony,
            created_at: listing.created_at,
            house: HouseDetails {
                id: house.id,
                street_id: house.street_id,
                street: street_name,
                district_id: house.district_id,
                district: district.map(|d| d.name).unwrap_or_default(),
                number: house.number,
                total_floors: house.total_floors,
                has_parking: house.has_parking,
                has_elevator: house.has_elevator,
                building_year: house.building_year,
                latitude: house.latitude,
                longitude: house.longitude,
            },
            photos: photos
                .into_iter()
                .map(|p| ListingPhoto {
                    id: p.id,
                    file_path: p.file_path,
                    file_name: p.file_name,
                    is_primary: p.is_primary,
                })
                .collect(),
        }))
    }
}
