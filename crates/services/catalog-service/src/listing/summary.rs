//! Listing rows to [`ListingSummary`] with batched lookups.
//!
//! One query per related table for the whole batch, never one per row.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use common::{AppError, AppResult};
use domain::{format, ListingSummary};
use storage::entities::{district, house, real_estate, real_estate_photo, real_estate_type, street, user};

pub(crate) fn unique<T: Copy + Eq + Hash>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// Flagged primary among active photos, else the first active one.
pub(crate) fn primary_photo(photos: &[real_estate_photo::Model]) -> Option<String> {
    photos
        .iter()
        .find(|p| p.is_primary)
        .or_else(|| photos.first())
        .map(|p| p.file_path.clone())
}

/// Build summaries for `rows`, keeping their order.
pub(crate) async fn summarize<C: ConnectionTrait>(
    db: &C,
    rows: Vec<real_estate::Model>,
) -> AppResult<Vec<ListingSummary>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let houses: HashMap<i32, house::Model> = house::Entity::find()
        .filter(house::Column::Id.is_in(unique(rows.iter().map(|r| r.house_id))))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|h| (h.id, h))
        .collect();

    let streets: HashMap<i32, String> = street::Entity::find()
        .filter(street::Column::Id.is_in(unique(houses.values().map(|h| h.street_id))))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let districts: HashMap<i32, String> = district::Entity::find()
        .filter(district::Column::Id.is_in(unique(houses.values().map(|h| h.district_id))))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    let types: HashMap<i32, String> = real_estate_type::Entity::find()
        .filter(real_estate_type::Column::Id.is_in(unique(rows.iter().map(|r| r.type_id))))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let agents: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(unique(rows.iter().map(|r| r.agent_id))))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|u| {
            let name = format::full_name(&u.last_name, &u.first_name, u.middle_name.as_deref());
            (u.id, name)
        })
        .collect();

    let mut photos: HashMap<i32, Vec<real_estate_photo::Model>> = HashMap::new();
    for photo in real_estate_photo::Entity::find()
        .filter(real_estate_photo::Column::RealEstateId.is_in(rows.iter().map(|r| r.id)))
        .filter(real_estate_photo::Column::DeletedAt.is_null())
        .order_by_asc(real_estate_photo::Column::Id)
        .all(db)
        .await
        .map_err(AppError::from)?
    {
        photos.entry(photo.real_estate_id).or_default().push(photo);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let house = houses.get(&row.house_id);
            let street = house.and_then(|h| streets.get(&h.street_id));
            ListingSummary {
                id: row.id,
                address: house
                    .map(|h| format::address(street.map(String::as_str), &h.number))
                    .unwrap_or_default(),
                district: house
                    .and_then(|h| districts.get(&h.district_id))
                    .cloned()
                    .unwrap_or_default(),
                listing_type: types.get(&row.type_id).cloned().unwrap_or_default(),
                price: row.price,
                rooms: row.rooms,
                area: row.area,
                floor: row.floor,
                total_floors: house.map(|h| h.total_floors).unwrap_or(0),
                agent: agents.get(&row.agent_id).cloned().unwrap_or_default(),
                agent_id: row.agent_id,
                has_balcony: row.has_balcony,
                has_parking: house.map(|h| h.has_parking).unwrap_or(false),
                has_elevator: house.map(|h| h.has_elevator).unwrap_or(false),
                primary_photo: photos
                    .get(&row.id)
                    .and_then(|list| primary_photo(list)),
                latitude: house.and_then(|h| h.latitude),
                longitude: house.and_then(|h| h.longitude),
            }
        })
        .collect())
}
