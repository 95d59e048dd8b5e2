//! Listing search, summaries and reference lookups.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Order;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};

use common::{AppError, AppResult};
use domain::{
    format, FieldViolation, ListingFilter, ListingSummary, LookupItem, Page, SortKey, ROLE_AGENT,
};
use storage::entities::{district, house, real_estate, real_estate_type, role, street, user};
use storage::Persistence;

use super::summary::{summarize, unique};

#[async_trait]
pub trait ListingSearch: Send + Sync {
    /// One page of active listings matching every present criterion.
    async fn search(&self, filter: &ListingFilter) -> AppResult<Page<ListingSummary>>;

    /// Active listings among `ids`, in first-occurrence order. Duplicates collapse.
    async fn summaries_by_ids(&self, ids: &[i32]) -> AppResult<Vec<ListingSummary>>;

    async fn summary(&self, id: i32) -> AppResult<Option<ListingSummary>>;

    /// An agent's active listings, newest first.
    async fn by_agent(&self, agent_id: i32) -> AppResult<Vec<ListingSummary>>;

    async fn districts(&self) -> AppResult<Vec<LookupItem>>;
    async fn types(&self) -> AppResult<Vec<LookupItem>>;
    async fn streets(&self) -> AppResult<Vec<LookupItem>>;

    /// Active users in the agent role, by full name.
    async fn agents(&self) -> AppResult<Vec<LookupItem>>;
}

pub struct ListingCatalog {
    persistence: Persistence,
}

impl ListingCatalog {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

/// Listings and their houses that are not soft-deleted.
pub(crate) fn active_listings() -> Select<real_estate::Entity> {
    real_estate::Entity::find()
        .join(JoinType::InnerJoin, real_estate::Relation::House.def())
        .filter(real_estate::Column::DeletedAt.is_null())
        .filter(house::Column::DeletedAt.is_null())
}

fn apply_filter(mut query: Select<real_estate::Entity>, filter: &ListingFilter) -> Select<real_estate::Entity> {
    if let Some(district_id) = filter.district_id {
        query = query.filter(house::Column::DistrictId.eq(district_id));
    }
    if let Some(type_id) = filter.type_id {
        query = query.filter(real_estate::Column::TypeId.eq(type_id));
    }
    if let Some(min_price) = filter.min_price {
        query = query.filter(real_estate::Column::Price.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        query = query.filter(real_estate::Column::Price.lte(max_price));
    }
    if let Some(min_area) = filter.min_area {
        query = query.filter(real_estate::Column::Area.gte(min_area));
    }
    if let Some(max_area) = filter.max_area {
        query = query.filter(real_estate::Column::Area.lte(max_area));
    }
    if let Some(rooms) = filter.rooms {
        query = query.filter(real_estate::Column::Rooms.eq(rooms));
    }
    if let Some(has_balcony) = filter.has_balcony {
        query = query.filter(real_estate::Column::HasBalcony.eq(has_balcony));
    }
    if let Some(has_parking) = filter.has_parking {
        query = query.filter(house::Column::HasParking.eq(has_parking));
    }
    if let Some(has_elevator) = filter.has_elevator {
        query = query.filter(house::Column::HasElevator.eq(has_elevator));
    }
    query
}

fn apply_sort(query: Select<real_estate::Entity>, filter: &ListingFilter) -> Select<real_estate::Entity> {
    let order = if filter.sort_descending {
        Order::Desc
    } else {
        Order::Asc
    };

    let query = match filter.sort_by {
        SortKey::Price => query.order_by(real_estate::Column::Price, order),
        SortKey::Area => query.order_by(real_estate::Column::Area, order),
        SortKey::Rooms => query.order_by(real_estate::Column::Rooms, order),
        SortKey::District => query
            .join(JoinType::InnerJoin, house::Relation::District.def())
            .order_by(district::Column::Name, order),
    };
    // ties keep storage order
    query.order_by_asc(real_estate::Column::Id)
}

#[async_trait]
impl ListingSearch for ListingCatalog {
    async fn search(&self, filter: &ListingFilter) -> AppResult<Page<ListingSummary>> {
        let violations = filter.violations();
        if !violations.is_empty() {
            return Err(AppError::InvalidFields(violations));
        }

        let offset = filter.offset().ok_or_else(|| {
            AppError::InvalidFields(vec![FieldViolation::new("page", "Page number is too large")])
        })?;

        let db = self.persistence.connection();
        let query = apply_filter(active_listings(), filter);

        let total_count = query.clone().count(db).await.map_err(AppError::from)?;

        let page_size = filter.effective_page_size();
        let rows = apply_sort(query, filter)
            .offset(offset)
            .limit(page_size)
            .all(db)
            .await
            .map_err(AppError::from)?;

        let items = summarize(db, rows).await?;
        tracing::debug!(
            "Listing search matched {} row(s), page {} holds {}",
            total_count,
            filter.page,
            items.len()
        );

        Ok(Page::new(items, total_count, filter.page, page_size))
    }

    async fn summaries_by_ids(&self, ids: &[i32]) -> AppResult<Vec<ListingSummary>> {
        let wanted = unique(ids.iter().copied());
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let position: HashMap<i32, usize> =
            wanted.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let db = self.persistence.connection();
        let mut rows = active_listings()
            .filter(real_estate::Column::Id.is_in(wanted))
            .all(db)
            .await
            .map_err(AppError::from)?;
        rows.sort_by_key(|row| position.get(&row.id).copied());

        summarize(db, rows).await
    }

    async fn summary(&self, id: i32) -> AppResult<Option<ListingSummary>> {
        let mut items = self.summaries_by_ids(&[id]).await?;
        Ok(items.pop())
    }

    async fn by_agent(&self, agent_id: i32) -> AppResult<Vec<ListingSummary>> {
        if agent_id <= 0 {
            return Ok(Vec::new());
        }

        let db = self.persistence.connection();
        let rows = active_listings()
            .filter(real_estate::Column::AgentId.eq(agent_id))
            .order_by_desc(real_estate::Column::CreatedAt)
            .order_by_desc(real_estate::Column::Id)
            .all(db)
            .await
            .map_err(AppError::from)?;

        summarize(db, rows).await
    }

    async fn districts(&self) -> AppResult<Vec<LookupItem>> {
        let rows = district::Entity::find()
            .order_by_asc(district::Column::Name)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(LookupItem::from).collect())
    }

    async fn types(&self) -> AppResult<Vec<LookupItem>> {
        let rows = real_estate_type::Entity::find()
            .order_by_asc(real_estate_type::Column::Name)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(LookupItem::from).collect())
    }

    async fn streets(&self) -> AppResult<Vec<LookupItem>> {
        let rows = street::Entity::find()
            .order_by_asc(street::Column::Name)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(LookupItem::from).collect())
    }

    async fn agents(&self) -> AppResult<Vec<LookupItem>> {
        let rows = user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::Role.def())
            .filter(role::Column::Name.eq(ROLE_AGENT))
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::MiddleName)
            .order_by_asc(user::Column::Id)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|u| LookupItem {
                id: u.id,
                name: format::full_name(&u.last_name, &u.first_name, u.middle_name.as_deref()),
            })
            .collect())
    }
}
