//! Client inquiries on listings and their status workflow.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use common::{AppError, AppResult};
use domain::interaction::notes_violation;
use domain::{
    format, AdminInteractionUpdate, Clock, InteractionStatusUpdate, InteractionSummary, LookupItem,
    AGENT_INTERACTION_LIMIT, ADMIN_INTERACTION_LIMIT,
};
use storage::entities::{house, interaction, interaction_status, real_estate, street, user};
use storage::{with_transaction, Persistence};

#[async_trait]
pub trait InteractionService: Send + Sync {
    /// Record a client's inquiry in the initial status. Returns the new id.
    async fn create(
        &self,
        client_id: i32,
        agent_id: i32,
        real_estate_id: i32,
        notes: Option<String>,
    ) -> AppResult<i32>;

    async fn for_agent(&self, agent_id: i32) -> AppResult<Vec<InteractionSummary>>;

    async fn for_client(&self, client_id: i32) -> AppResult<Vec<InteractionSummary>>;

    /// Most recently updated interactions across all agents.
    async fn all_recent(&self) -> AppResult<Vec<InteractionSummary>>;

    /// Status change by the assigned agent, or anyone with `can_update_any`.
    async fn update_status(
        &self,
        request: InteractionStatusUpdate,
        requester_id: i32,
        can_update_any: bool,
    ) -> AppResult<()>;

    async fn admin_update(&self, request: AdminInteractionUpdate) -> AppResult<()>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn statuses(&self) -> AppResult<Vec<LookupItem>>;
}

pub struct Interactions {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
}

impl Interactions {
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self { persistence, clock }
    }

    async fn list(&self, query: Select<interaction::Entity>) -> AppResult<Vec<InteractionSummary>> {
        let db = self.persistence.connection();
        let rows = query
            .filter(interaction::Column::DeletedAt.is_null())
            .order_by_desc(interaction::Column::UpdatedAt)
            .order_by_desc(interaction::Column::Id)
            .all(db)
            .await
            .map_err(AppError::from)?;
        summarize(db, rows).await
    }
}

fn check_notes(notes: Option<&str>) -> AppResult<()> {
    match notes_violation(notes) {
        Some(violation) => Err(AppError::InvalidFields(vec![violation])),
        None => Ok(()),
    }
}

async fn active_interaction<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<interaction::Model> {
    interaction::Entity::find_by_id(id)
        .filter(interaction::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotFound)
}

async fn apply_status<C: ConnectionTrait>(
    db: &C,
    request: InteractionStatusUpdate,
    requester_id: i32,
    can_update_any: bool,
    now: DateTime<FixedOffset>,
) -> AppResult<()> {
    let existing = active_interaction(db, request.interaction_id).await?;
    if !can_update_any && existing.agent_id != requester_id {
        return Err(AppError::Forbidden);
    }

    let mut active: interaction::ActiveModel = existing.into();
    active.status_id = Set(request.status_id);
    active.notes = Set(request.notes);
    active.updated_at = Set(now);
    active.update(db).await.map_err(AppError::from)?;
    Ok(())
}

async fn apply_admin_update<C: ConnectionTrait>(
    db: &C,
    request: AdminInteractionUpdate,
    now: DateTime<FixedOffset>,
) -> AppResult<()> {
    let existing = active_interaction(db, request.interaction_id).await?;

    let mut active: interaction::ActiveModel = existing.into();
    active.status_id = Set(request.status_id);
    active.agent_id = Set(request.agent_id);
    active.notes = Set(request.notes);
    active.updated_at = Set(now);
    active.update(db).await.map_err(AppError::from)?;
    Ok(())
}

async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32, now: DateTime<FixedOffset>) -> AppResult<()> {
    let existing = interaction::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    if let Some(existing) = existing.filter(|row| row.deleted_at.is_none()) {
        let mut active: interaction::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.update(db).await.map_err(AppError::from)?;
    }
    Ok(())
}

/// Resolve people, addresses and status names for `rows` in one pass per table.
async fn summarize<C: ConnectionTrait>(
    db: &C,
    rows: Vec<interaction::Model>,
) -> AppResult<Vec<InteractionSummary>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let people: HashSet<i32> = rows
        .iter()
        .flat_map(|r| [r.client_id, r.agent_id])
        .collect();
    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(people))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let listing_ids: HashSet<i32> = rows.iter().map(|r| r.real_estate_id).collect();
    let listings: HashMap<i32, i32> = real_estate::Entity::find()
        .filter(real_estate::Column::Id.is_in(listing_ids))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|l| (l.id, l.house_id))
        .collect();

    let houses: HashMap<i32, house::Model> = house::Entity::find()
        .filter(house::Column::Id.is_in(listings.values().copied().collect::<HashSet<_>>()))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|h| (h.id, h))
        .collect();

    let streets: HashMap<i32, String> = street::Entity::find()
        .filter(street::Column::Id.is_in(houses.values().map(|h| h.street_id).collect::<HashSet<_>>()))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let statuses: HashMap<i32, String> = interaction_status::Entity::find()
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let name_of = |id: i32| {
        users
            .get(&id)
            .map(|u| format::full_name(&u.last_name, &u.first_name, u.middle_name.as_deref()))
            .unwrap_or_default()
    };
    let phone_of = |id: i32| users.get(&id).map(|u| u.phone.clone()).unwrap_or_default();

    Ok(rows
        .into_iter()
        .map(|row| {
            let address = listings
                .get(&row.real_estate_id)
                .and_then(|house_id| houses.get(house_id))
                .map(|h| format::address(streets.get(&h.street_id).map(String::as_str), &h.number))
                .unwrap_or_default();
            InteractionSummary {
                id: row.id,
                client_name: name_of(row.client_id),
                client_phone: phone_of(row.client_id),
                agent_name: name_of(row.agent_id),
                agent_phone: phone_of(row.agent_id),
                agent_id: row.agent_id,
                address,
                status_id: row.status_id,
                status: statuses.get(&row.status_id).cloned().unwrap_or_default(),
                contacted_at: row.contacted_at,
                updated_at: row.updated_at,
                notes: row.notes,
            }
        })
        .collect())
}

#[async_trait]
impl InteractionService for Interactions {
    async fn create(
        &self,
        client_id: i32,
        agent_id: i32,
        real_estate_id: i32,
        notes: Option<String>,
    ) -> AppResult<i32> {
        check_notes(notes.as_deref())?;

        let db = self.persistence.connection();
        let initial = interaction_status::Entity::find()
            .order_by_asc(interaction_status::Column::Id)
            .one(db)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::internal("No interaction statuses; seed reference data"))?;

        let now = self.clock.now();
        let model = interaction::ActiveModel {
            client_id: Set(client_id),
            agent_id: Set(agent_id),
            real_estate_id: Set(real_estate_id),
            status_id: Set(initial.id),
            contacted_at: Set(now),
            updated_at: Set(now),
            notes: Set(notes),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(AppError::from)?;

        tracing::info!(
            "Interaction {} opened by client {} on listing {}",
            model.id,
            client_id,
            real_estate_id
        );
        Ok(model.id)
    }

    async fn for_agent(&self, agent_id: i32) -> AppResult<Vec<InteractionSummary>> {
        if agent_id <= 0 {
            return Err(AppError::validation("Agent id must be positive"));
        }
        self.list(
            interaction::Entity::find()
                .filter(interaction::Column::AgentId.eq(agent_id))
                .limit(AGENT_INTERACTION_LIMIT),
        )
        .await
    }

    async fn for_client(&self, client_id: i32) -> AppResult<Vec<InteractionSummary>> {
        if client_id <= 0 {
            return Err(AppError::validation("Client id must be positive"));
        }
        self.list(interaction::Entity::find().filter(interaction::Column::ClientId.eq(client_id)))
            .await
    }

    async fn all_recent(&self) -> AppResult<Vec<InteractionSummary>> {
        self.list(interaction::Entity::find().limit(ADMIN_INTERACTION_LIMIT))
            .await
    }

    async fn update_status(
        &self,
        request: InteractionStatusUpdate,
        requester_id: i32,
        can_update_any: bool,
    ) -> AppResult<()> {
        check_notes(request.notes.as_deref())?;
        let interaction_id = request.interaction_id;
        let now = self.clock.now();

        let result = with_transaction!(self.persistence, |txn| {
            apply_status(txn, request, requester_id, can_update_any, now).await
        });
        if let Err(AppError::Forbidden) = &result {
            tracing::warn!(
                "User {} may not update interaction {}",
                requester_id,
                interaction_id
            );
        }
        result
    }

    async fn admin_update(&self, request: AdminInteractionUpdate) -> AppResult<()> {
        if request.agent_id <= 0 {
            return Err(AppError::validation("An agent must be assigned"));
        }
        check_notes(request.notes.as_deref())?;
        let interaction_id = request.interaction_id;
        let now = self.clock.now();

        with_transaction!(self.persistence, |txn| {
            apply_admin_update(txn, request, now).await
        })?;

        tracing::info!("Administrator updated interaction {}", interaction_id);
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let now = self.clock.now();
        with_transaction!(self.persistence, |txn| soft_delete(txn, id, now).await)
    }

    async fn statuses(&self) -> AppResult<Vec<LookupItem>> {
        let rows = interaction_status::Entity::find()
            .order_by_asc(interaction_status::Column::Id)
            .all(self.persistence.connection())
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(LookupItem::from).collect())
    }
}
