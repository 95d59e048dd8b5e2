//! Administrator activity report.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use common::{AppError, AppResult};
use domain::report::rank;
use domain::{format, RegistryReport, ReportRow};
use storage::entities::{district, house, interaction, interaction_status, real_estate, user};
use storage::Persistence;

use crate::listing::active_listings;

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Counts by district, agent and status, each ranked largest first.
    async fn build(&self) -> AppResult<RegistryReport>;
}

pub struct Reports {
    persistence: Persistence,
}

impl Reports {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

fn rows<F>(counts: Vec<(i32, i64)>, name_of: F) -> Vec<ReportRow>
where
    F: Fn(i32) -> String,
{
    let mut rows: Vec<ReportRow> = counts
        .into_iter()
        .map(|(id, count)| ReportRow::new(name_of(id), u64::try_from(count).unwrap_or_default()))
        .collect();
    rank(&mut rows);
    rows
}

async fn district_counts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<ReportRow>> {
    let counts: Vec<(i32, i64)> = active_listings()
        .select_only()
        .column(house::Column::DistrictId)
        .column_as(Expr::col((real_estate::Entity, real_estate::Column::Id)).count(), "count")
        .group_by(house::Column::DistrictId)
        .into_tuple()
        .all(db)
        .await
        .map_err(AppError::from)?;

    let ids: Vec<i32> = counts.iter().map(|(id, _)| *id).collect();
    let names: HashMap<i32, String> = district::Entity::find()
        .filter(district::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    Ok(rows(counts, |id| {
        names.get(&id).cloned().unwrap_or_else(|| format!("District #{}", id))
    }))
}

/// Active interactions grouped by one of their id columns.
async fn interaction_counts<C: ConnectionTrait>(
    db: &C,
    column: interaction::Column,
) -> AppResult<Vec<(i32, i64)>> {
    interaction::Entity::find()
        .filter(interaction::Column::DeletedAt.is_null())
        .select_only()
        .column(column)
        .column_as(Expr::col((interaction::Entity, interaction::Column::Id)).count(), "count")
        .group_by(column)
        .into_tuple()
        .all(db)
        .await
        .map_err(AppError::from)
}

async fn agent_counts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<ReportRow>> {
    let counts = interaction_counts(db, interaction::Column::AgentId).await?;

    let ids: Vec<i32> = counts.iter().map(|(id, _)| *id).collect();
    let names: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|u| {
            let name = format::full_name(&u.last_name, &u.first_name, u.middle_name.as_deref());
            (u.id, name)
        })
        .collect();

    Ok(rows(counts, |id| {
        names.get(&id).cloned().unwrap_or_else(|| format!("Agent #{}", id))
    }))
}

async fn status_counts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<ReportRow>> {
    let counts = interaction_counts(db, interaction::Column::StatusId).await?;

    let ids: Vec<i32> = counts.iter().map(|(id, _)| *id).collect();
    let names: HashMap<i32, String> = interaction_status::Entity::find()
        .filter(interaction_status::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    Ok(rows(counts, |id| {
        names.get(&id).cloned().unwrap_or_else(|| format!("Status #{}", id))
    }))
}

#[async_trait]
impl ReportService for Reports {
    async fn build(&self) -> AppResult<RegistryReport> {
        let db = self.persistence.connection();
        let report = RegistryReport {
            districts: district_counts(db).await?,
            agents: agent_counts(db).await?,
            statuses: status_counts(db).await?,
        };

        tracing::debug!(
            "Report built: {} district(s), {} agent(s), {} status(es)",
            report.districts.len(),
            report.agents.len(),
            report.statuses.len()
        );
        Ok(report)
    }
}
