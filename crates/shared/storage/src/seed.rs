//! Reference data every installation needs: the three roles and the
//! interaction statuses. Seeding is idempotent; existing names are kept.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use common::{AppError, AppResult};
use domain::{SEED_INTERACTION_STATUSES, SEED_ROLES};

use crate::entities::{interaction_status, role};

/// Counts of rows created by [`seed_reference_data`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub roles: usize,
    pub statuses: usize,
}

/// Insert missing roles and interaction statuses.
pub async fn seed_reference_data<C: ConnectionTrait>(db: &C) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for (name, display_name) in SEED_ROLES {
        let existing = role::Entity::find()
            .filter(role::Column::Name.eq(*name))
            .count(db)
            .await
            .map_err(AppError::from)?;
        if existing == 0 {
            role::ActiveModel {
                name: Set(name.to_string()),
                display_name: Set(display_name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(AppError::from)?;
            report.roles += 1;
        }
    }

    for name in SEED_INTERACTION_STATUSES {
        let existing = interaction_status::Entity::find()
            .filter(interaction_status::Column::Name.eq(*name))
            .count(db)
            .await
            .map_err(AppError::from)?;
        if existing == 0 {
            interaction_status::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(AppError::from)?;
            report.statuses += 1;
        }
    }

    if report != SeedReport::default() {
        tracing::info!(
            "Seeded {} role(s) and {} interaction status(es)",
            report.roles,
            report.statuses
        );
    }

    Ok(report)
}
