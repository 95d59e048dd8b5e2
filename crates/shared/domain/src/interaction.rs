//! Client inquiries on listings.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NOTES_LENGTH;
use crate::error::FieldViolation;

/// Interaction as listed for agents, clients and administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionSummary {
    pub id: i32,
    pub client_name: String,
    pub client_phone: String,
    pub agent_name: String,
    pub agent_phone: String,
    pub agent_id: i32,
    pub address: String,
    pub status_id: i32,
    pub status: String,
    pub contacted_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

/// Status change requested by the assigned agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InteractionStatusUpdate {
    pub interaction_id: i32,
    pub status_id: i32,
    pub notes: Option<String>,
}

/// Administrator edit: status, notes and agent reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminInteractionUpdate {
    pub interaction_id: i32,
    pub status_id: i32,
    pub agent_id: i32,
    pub notes: Option<String>,
}

/// Notes longer than the stored limit.
pub fn notes_violation(notes: Option<&str>) -> Option<FieldViolation> {
    notes
        .filter(|n| n.chars().count() > MAX_NOTES_LENGTH)
        .map(|_| {
            FieldViolation::new(
                "notes",
                format!("Notes must be at most {} characters", MAX_NOTES_LENGTH),
            )
        })
}
