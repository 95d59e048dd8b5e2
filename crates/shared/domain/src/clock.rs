//! Business clock.
//!
//! Audit timestamps (`created_at`, `updated_at`, `deleted_at`) are taken in the
//! registry's business time zone, a fixed UTC offset, never the host's local time.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::constants::{DEFAULT_BUSINESS_UTC_OFFSET_HOURS, SECONDS_PER_HOUR};
use crate::error::{DomainError, DomainResult};

/// Source of "now" for audit timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock shifted into a fixed business offset.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build a clock from a whole-hour offset such as `3` for UTC+3.
    pub fn from_offset_hours(hours: i32) -> DomainResult<Self> {
        let offset = hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| DomainError::validation(format!("Invalid UTC offset: {} hours", hours)))?;
        Ok(Self::new(offset))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_BUSINESS_UTC_OFFSET_HOURS * SECONDS_PER_HOUR)
            .unwrap_or_else(|| Utc.fix());
        Self::new(offset)
    }
}

impl Clock for BusinessClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock frozen at one instant, for deterministic timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
