//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Default role for self-registered users and the fallback on role removal
pub const ROLE_CLIENT: &str = "client";

/// Listing owner role
pub const ROLE_AGENT: &str = "agent";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// Seeded roles with their display names
pub const SEED_ROLES: &[(&str, &str)] = &[
    (ROLE_CLIENT, "Client"),
    (ROLE_AGENT, "Agent"),
    (ROLE_ADMIN, "Administrator"),
];

/// Seeded interaction statuses, in workflow order
pub const SEED_INTERACTION_STATUSES: &[&str] = &["New", "In progress", "Viewing scheduled", "Closed"];

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length accepted from forms
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// Maximum stored role name length
pub const MAX_ROLE_NAME_LENGTH: usize = 20;

/// Maximum stored role display name length
pub const MAX_ROLE_DISPLAY_NAME_LENGTH: usize = 50;

/// Maximum interaction notes length
pub const MAX_NOTES_LENGTH: usize = 500;

// =============================================================================
// Listing search
// =============================================================================

/// Upper bound for price filters
pub const MAX_PRICE: i64 = 999_999_999;

/// Upper bound for area filters, square meters
pub const MAX_AREA: i64 = 10_000;

/// Upper bound for the rooms filter
pub const MAX_ROOMS: i32 = 50;

/// Default page size for listing search
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u64 = 200;

/// Largest page number a caller may request
pub const MAX_PAGE: u64 = i32::MAX as u64;

// =============================================================================
// Listing editing
// =============================================================================

/// Upper bound for a listing's asking price
pub const MAX_LISTING_PRICE: i64 = 1_000_000_000;

/// Upper bound for floors, both the listing's floor and the house's total
pub const MAX_FLOORS: i32 = 200;

/// Accepted construction years
pub const MIN_BUILDING_YEAR: i32 = 1800;
pub const MAX_BUILDING_YEAR: i32 = 2100;

/// Maximum house number length
pub const MAX_HOUSE_NUMBER_LENGTH: usize = 20;

/// Maximum street name length
pub const MAX_STREET_NAME_LENGTH: usize = 100;

/// Maximum listing description length
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

// =============================================================================
// Interactions
// =============================================================================

/// Row cap for an agent's interaction list
pub const AGENT_INTERACTION_LIMIT: u64 = 200;

/// Row cap for the administrator's interaction list
pub const ADMIN_INTERACTION_LIMIT: u64 = 500;

// =============================================================================
// Time
// =============================================================================

/// Default business time zone offset (Moscow, UTC+3)
pub const DEFAULT_BUSINESS_UTC_OFFSET_HOURS: i32 = 3;

/// Seconds per hour
pub const SECONDS_PER_HOUR: i32 = 3600;
