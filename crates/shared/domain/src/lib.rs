//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the registry's users, roles and listings, the framework-facing identity
//! shapes (principal, app role) and the mapper that derives them.

pub mod clock;
pub mod constants;
pub mod error;
pub mod format;
pub mod identity;
pub mod interaction;
pub mod listing;
pub mod listing_form;
pub mod mapper;
pub mod password;
pub mod report;
pub mod user;

pub use clock::{BusinessClock, Clock, FixedClock};
pub use constants::*;
pub use error::{DomainError, DomainResult, FieldViolation};
pub use identity::{AppRole, IdentityError, IdentityErrorCode, IdentityResult, Principal, Visibility};
pub use interaction::{AdminInteractionUpdate, InteractionStatusUpdate, InteractionSummary};
pub use listing::{ListingFilter, ListingSummary, LookupItem, Page, SortKey};
pub use listing_form::{HouseDetails, ListingDetails, ListingForm, ListingPhoto};
pub use password::Password;
pub use report::{RegistryReport, ReportRow};
pub use user::{Role, User, UserListItem};
