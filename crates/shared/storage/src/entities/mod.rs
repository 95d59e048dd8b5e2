//! SeaORM entities, one module per table.

pub mod district;
pub mod house;
pub mod interaction;
pub mod interaction_status;
pub mod real_estate;
pub mod real_estate_photo;
pub mod real_estate_type;
pub mod role;
pub mod street;
pub mod user;
