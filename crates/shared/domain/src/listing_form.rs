//! Agent-facing listing input and the full listing view it is edited from.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_AREA, MAX_BUILDING_YEAR, MAX_DESCRIPTION_LENGTH, MAX_FLOORS, MAX_HOUSE_NUMBER_LENGTH,
    MAX_LISTING_PRICE, MAX_ROOMS, MAX_STREET_NAME_LENGTH, MIN_BUILDING_YEAR,
};
use crate::error::FieldViolation;

/// Listing create/edit form. The house is identified by street and number and
/// is created when no active house matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingForm {
    pub district_id: Option<i32>,
    /// Existing street; when absent `new_street_name` is found or created
    pub street_id: Option<i32>,
    pub new_street_name: Option<String>,
    pub house_number: String,
    pub total_floors: i32,
    pub has_parking: bool,
    pub has_elevator: bool,
    pub building_year: Option<i32>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub type_id: Option<i32>,
    pub price: Decimal,
    pub rooms: i32,
    pub area: Decimal,
    pub floor: i32,
    pub has_balcony: bool,
    pub description: Option<String>,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            district_id: None,
            street_id: None,
            new_street_name: None,
            house_number: String::new(),
            total_floors: 5,
            has_parking: false,
            has_elevator: false,
            building_year: None,
            latitude: None,
            longitude: None,
            type_id: None,
            price: Decimal::from(1_000_000),
            rooms: 1,
            area: Decimal::from(30),
            floor: 1,
            has_balcony: false,
            description: None,
        }
    }
}

fn out_of_range<T: PartialOrd>(value: T, min: T, max: T) -> bool {
    value < min || value > max
}

impl ListingForm {
    /// Every violated constraint, in field order.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        let mut violate = |field: &str, message: String| {
            violations.push(FieldViolation::new(field, message));
        };

        if self.district_id.is_none() {
            violate("district_id", "Choose a district".to_string());
        }

        let new_street = self.new_street_name.as_deref().map(str::trim).unwrap_or_default();
        if self.street_id.is_none() && new_street.is_empty() {
            violate("street_id", "Choose a street or add a new one".to_string());
        }
        if new_street.chars().count() > MAX_STREET_NAME_LENGTH {
            violate(
                "new_street_name",
                format!("Street name must be at most {} characters", MAX_STREET_NAME_LENGTH),
            );
        }

        let number = self.house_number.trim();
        if number.is_empty() {
            violate("house_number", "House number is required".to_string());
        } else if number.chars().count() > MAX_HOUSE_NUMBER_LENGTH {
            violate(
                "house_number",
                format!("House number must be at most {} characters", MAX_HOUSE_NUMBER_LENGTH),
            );
        }

        if out_of_range(self.total_floors, 1, MAX_FLOORS) {
            violate(
                "total_floors",
                format!("Total floors must be between 1 and {}", MAX_FLOORS),
            );
        }

        if let Some(year) = self.building_year {
            if out_of_range(year, MIN_BUILDING_YEAR, MAX_BUILDING_YEAR) {
                violate(
                    "building_year",
                    format!(
                        "Building year must be between {} and {}",
                        MIN_BUILDING_YEAR, MAX_BUILDING_YEAR
                    ),
                );
            }
        }

        if let Some(latitude) = self.latitude {
            if out_of_range(latitude, Decimal::from(-90), Decimal::from(90)) {
                violate("latitude", "Latitude must be between -90 and 90".to_string());
            }
        }
        if let Some(longitude) = self.longitude {
            if out_of_range(longitude, Decimal::from(-180), Decimal::from(180)) {
                violate("longitude", "Longitude must be between -180 and 180".to_string());
            }
        }

        if self.type_id.is_none() {
            violate("type_id", "Choose a listing type".to_string());
        }

        if out_of_range(self.price, Decimal::ONE, Decimal::from(MAX_LISTING_PRICE)) {
            violate(
                "price",
                format!("Price must be between 1 and {}", MAX_LISTING_PRICE),
            );
        }

        if out_of_range(self.rooms, 1, MAX_ROOMS) {
            violate("rooms", format!("Rooms must be between 1 and {}", MAX_ROOMS));
        }

        if out_of_range(self.area, Decimal::ONE, Decimal::from(MAX_AREA)) {
            violate("area", format!("Area must be between 1 and {}", MAX_AREA));
        }

        if out_of_range(self.floor, 1, MAX_FLOORS) {
            violate("floor", format!("Floor must be between 1 and {}", MAX_FLOORS));
        } else if self.floor > self.total_floors {
            violate(
                "floor",
                "Floor cannot exceed the number of floors in the house".to_string(),
            );
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                violate(
                    "description",
                    format!("Description must be at most {} characters", MAX_DESCRIPTION_LENGTH),
                );
            }
        }

        violations
    }
}

/// The building a listing sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseDetails {
    pub id: i32,
    pub street_id: i32,
    pub street: String,
    pub district_id: i32,
    pub district: String,
    pub number: String,
    pub total_floors: i32,
    pub has_parking: bool,
    pub has_elevator: bool,
    pub building_year: Option<i32>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingPhoto {
    pub id: i32,
    pub file_path: String,
    pub file_name: String,
    pub is_primary: bool,
}

/// One listing with everything its detail page and edit form show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingDetails {
    pub id: i32,
    pub agent_id: i32,
    pub agent: String,
    pub agent_phone: String,
    pub type_id: i32,
    pub listing_type: String,
    pub address: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub rooms: i32,
    pub area: Decimal,
    pub floor: i32,
    pub has_balcony: bool,
    pub created_at: DateTime<FixedOffset>,
    pub house: HouseDetails,
    /// Active photos, oldest first
    pub photos: Vec<ListingPhoto>,
}

impl From<&ListingDetails> for ListingForm {
    /// Prefill an edit form with the stored values.
    fn from(details: &ListingDetails) -> Self {
        let house = &details.house;
        Self {
            district_id: Some(house.district_id),
            street_id: Some(house.street_id),
            new_street_name: None,
            house_number: house.number.clone(),
            total_floors: house.total_floors,
            has_parking: house.has_parking,
            has_elevator: house.has_elevator,
            building_year: house.building_year,
            latitude: house.latitude,
            longitude: house.longitude,
            type_id: Some(details.type_id),
            price: details.price,
            rooms: details.rooms,
            area: details.area,
            floor: details.floor,
            has_balcony: details.has_balcony,
            description: details.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        ListingForm {
            district_id: Some(1),
            street_id: Some(1),
            house_number: "12".to_string(),
            type_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        assert!(form().violations().is_empty());
    }

    #[test]
    fn test_blank_form_reports_required_fields() {
        let fields: Vec<_> = ListingForm::default()
            .violations()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["district_id", "street_id", "house_number", "type_id"]);
    }

    #[test]
    fn test_new_street_name_satisfies_street() {
        let with_name = ListingForm {
            street_id: None,
            new_street_name: Some("  Sadovaya ".to_string()),
            ..form()
        };
        assert!(with_name.violations().is_empty());

        let blank = ListingForm {
            street_id: None,
            new_street_name: Some("   ".to_string()),
            ..form()
        };
        assert_eq!(blank.violations()[0].field, "street_id");
    }

    #[test]
    fn test_floor_above_house_is_rejected() {
        let high = ListingForm {
            total_floors: 5,
            floor: 6,
            ..form()
        };
        let violations = high.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "floor");
        assert!(violations[0].message.contains("cannot exceed"));
    }

    #[test]
    fn test_ranges() {
        let wild = ListingForm {
            total_floors: 0,
            floor: 0,
            building_year: Some(1700),
            latitude: Some(Decimal::from(91)),
            longitude: Some(Decimal::from(-181)),
            price: Decimal::ZERO,
            rooms: 51,
            area: Decimal::from(10_001),
            description: Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            ..form()
        };
        let fields: Vec<_> = wild.violations().into_iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                "total_floors",
                "building_year",
                "latitude",
                "longitude",
                "price",
                "rooms",
                "area",
                "floor",
                "description"
            ]
        );
    }
}
