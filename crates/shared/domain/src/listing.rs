//! Listing search types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PAGE_SIZE, MAX_AREA, MAX_PAGE, MAX_PAGE_SIZE, MAX_PRICE, MAX_ROOMS,
};
use crate::error::FieldViolation;

/// Listing sort order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Area,
    Rooms,
    District,
}

impl From<&str> for SortKey {
    /// Unknown keys sort by price.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "area" => SortKey::Area,
            "rooms" => SortKey::Rooms,
            "district" => SortKey::District,
            _ => SortKey::Price,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            SortKey::Price => "price",
            SortKey::Area => "area",
            SortKey::Rooms => "rooms",
            SortKey::District => "district",
        };
        f.write_str(key)
    }
}

/// Search criteria. Every `None` filter is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    pub district_id: Option<i32>,
    pub type_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_area: Option<Decimal>,
    pub max_area: Option<Decimal>,
    pub rooms: Option<i32>,
    pub has_balcony: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_elevator: Option<bool>,
    pub sort_by: SortKey,
    pub sort_descending: bool,
    /// 1-based
    pub page: u64,
    pub page_size: u64,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            district_id: None,
            type_id: None,
            min_price: None,
            max_price: None,
            min_area: None,
            max_area: None,
            rooms: None,
            has_balcony: None,
            has_parking: None,
            has_elevator: None,
            sort_by: SortKey::Price,
            sort_descending: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingFilter {
    /// Every violated constraint, in field order. Empty means the filter is usable.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        let max_price = Decimal::from(MAX_PRICE);
        let max_area = Decimal::from(MAX_AREA);

        for (field, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = value {
                if value < Decimal::ZERO || value > max_price {
                    violations.push(FieldViolation::new(
                        field,
                        format!("Price must be between 0 and {}", MAX_PRICE),
                    ));
                }
            }
        }

        for (field, value) in [("min_area", self.min_area), ("max_area", self.max_area)] {
            if let Some(value) = value {
                if value < Decimal::ZERO || value > max_area {
                    violations.push(FieldViolation::new(
                        field,
                        format!("Area must be between 0 and {}", MAX_AREA),
                    ));
                }
            }
        }

        if let Some(rooms) = self.rooms {
            if !(0..=MAX_ROOMS).contains(&rooms) {
                violations.push(FieldViolation::new(
                    "rooms",
                    format!("Rooms must be between 0 and {}", MAX_ROOMS),
                ));
            }
        }

        if !(1..=MAX_PAGE).contains(&self.page) {
            violations.push(FieldViolation::new(
                "page",
                format!("Page number must be between 1 and {}", MAX_PAGE),
            ));
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                violations.push(FieldViolation::new(
                    "min_price",
                    "Minimum price cannot exceed maximum price",
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_area, self.max_area) {
            if min > max {
                violations.push(FieldViolation::new(
                    "min_area",
                    "Minimum area cannot exceed maximum area",
                ));
            }
        }

        violations
    }

    /// Page size forced into `1..=200`.
    pub fn effective_page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip for the requested page, `None` when that overflows.
    pub fn offset(&self) -> Option<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.effective_page_size())
    }
}

/// One listing as shown in search results and favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    pub id: i32,
    pub address: String,
    pub district: String,
    pub listing_type: String,
    pub price: Decimal,
    pub rooms: i32,
    pub area: Decimal,
    pub floor: i32,
    pub total_floors: i32,
    pub agent: String,
    pub agent_id: i32,
    pub has_balcony: bool,
    pub has_parking: bool,
    pub has_elevator: bool,
    /// Stored file path of the primary photo
    pub primary_photo: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// One page of results with the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total_count,
            page,
            page_size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}

/// Id/name pair for reference data (districts, types, streets, statuses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupItem {
    pub id: i32,
    pub name: String,
}
