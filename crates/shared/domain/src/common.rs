//! Value objects shared by several entities.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{PHONE_PATTERN, PINCODE_PATTERN};

pub(crate) static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_PATTERN).expect("phone regex is valid"));

pub(crate) static PINCODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PINCODE_PATTERN).expect("pincode regex is valid"));

wire_enum! {
    /// Urgency shared by complaints and notices.
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Priority {
    /// Sort key, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Urgent => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A stored image or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Image {
    /// Public URL of the asset
    #[validate(length(min = 1, max = 2048, message = "Image URL is required"))]
    pub url: String,
    /// Storage key used to delete the asset later
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Caption cannot exceed 200 characters"))]
    pub caption: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Address {
    #[validate(length(min = 1, max = 200, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(regex(path = *PINCODE_REGEX, message = "Pincode must be 6 digits"))]
    #[cfg_attr(feature = "openapi", schema(example = "560034"))]
    pub pincode: String,
    #[serde(default)]
    pub landmark: Option<String>,
}
