//! Property aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Address, Image, PHONE_REGEX};

wire_enum! {
    /// Who the property accepts.
    PropertyType {
        Boys => "boys",
        Girls => "girls",
        CoLiving => "co-living",
    }
}

wire_enum! {
    PropertyStatus {
        Active => "active",
        Inactive => "inactive",
        Maintenance => "maintenance",
    }
}

impl Default for PropertyStatus {
    fn default() -> Self {
        PropertyStatus::Active
    }
}

/// Person to reach about the property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contact {
    #[validate(length(min = 1, max = 100, message = "Contact person is required"))]
    pub person_name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 10 digits"))]
    #[cfg_attr(feature = "openapi", schema(example = "9876543210"))]
    pub phone: String,
    #[serde(default)]
    #[validate(email(message = "Invalid contact email"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct PropertyAmenities {
    pub wifi: bool,
    pub ac: bool,
    pub parking: bool,
    pub laundry: bool,
    pub meals: bool,
    pub gym: bool,
    pub power_backup: bool,
    pub cctv: bool,
    pub refrigerator: bool,
    pub tv: bool,
}

/// A PG building managed by one owner.
///
/// `total_rooms` and `occupied_rooms` are maintained by the occupancy
/// engine from the live room set and are never accepted from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub property_type: PropertyType,
    pub address: Address,
    pub contact: Contact,
    pub amenities: PropertyAmenities,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub images: Vec<Image>,
    pub total_rooms: u32,
    pub occupied_rooms: u32,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Build a property from a validated request, owned by `owner_id`.
    pub fn create(owner_id: Uuid, input: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: input.name.trim().to_string(),
            property_type: input.property_type,
            address: input.address,
            contact: input.contact,
            amenities: input.amenities,
            description: input.description,
            rules: input.rules,
            images: Vec::new(),
            total_rooms: 0,
            occupied_rooms: 0,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn available_rooms(&self) -> u32 {
        self.total_rooms.saturating_sub(self.occupied_rooms)
    }

    /// Occupied share of rooms as a rounded percentage, 0 without rooms.
    pub fn occupancy_percentage(&self) -> u32 {
        if self.total_rooms == 0 {
            return 0;
        }
        (f64::from(self.occupied_rooms) / f64::from(self.total_rooms) * 100.0).round() as u32
    }

    /// Apply client changes. Aggregate counters are not part of the change set.
    pub fn apply(&mut self, changes: PropertyChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(property_type) = changes.property_type {
            self.property_type = property_type;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(contact) = changes.contact {
            self.contact = contact;
        }
        if let Some(amenities) = changes.amenities {
            self.amenities = amenities;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(rules) = changes.rules {
            self.rules = Some(rules);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

/// Property plus its derived read-time fields.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub available_rooms: u32,
    pub occupancy_percentage: u32,
}

impl From<Property> for PropertyView {
    fn from(property: Property) -> Self {
        Self {
            available_rooms: property.available_rooms(),
            occupancy_percentage: property.occupancy_percentage(),
            property,
        }
    }
}

/// Property creation request
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewProperty {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Sunrise PG"))]
    pub name: String,
    pub property_type: PropertyType,
    #[validate(nested)]
    pub address: Address,
    #[validate(nested)]
    pub contact: Contact,
    #[serde(default)]
    pub amenities: PropertyAmenities,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 1000, message = "Rules cannot exceed 1000 characters"))]
    pub rules: Option<String>,
    pub status: Option<PropertyStatus>,
}

/// Property update request. Room counters are intentionally absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PropertyChanges {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub property_type: Option<PropertyType>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(nested)]
    pub contact: Option<Contact>,
    pub amenities: Option<PropertyAmenities>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 1000, message = "Rules cannot exceed 1000 characters"))]
    pub rules: Option<String>,
    pub status: Option<PropertyStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_property() -> NewProperty {
        NewProperty {
            name: "  Sunrise PG ".to_string(),
            property_type: PropertyType::CoLiving,
            address: Address {
                street: "4th Cross, Koramangala".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560034".to_string(),
                landmark: None,
            },
            contact: Contact {
                person_name: "Ravi".to_string(),
                phone: "9876543210".to_string(),
                email: None,
            },
            amenities: PropertyAmenities::default(),
            description: None,
            rules: None,
            status: None,
        }
    }

    #[test]
    fn test_create_starts_empty() {
        let owner = Uuid::new_v4();
        let property = Property::create(owner, new_property(), Utc::now());

        assert_eq!(property.owner_id, owner);
        assert_eq!(property.name, "Sunrise PG");
        assert_eq!(property.total_rooms, 0);
        assert_eq!(property.status, PropertyStatus::Active);
    }

    #[test]
    fn test_derived_room_counts() {
        let mut property = Property::create(Uuid::new_v4(), new_property(), Utc::now());
        assert_eq!(property.occupancy_percentage(), 0);

        property.total_rooms = 3;
        property.occupied_rooms = 2;
        assert_eq!(property.available_rooms(), 1);
        assert_eq!(property.occupancy_percentage(), 67);
    }

    #[test]
    fn test_property_type_wire_format() {
        assert_eq!("co-living".parse::<PropertyType>().unwrap(), PropertyType::CoLiving);
        assert_eq!(
            serde_json::to_string(&PropertyType::CoLiving).unwrap(),
            "\"co-living\""
        );
    }

    #[test]
    fn test_contact_phone_validation() {
        let mut input = new_property();
        assert!(input.validate().is_ok());

        input.contact.phone = "12345".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_counters_are_not_client_fields() {
        let changes: PropertyChanges = serde_json::from_str(
            r#"{"name":"Renamed","total_rooms":99,"occupied_rooms":42}"#,
        )
        .unwrap();
        let mut property = Property::create(Uuid::new_v4(), new_property(), Utc::now());
        property.apply(changes, Utc::now());

        assert_eq!(property.name, "Renamed");
        assert_eq!(property.total_rooms, 0);
        assert_eq!(property.occupied_rooms, 0);
    }
}
