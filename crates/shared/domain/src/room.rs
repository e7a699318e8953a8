//! Rooms within a property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::Image;
use crate::error::{DomainError, DomainResult};

wire_enum! {
    RoomType {
        Single => "single",
        Double => "double",
        Triple => "triple",
        Four => "four",
        Dormitory => "dormitory",
    }
}

wire_enum! {
    Furnishing {
        FullyFurnished => "fully-furnished",
        SemiFurnished => "semi-furnished",
        Unfurnished => "unfurnished",
    }
}

impl Default for Furnishing {
    fn default() -> Self {
        Furnishing::Unfurnished
    }
}

wire_enum! {
    RoomStatus {
        Available => "available",
        Occupied => "occupied",
        Maintenance => "maintenance",
        Reserved => "reserved",
    }
}

impl Default for RoomStatus {
    fn default() -> Self {
        RoomStatus::Available
    }
}

impl RoomStatus {
    /// `occupied` is derived from tenants; clients may only pick the others.
    pub fn is_client_settable(&self) -> bool {
        !matches!(self, RoomStatus::Occupied)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct RoomAmenities {
    pub ac: bool,
    pub balcony: bool,
    pub attached_bathroom: bool,
    pub wardrobe: bool,
    pub fan: bool,
    pub light: bool,
    pub bed: bool,
    pub table: bool,
    pub chair: bool,
}

/// A rentable room. `current_occupancy` and the `occupied` status are
/// outputs of the occupancy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Room {
    pub id: Uuid,
    pub property_id: Uuid,
    pub room_number: String,
    pub floor: i32,
    pub room_type: RoomType,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub rent: i64,
    pub security_deposit: i64,
    /// Carpet area in square feet
    pub area: Option<i32>,
    pub furnishing: Furnishing,
    pub amenities: RoomAmenities,
    pub status: RoomStatus,
    pub images: Vec<Image>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Build an empty room from a validated request.
    pub fn create(input: NewRoom, now: DateTime<Utc>) -> DomainResult<Self> {
        let status = input.status.unwrap_or_default();
        if !status.is_client_settable() {
            return Err(DomainError::validation(
                "A new room cannot be created as occupied",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            property_id: input.property_id,
            room_number: input.room_number.trim().to_string(),
            floor: input.floor,
            room_type: input.room_type,
            capacity: input.capacity,
            current_occupancy: 0,
            rent: input.rent,
            security_deposit: input.security_deposit,
            area: input.area,
            furnishing: input.furnishing,
            amenities: input.amenities,
            status,
            images: input.images,
            description: input.description,
            created_at: now,
            updated_at: now,
        })
    }

    /// A room can take a tenant when it has a free bed and is marked available.
    pub fn is_available(&self) -> bool {
        self.current_occupancy < self.capacity && self.status == RoomStatus::Available
    }

    /// Apply client changes.
    ///
    /// # Errors
    /// Rejects `occupied` as a requested status and any capacity below the
    /// current occupancy.
    pub fn apply(&mut self, changes: RoomChanges, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(status) = changes.status {
            if !status.is_client_settable() {
                return Err(DomainError::validation(
                    "Room status 'occupied' is derived from tenants",
                ));
            }
            if self.current_occupancy > 0 && status != RoomStatus::Available {
                return Err(DomainError::validation(format!(
                    "Room has {} active tenant(s) and cannot be marked {}",
                    self.current_occupancy, status
                )));
            }
        }
        if let Some(capacity) = changes.capacity {
            if capacity < self.current_occupancy {
                return Err(DomainError::validation(format!(
                    "Capacity {} is below current occupancy {}",
                    capacity, self.current_occupancy
                )));
            }
            self.capacity = capacity;
        }
        if let Some(room_number) = changes.room_number {
            self.room_number = room_number.trim().to_string();
        }
        if let Some(floor) = changes.floor {
            self.floor = floor;
        }
        if let Some(room_type) = changes.room_type {
            self.room_type = room_type;
        }
        if let Some(rent) = changes.rent {
            self.rent = rent;
        }
        if let Some(deposit) = changes.security_deposit {
            self.security_deposit = deposit;
        }
        if let Some(area) = changes.area {
            self.area = Some(area);
        }
        if let Some(furnishing) = changes.furnishing {
            self.furnishing = furnishing;
        }
        if let Some(amenities) = changes.amenities {
            self.amenities = amenities;
        }
        if let Some(images) = changes.images {
            self.images = images;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        // An occupied room keeps its status; the engine decides.
        if let Some(status) = changes.status {
            if self.status != RoomStatus::Occupied {
                self.status = status;
            }
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Room plus its derived read-time fields.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub is_available: bool,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        Self {
            is_available: room.is_available(),
            room,
        }
    }
}

/// Room creation request
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewRoom {
    pub property_id: Uuid,
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "101"))]
    pub room_number: String,
    #[serde(default)]
    pub floor: i32,
    pub room_type: RoomType,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Security deposit cannot be negative"))]
    pub security_deposit: i64,
    #[validate(range(min = 0, message = "Area cannot be negative"))]
    pub area: Option<i32>,
    #[serde(default)]
    pub furnishing: Furnishing,
    #[serde(default)]
    pub amenities: RoomAmenities,
    pub status: Option<RoomStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<Image>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// Room update request. The owning property and the occupancy are fixed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoomChanges {
    #[validate(length(min = 1, max = 20, message = "Room number must be 1-20 characters"))]
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    pub room_type: Option<RoomType>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<u32>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent: Option<i64>,
    #[validate(range(min = 0, message = "Security deposit cannot be negative"))]
    pub security_deposit: Option<i64>,
    #[validate(range(min = 0, message = "Area cannot be negative"))]
    pub area: Option<i32>,
    pub furnishing: Option<Furnishing>,
    pub amenities: Option<RoomAmenities>,
    pub status: Option<RoomStatus>,
    #[validate(nested)]
    pub images: Option<Vec<Image>>,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_room(capacity: u32) -> NewRoom {
        NewRoom {
            property_id: Uuid::new_v4(),
            room_number: " 101 ".to_string(),
            floor: 1,
            room_type: RoomType::Double,
            capacity,
            rent: 8000,
            security_deposit: 16000,
            area: None,
            furnishing: Furnishing::default(),
            amenities: RoomAmenities::default(),
            status: None,
            images: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn test_create_trims_number_and_starts_available() {
        let room = Room::create(new_room(2), Utc::now()).unwrap();
        assert_eq!(room.room_number, "101");
        assert_eq!(room.current_occupancy, 0);
        assert!(room.is_available());
    }

    #[test]
    fn test_create_rejects_occupied_status() {
        let mut input = new_room(2);
        input.status = Some(RoomStatus::Occupied);
        assert!(Room::create(input, Utc::now()).is_err());
    }

    #[test]
    fn test_capacity_validation() {
        assert!(new_room(0).validate().is_err());
        assert!(new_room(1).validate().is_ok());
    }

    #[test]
    fn test_full_room_is_not_available() {
        let mut room = Room::create(new_room(1), Utc::now()).unwrap();
        room.current_occupancy = 1;
        assert!(!room.is_available());
    }

    #[test]
    fn test_capacity_cannot_drop_below_occupancy() {
        let mut room = Room::create(new_room(3), Utc::now()).unwrap();
        room.current_occupancy = 2;
        room.status = RoomStatus::Occupied;

        let shrink = RoomChanges {
            capacity: Some(1),
            ..Default::default()
        };
        assert!(room.apply(shrink, Utc::now()).is_err());
        assert_eq!(room.capacity, 3);
    }

    #[test]
    fn test_occupied_room_cannot_go_to_maintenance() {
        let mut room = Room::create(new_room(2), Utc::now()).unwrap();
        room.current_occupancy = 1;
        room.status = RoomStatus::Occupied;

        let changes = RoomChanges {
            status: Some(RoomStatus::Maintenance),
            ..Default::default()
        };
        assert!(room.apply(changes, Utc::now()).is_err());
    }

    #[test]
    fn test_empty_room_can_be_reserved() {
        let mut room = Room::create(new_room(2), Utc::now()).unwrap();
        let changes = RoomChanges {
            status: Some(RoomStatus::Reserved),
            ..Default::default()
        };
        room.apply(changes, Utc::now()).unwrap();
        assert_eq!(room.status, RoomStatus::Reserved);
    }

    #[test]
    fn test_occupancy_is_not_a_client_field() {
        let changes: RoomChanges =
            serde_json::from_str(r#"{"rent":9000,"current_occupancy":5}"#).unwrap();
        let mut room = Room::create(new_room(2), Utc::now()).unwrap();
        room.apply(changes, Utc::now()).unwrap();

        assert_eq!(room.rent, 9000);
        assert_eq!(room.current_occupancy, 0);
    }
}
