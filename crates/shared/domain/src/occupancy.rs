//! Pure occupancy derivations.
//!
//! Room occupancy and property room counts are never authoritative on their
//! own; they are re-derived from the live child records with these functions.

use crate::error::{DomainError, DomainResult};
use crate::room::RoomStatus;

/// Derived occupancy state of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub current_occupancy: u32,
    pub status: RoomStatus,
}

impl RoomOccupancy {
    /// Derive the room state from its number of active tenants.
    ///
    /// Any active tenant makes the room `occupied`. An `occupied` room that
    /// has emptied becomes `available`; `maintenance` and `reserved` survive
    /// while the room is empty.
    pub fn settle(current: RoomStatus, active_tenants: u32) -> Self {
        let status = if active_tenants > 0 {
            RoomStatus::Occupied
        } else if current == RoomStatus::Occupied {
            RoomStatus::Available
        } else {
            current
        };

        Self {
            current_occupancy: active_tenants,
            status,
        }
    }
}

/// Derived room counts of one property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyCounts {
    pub total_rooms: u32,
    pub occupied_rooms: u32,
}

impl PropertyCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = RoomStatus>,
    {
        statuses
            .into_iter()
            .fold(PropertyCounts::default(), |mut counts, status| {
                counts.total_rooms += 1;
                if status == RoomStatus::Occupied {
                    counts.occupied_rooms += 1;
                }
                counts
            })
    }
}

/// Check that one more tenant fits in a room.
pub fn ensure_vacancy(room_number: &str, capacity: u32, active_tenants: u32) -> DomainResult<()> {
    if active_tenants >= capacity {
        return Err(DomainError::conflict(format!(
            "Room {} is full ({}/{})",
            room_number, active_tenants, capacity
        )));
    }
    Ok(())
}
