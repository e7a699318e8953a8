//! Room database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{count_from_db, count_to_db, from_json, parse_column, to_json};
use crate::errors::{AppError, AppResult};
use domain::Room;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub room_number: String,
    pub floor: i32,
    pub room_type: String,
    pub capacity: i32,
    pub current_occupancy: i32,
    pub rent: i64,
    pub security_deposit: i64,
    pub area: Option<i32>,
    pub furnishing: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Json,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Room {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Room {
            id: model.id,
            property_id: model.property_id,
            room_number: model.room_number,
            floor: model.floor,
            room_type: parse_column(&model.room_type, "rooms.room_type")?,
            capacity: count_from_db(model.capacity),
            current_occupancy: count_from_db(model.current_occupancy),
            rent: model.rent,
            security_deposit: model.security_deposit,
            area: model.area,
            furnishing: parse_column(&model.furnishing, "rooms.furnishing")?,
            amenities: from_json(model.amenities, "rooms.amenities")?,
            status: parse_column(&model.status, "rooms.status")?,
            images: from_json(model.images, "rooms.images")?,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Room> for ActiveModel {
    type Error = AppError;

    fn try_from(room: &Room) -> AppResult<Self> {
        Ok(ActiveModel {
            id: Set(room.id),
            property_id: Set(room.property_id),
            room_number: Set(room.room_number.clone()),
            floor: Set(room.floor),
            room_type: Set(room.room_type.as_str().to_string()),
            capacity: Set(count_to_db(room.capacity)),
            current_occupancy: Set(count_to_db(room.current_occupancy)),
            rent: Set(room.rent),
            security_deposit: Set(room.security_deposit),
            area: Set(room.area),
            furnishing: Set(room.furnishing.as_str().to_string()),
            amenities: Set(to_json(&room.amenities)?),
            status: Set(room.status.as_str().to_string()),
            images: Set(to_json(&room.images)?),
            description: Set(room.description.clone()),
            created_at: Set(room.created_at),
            updated_at: Set(room.updated_at),
        })
    }
}
