//! Property database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{count_from_db, count_to_db, from_json, parse_column, to_json};
use crate::errors::{AppError, AppResult};
use domain::Property;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub property_type: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub address: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub contact: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub total_rooms: i32,
    pub occupied_rooms: i32,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Property {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Property {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            property_type: parse_column(&model.property_type, "properties.property_type")?,
            address: from_json(model.address, "properties.address")?,
            contact: from_json(model.contact, "properties.contact")?,
            amenities: from_json(model.amenities, "properties.amenities")?,
            description: model.description,
            rules: model.rules,
            images: from_json(model.images, "properties.images")?,
            total_rooms: count_from_db(model.total_rooms),
            occupied_rooms: count_from_db(model.occupied_rooms),
            status: parse_column(&model.status, "properties.status")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Property> for ActiveModel {
    type Error = AppError;

    fn try_from(property: &Property) -> AppResult<Self> {
        Ok(ActiveModel {
            id: Set(property.id),
            owner_id: Set(property.owner_id),
            name: Set(property.name.clone()),
            property_type: Set(property.property_type.as_str().to_string()),
            address: Set(to_json(&property.address)?),
            contact: Set(to_json(&property.contact)?),
            amenities: Set(to_json(&property.amenities)?),
            description: Set(property.description.clone()),
            rules: Set(property.rules.clone()),
            images: Set(to_json(&property.images)?),
            total_rooms: Set(count_to_db(property.total_rooms)),
            occupied_rooms: Set(count_to_db(property.occupied_rooms)),
            status: Set(property.status.as_str().to_string()),
            created_at: Set(property.created_at),
            updated_at: Set(property.updated_at),
        })
    }
}
