//! Notice database entity. Read receipts live in a JSON array.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{from_json, parse_column, to_json};
use crate::errors::{AppError, AppResult};
use domain::Notice;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// NULL for global notices
    pub property_id: Option<Uuid>,
    pub created_by: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: String,
    pub priority: String,
    pub target_audience: String,
    pub target_floor: Option<i32>,
    pub valid_from: DateTimeUtc,
    pub valid_till: Option<DateTimeUtc>,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub read_by: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Notice {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Notice {
            id: model.id,
            property_id: model.property_id,
            created_by: model.created_by,
            title: model.title,
            content: model.content,
            category: parse_column(&model.category, "notices.category")?,
            priority: parse_column(&model.priority, "notices.priority")?,
            target_audience: parse_column(&model.target_audience, "notices.target_audience")?,
            target_floor: model.target_floor,
            valid_from: model.valid_from,
            valid_till: model.valid_till,
            status: parse_column(&model.status, "notices.status")?,
            attachments: from_json(model.attachments, "notices.attachments")?,
            read_by: from_json(model.read_by, "notices.read_by")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Notice> for ActiveModel {
    type Error = AppError;

    fn try_from(notice: &Notice) -> AppResult<Self> {
        Ok(ActiveModel {
            id: Set(notice.id),
            property_id: Set(notice.property_id),
            created_by: Set(notice.created_by),
            title: Set(notice.title.clone()),
            content: Set(notice.content.clone()),
            category: Set(notice.category.as_str().to_string()),
            priority: Set(notice.priority.as_str().to_string()),
            target_audience: Set(notice.target_audience.as_str().to_string()),
            target_floor: Set(notice.target_floor),
            valid_from: Set(notice.valid_from),
            valid_till: Set(notice.valid_till),
            status: Set(notice.status.as_str().to_string()),
            attachments: Set(to_json(&notice.attachments)?),
            read_by: Set(to_json(&notice.read_by)?),
            created_at: Set(notice.created_at),
            updated_at: Set(notice.updated_at),
        })
    }
}
