//! Complaint database entity. The status timeline is a JSON array.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{from_json, parse_column, to_json};
use crate::errors::{AppError, AppResult};
use domain::Complaint;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub assigned_to: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
    pub resolved_at: Option<DateTimeUtc>,
    pub resolved_by: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub timeline: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Complaint {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Complaint {
            id: model.id,
            tenant_id: model.tenant_id,
            property_id: model.property_id,
            room_id: model.room_id,
            title: model.title,
            description: model.description,
            category: parse_column(&model.category, "complaints.category")?,
            priority: parse_column(&model.priority, "complaints.priority")?,
            status: parse_column(&model.status, "complaints.status")?,
            images: from_json(model.images, "complaints.images")?,
            assigned_to: model.assigned_to,
            response: model.response,
            resolved_at: model.resolved_at,
            resolved_by: model.resolved_by,
            timeline: from_json(model.timeline, "complaints.timeline")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Complaint> for ActiveModel {
    type Error = AppError;

    fn try_from(complaint: &Complaint) -> AppResult<Self> {
        Ok(ActiveModel {
            id: Set(complaint.id),
            tenant_id: Set(complaint.tenant_id),
            property_id: Set(complaint.property_id),
            room_id: Set(complaint.room_id),
            title: Set(complaint.title.clone()),
            description: Set(complaint.description.clone()),
            category: Set(complaint.category.as_str().to_string()),
            priority: Set(complaint.priority.as_str().to_string()),
            status: Set(complaint.status.as_str().to_string()),
            images: Set(to_json(&complaint.images)?),
            assigned_to: Set(complaint.assigned_to.clone()),
            response: Set(complaint.response.clone()),
            resolved_at: Set(complaint.resolved_at),
            resolved_by: Set(complaint.resolved_by),
            timeline: Set(to_json(&complaint.timeline)?),
            created_at: Set(complaint.created_at),
            updated_at: Set(complaint.updated_at),
        })
    }
}
