//! Tenant database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{opt_from_json, opt_to_json, parse_column};
use crate::errors::{AppError, AppResult};
use domain::Tenant;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub emergency_contact: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub id_proof: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub occupation: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub permanent_address: Option<Json>,
    pub move_in_date: Date,
    pub move_out_date: Option<Date>,
    pub rent_amount: i64,
    pub security_deposit: i64,
    pub security_deposit_paid: bool,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub notice_period: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub agreement: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Tenant {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Tenant {
            id: model.id,
            user_id: model.user_id,
            property_id: model.property_id,
            room_id: model.room_id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            alternate_phone: model.alternate_phone,
            emergency_contact: opt_from_json(model.emergency_contact, "tenants.emergency_contact")?,
            id_proof: opt_from_json(model.id_proof, "tenants.id_proof")?,
            occupation: opt_from_json(model.occupation, "tenants.occupation")?,
            permanent_address: opt_from_json(model.permanent_address, "tenants.permanent_address")?,
            move_in_date: model.move_in_date,
            move_out_date: model.move_out_date,
            rent_amount: model.rent_amount,
            security_deposit: model.security_deposit,
            security_deposit_paid: model.security_deposit_paid,
            status: parse_column(&model.status, "tenants.status")?,
            notice_period: opt_from_json(model.notice_period, "tenants.notice_period")?,
            agreement: opt_from_json(model.agreement, "tenants.agreement")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<&Tenant> for ActiveModel {
    type Error = AppError;

    fn try_from(tenant: &Tenant) -> AppResult<Self> {
        Ok(ActiveModel {
            id: Set(tenant.id),
            user_id: Set(tenant.user_id),
            property_id: Set(tenant.property_id),
            room_id: Set(tenant.room_id),
            full_name: Set(tenant.full_name.clone()),
            email: Set(tenant.email.clone()),
            phone: Set(tenant.phone.clone()),
            alternate_phone: Set(tenant.alternate_phone.clone()),
            emergency_contact: Set(opt_to_json(&tenant.emergency_contact)?),
            id_proof: Set(opt_to_json(&tenant.id_proof)?),
            occupation: Set(opt_to_json(&tenant.occupation)?),
            permanent_address: Set(opt_to_json(&tenant.permanent_address)?),
            move_in_date: Set(tenant.move_in_date),
            move_out_date: Set(tenant.move_out_date),
            rent_amount: Set(tenant.rent_amount),
            security_deposit: Set(tenant.security_deposit),
            security_deposit_paid: Set(tenant.security_deposit_paid),
            status: Set(tenant.status.as_str().to_string()),
            notice_period: Set(opt_to_json(&tenant.notice_period)?),
            agreement: Set(opt_to_json(&tenant.agreement)?),
            created_at: Set(tenant.created_at),
            updated_at: Set(tenant.updated_at),
        })
    }
}
