//! Payment database entity. The billing month is stored as `YYYY-MM`.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::errors::{AppError, AppResult};
use domain::Payment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    pub month: String,
    pub amount: i64,
    pub late_fee: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub due_date: Date,
    pub payment_date: Option<Date>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: String,
    pub receipt: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Payment {
            id: model.id,
            tenant_id: model.tenant_id,
            property_id: model.property_id,
            room_id: model.room_id,
            month: parse_column(&model.month, "payments.month")?,
            amount: model.amount,
            late_fee: model.late_fee,
            discount: model.discount,
            total_amount: model.total_amount,
            due_date: model.due_date,
            payment_date: model.payment_date,
            payment_method: model
                .payment_method
                .as_deref()
                .map(|raw| parse_column(raw, "payments.payment_method"))
                .transpose()?,
            transaction_id: model.transaction_id,
            status: parse_column(&model.status, "payments.status")?,
            receipt: model.receipt,
            notes: model.notes,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        ActiveModel {
            id: Set(payment.id),
            tenant_id: Set(payment.tenant_id),
            property_id: Set(payment.property_id),
            room_id: Set(payment.room_id),
            month: Set(payment.month.to_string()),
            amount: Set(payment.amount),
            late_fee: Set(payment.late_fee),
            discount: Set(payment.discount),
            total_amount: Set(payment.total_amount),
            due_date: Set(payment.due_date),
            payment_date: Set(payment.payment_date),
            payment_method: Set(payment.payment_method.map(|m| m.as_str().to_string())),
            transaction_id: Set(payment.transaction_id.clone()),
            status: Set(payment.status.as_str().to_string()),
            receipt: Set(payment.receipt.clone()),
            notes: Set(payment.notes.clone()),
            recorded_by: Set(payment.recorded_by),
            created_at: Set(payment.created_at),
            updated_at: Set(payment.updated_at),
        }
    }
}
