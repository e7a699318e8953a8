//! Payment repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::AppResult;
use crate::types::PaymentFilter;
use domain::Payment;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) const DUPLICATE_MONTH: &str = "Payment for this month already exists";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    /// Matching payments, newest first
    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>>;

    /// Insert a payment; a second one for the same tenant and month is a conflict
    async fn insert(&self, payment: Payment) -> AppResult<Payment>;

    async fn update(&self, payment: Payment) -> AppResult<Payment>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64>;

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64>;
}

#[async_trait]
impl<H: DbHandle> PaymentRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        PaymentEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Payment::try_from)
            .transpose()
    }

    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant {
            condition = condition.add(payment::Column::TenantId.eq(tenant_id));
        }
        if let Some(property_id) = filter.property {
            condition = condition.add(payment::Column::PropertyId.eq(property_id));
        }
        if let Some(room_id) = filter.room {
            condition = condition.add(payment::Column::RoomId.eq(room_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(payment::Column::Status.eq(status.as_str()));
        }
        if let Some(month) = filter.month {
            condition = condition.add(payment::Column::Month.eq(month.to_string()));
        }

        let models = PaymentEntity::find()
            .filter(condition)
            .order_by_desc(payment::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn insert(&self, payment: Payment) -> AppResult<Payment> {
        let model = ActiveModel::from(&payment)
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Payment", DUPLICATE_MONTH))?;
        Payment::try_from(model)
    }

    async fn update(&self, payment: Payment) -> AppResult<Payment> {
        let model = ActiveModel::from(&payment)
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Payment", DUPLICATE_MONTH))?;
        Payment::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PaymentEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Payment")
    }

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        let result = PaymentEntity::delete_many()
            .filter(payment::Column::TenantId.eq(tenant_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        let result = PaymentEntity::delete_many()
            .filter(payment::Column::PropertyId.eq(property_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
