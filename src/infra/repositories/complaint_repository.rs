//! Complaint repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::complaint::{self, ActiveModel, Entity as ComplaintEntity};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::AppResult;
use crate::types::ComplaintFilter;
use domain::Complaint;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Complaint>>;

    /// Matching complaints, newest first
    async fn list(&self, filter: ComplaintFilter) -> AppResult<Vec<Complaint>>;

    async fn count(&self, filter: ComplaintFilter) -> AppResult<u64>;

    async fn insert(&self, complaint: Complaint) -> AppResult<Complaint>;

    async fn update(&self, complaint: Complaint) -> AppResult<Complaint>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64>;

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64>;
}

fn condition_for(filter: &ComplaintFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(tenant_id) = filter.tenant {
        condition = condition.add(complaint::Column::TenantId.eq(tenant_id));
    }
    if let Some(property_id) = filter.property {
        condition = condition.add(complaint::Column::PropertyId.eq(property_id));
    }
    if let Some(room_id) = filter.room {
        condition = condition.add(complaint::Column::RoomId.eq(room_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(complaint::Column::Status.eq(status.as_str()));
    }
    if let Some(category) = filter.category {
        condition = condition.add(complaint::Column::Category.eq(category.as_str()));
    }
    if let Some(priority) = filter.priority {
        condition = condition.add(complaint::Column::Priority.eq(priority.as_str()));
    }
    condition
}

#[async_trait]
impl<H: DbHandle> ComplaintRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Complaint>> {
        ComplaintEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Complaint::try_from)
            .transpose()
    }

    async fn list(&self, filter: ComplaintFilter) -> AppResult<Vec<Complaint>> {
        let models = ComplaintEntity::find()
            .filter(condition_for(&filter))
            .order_by_desc(complaint::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn count(&self, filter: ComplaintFilter) -> AppResult<u64> {
        Ok(ComplaintEntity::find()
            .filter(condition_for(&filter))
            .count(self.conn())
            .await?)
    }

    async fn insert(&self, complaint: Complaint) -> AppResult<Complaint> {
        let model = ActiveModel::try_from(&complaint)?
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Complaint", "Complaint already exists"))?;
        Complaint::try_from(model)
    }

    async fn update(&self, complaint: Complaint) -> AppResult<Complaint> {
        let model = ActiveModel::try_from(&complaint)?
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Complaint", "Complaint already exists"))?;
        Complaint::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ComplaintEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Complaint")
    }

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        let result = ComplaintEntity::delete_many()
            .filter(complaint::Column::TenantId.eq(tenant_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        let result = ComplaintEntity::delete_many()
            .filter(complaint::Column::PropertyId.eq(property_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
