//! Tenant repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::tenant::{self, ActiveModel, Entity as TenantEntity};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::AppResult;
use crate::types::TenantFilter;
use domain::{Tenant, TenantStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>>;

    /// Matching tenants, newest first
    async fn list(&self, filter: TenantFilter) -> AppResult<Vec<Tenant>>;

    async fn count(&self, filter: TenantFilter) -> AppResult<u64>;

    async fn insert(&self, tenant: Tenant) -> AppResult<Tenant>;

    async fn update(&self, tenant: Tenant) -> AppResult<Tenant>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Tenants still living in the property (any status but inactive)
    async fn count_residents_in_property(&self, property_id: Uuid) -> AppResult<u64>;

    /// Tenants still living in the room (any status but inactive)
    async fn count_residents_in_room(&self, room_id: Uuid) -> AppResult<u64>;

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64>;

    async fn delete_by_room(&self, room_id: Uuid) -> AppResult<u64>;
}

fn condition_for(filter: &TenantFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(property_id) = filter.property {
        condition = condition.add(tenant::Column::PropertyId.eq(property_id));
    }
    if let Some(room_id) = filter.room {
        condition = condition.add(tenant::Column::RoomId.eq(room_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(tenant::Column::Status.eq(status.as_str()));
    }
    if let Some(user_id) = filter.user {
        condition = condition.add(tenant::Column::UserId.eq(user_id));
    }
    condition
}

#[async_trait]
impl<H: DbHandle> TenantRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        TenantEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Tenant::try_from)
            .transpose()
    }

    async fn list(&self, filter: TenantFilter) -> AppResult<Vec<Tenant>> {
        let models = TenantEntity::find()
            .filter(condition_for(&filter))
            .order_by_desc(tenant::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn count(&self, filter: TenantFilter) -> AppResult<u64> {
        Ok(TenantEntity::find()
            .filter(condition_for(&filter))
            .count(self.conn())
            .await?)
    }

    async fn insert(&self, tenant: Tenant) -> AppResult<Tenant> {
        let model = ActiveModel::try_from(&tenant)?
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Tenant", "Tenant already exists"))?;
        Tenant::try_from(model)
    }

    async fn update(&self, tenant: Tenant) -> AppResult<Tenant> {
        let model = ActiveModel::try_from(&tenant)?
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Tenant", "Tenant already exists"))?;
        Tenant::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = TenantEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Tenant")
    }

    async fn count_residents_in_property(&self, property_id: Uuid) -> AppResult<u64> {
        Ok(TenantEntity::find()
            .filter(tenant::Column::PropertyId.eq(property_id))
            .filter(tenant::Column::Status.ne(TenantStatus::Inactive.as_str()))
            .count(self.conn())
            .await?)
    }

    async fn count_residents_in_room(&self, room_id: Uuid) -> AppResult<u64> {
        Ok(TenantEntity::find()
            .filter(tenant::Column::RoomId.eq(room_id))
            .filter(tenant::Column::Status.ne(TenantStatus::Inactive.as_str()))
            .count(self.conn())
            .await?)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        let result = TenantEntity::delete_many()
            .filter(tenant::Column::PropertyId.eq(property_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_room(&self, room_id: Uuid) -> AppResult<u64> {
        let result = TenantEntity::delete_many()
            .filter(tenant::Column::RoomId.eq(room_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
