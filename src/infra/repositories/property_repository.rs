//! Property repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::{count_to_db, property::{self, ActiveModel, Entity as PropertyEntity}};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::{AppError, AppResult};
use crate::types::PropertyFilter;
use domain::{Property, PropertyCounts};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>>;

    /// Matching properties, newest first
    async fn list(&self, filter: PropertyFilter) -> AppResult<Vec<Property>>;

    async fn insert(&self, property: Property) -> AppResult<Property>;

    async fn update(&self, property: Property) -> AppResult<Property>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Overwrite the derived room counters only
    async fn update_counts(&self, id: Uuid, counts: PropertyCounts) -> AppResult<()>;
}

#[async_trait]
impl<H: DbHandle> PropertyRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        PropertyEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Property::try_from)
            .transpose()
    }

    async fn list(&self, filter: PropertyFilter) -> AppResult<Vec<Property>> {
        let mut condition = Condition::all();
        if let Some(owner) = filter.owner {
            condition = condition.add(property::Column::OwnerId.eq(owner));
        }
        if let Some(status) = filter.status {
            condition = condition.add(property::Column::Status.eq(status.as_str()));
        }
        if let Some(kind) = filter.property_type {
            condition = condition.add(property::Column::PropertyType.eq(kind.as_str()));
        }

        let models = PropertyEntity::find()
            .filter(condition)
            .order_by_desc(property::Column::CreatedAt)
            .all(self.conn())
            .await?;

        // The city lives inside the address JSON and is matched here.
        let mut properties: Vec<Property> = into_domain(models)?;
        properties.retain(|p| filter.matches(p));
        Ok(properties)
    }

    async fn insert(&self, property: Property) -> AppResult<Property> {
        let model = ActiveModel::try_from(&property)?
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Property", "Property already exists"))?;
        Property::try_from(model)
    }

    async fn update(&self, property: Property) -> AppResult<Property> {
        let model = ActiveModel::try_from(&property)?
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Property", "Property already exists"))?;
        Property::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PropertyEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Property")
    }

    async fn update_counts(&self, id: Uuid, counts: PropertyCounts) -> AppResult<()> {
        let result = PropertyEntity::update_many()
            .col_expr(
                property::Column::TotalRooms,
                Expr::value(count_to_db(counts.total_rooms)),
            )
            .col_expr(
                property::Column::OccupiedRooms,
                Expr::value(count_to_db(counts.occupied_rooms)),
            )
            .filter(property::Column::Id.eq(id))
            .exec(self.conn())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Property"));
        }
        Ok(())
    }
}
