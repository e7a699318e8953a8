//! Notice repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::notice::{self, ActiveModel, Entity as NoticeEntity};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::AppResult;
use crate::types::{NoticeFilter, NoticeScope};
use domain::Notice;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notice>>;

    /// Matching notices within the scope, newest first. The validity window
    /// is not applied here.
    async fn list(&self, filter: NoticeFilter, scope: NoticeScope) -> AppResult<Vec<Notice>>;

    async fn insert(&self, notice: Notice) -> AppResult<Notice>;

    async fn update(&self, notice: Notice) -> AppResult<Notice>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64>;
}

#[async_trait]
impl<H: DbHandle> NoticeRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notice>> {
        NoticeEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Notice::try_from)
            .transpose()
    }

    async fn list(&self, filter: NoticeFilter, scope: NoticeScope) -> AppResult<Vec<Notice>> {
        let mut condition = Condition::all();
        if let Some(property_id) = filter.property {
            condition = condition.add(notice::Column::PropertyId.eq(property_id));
        }
        if let Some(category) = filter.category {
            condition = condition.add(notice::Column::Category.eq(category.as_str()));
        }
        if let Some(priority) = filter.priority {
            condition = condition.add(notice::Column::Priority.eq(priority.as_str()));
        }
        if let NoticeScope::GlobalAnd(property_ids) = scope {
            condition = condition.add(
                Condition::any()
                    .add(notice::Column::PropertyId.is_null())
                    .add(notice::Column::PropertyId.is_in(property_ids)),
            );
        }

        let models = NoticeEntity::find()
            .filter(condition)
            .order_by_desc(notice::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn insert(&self, notice: Notice) -> AppResult<Notice> {
        let model = ActiveModel::try_from(&notice)?
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Notice", "Notice already exists"))?;
        Notice::try_from(model)
    }

    async fn update(&self, notice: Notice) -> AppResult<Notice> {
        let model = ActiveModel::try_from(&notice)?
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Notice", "Notice already exists"))?;
        Notice::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = NoticeEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Notice")
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        let result = NoticeEntity::delete_many()
            .filter(notice::Column::PropertyId.eq(property_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
