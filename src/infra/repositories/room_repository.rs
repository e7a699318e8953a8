//! Room repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::{count_to_db, parse_column, room::{self, ActiveModel, Entity as RoomEntity}};
use super::sea_store::{expect_deleted, into_domain, write_error, DbHandle, SeaStore};
use crate::errors::{AppError, AppResult};
use crate::types::RoomFilter;
use domain::{Room, RoomOccupancy, RoomStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ROOM_NUMBER_TAKEN: &str = "Room number already exists in this property";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Matching rooms, newest first
    async fn list(&self, filter: RoomFilter) -> AppResult<Vec<Room>>;

    /// Insert a room; a duplicate number within the property is a conflict
    async fn insert(&self, room: Room) -> AppResult<Room>;

    async fn update(&self, room: Room) -> AppResult<Room>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64>;

    /// Overwrite the derived occupancy fields only
    async fn update_occupancy(&self, id: Uuid, occupancy: RoomOccupancy) -> AppResult<()>;

    /// Status of every live room in a property
    async fn statuses_in_property(&self, property_id: Uuid) -> AppResult<Vec<RoomStatus>>;
}

#[async_trait]
impl<H: DbHandle> RoomRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        RoomEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(Room::try_from)
            .transpose()
    }

    async fn list(&self, filter: RoomFilter) -> AppResult<Vec<Room>> {
        let mut condition = Condition::all();
        if let Some(property_id) = filter.property {
            condition = condition.add(room::Column::PropertyId.eq(property_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(room::Column::Status.eq(status.as_str()));
        }
        if let Some(kind) = filter.room_type {
            condition = condition.add(room::Column::RoomType.eq(kind.as_str()));
        }
        if let Some(floor) = filter.floor {
            condition = condition.add(room::Column::Floor.eq(floor));
        }

        let models = RoomEntity::find()
            .filter(condition)
            .order_by_desc(room::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn insert(&self, room: Room) -> AppResult<Room> {
        let model = ActiveModel::try_from(&room)?
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "Room", ROOM_NUMBER_TAKEN))?;
        Room::try_from(model)
    }

    async fn update(&self, room: Room) -> AppResult<Room> {
        let model = ActiveModel::try_from(&room)?
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "Room", ROOM_NUMBER_TAKEN))?;
        Room::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RoomEntity::delete_by_id(id).exec(self.conn()).await?;
        expect_deleted(result.rows_affected, "Room")
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        let result = RoomEntity::delete_many()
            .filter(room::Column::PropertyId.eq(property_id))
            .exec(self.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn update_occupancy(&self, id: Uuid, occupancy: RoomOccupancy) -> AppResult<()> {
        let result = RoomEntity::update_many()
            .col_expr(
                room::Column::CurrentOccupancy,
                Expr::value(count_to_db(occupancy.current_occupancy)),
            )
            .col_expr(room::Column::Status, Expr::value(occupancy.status.as_str()))
            .filter(room::Column::Id.eq(id))
            .exec(self.conn())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Room"));
        }
        Ok(())
    }

    async fn statuses_in_property(&self, property_id: Uuid) -> AppResult<Vec<RoomStatus>> {
        let raw: Vec<String> = RoomEntity::find()
            .select_only()
            .column(room::Column::Status)
            .filter(room::Column::PropertyId.eq(property_id))
            .into_tuple()
            .all(self.conn())
            .await?;

        raw.iter()
            .map(|status| parse_column(status, "rooms.status"))
            .collect()
    }
}
