use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryOrder, QuerySelect,
    Select,
};

use super::base_traits::HasIdColumn;
use super::error::{DaoLayerError, DaoResult};
use crate::config::defaults;

type DaoModel<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
type DaoActiveModel<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

/// Row level operations shared by every DAO. Rows are always returned in
/// ascending id order.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i32> + Send + Sync,
    Self::Entity: HasIdColumn,
{
    type Entity: EntityTrait + Send + Sync;
    const ENTITY_NAME: &'static str;
    const MAX_PAGE_SIZE: u64 = defaults::MAX_PAGE_SIZE;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: i32) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id,
        }
    }

    async fn insert(
        &self,
        data: impl IntoActiveModel<DaoActiveModel<Self>> + Send,
    ) -> DaoResult<DaoModel<Self>> {
        data.into_active_model()
            .insert(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn select_all(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<DaoModel<Self>>> {
        apply(Self::Entity::find())
            .order_by_asc(Self::Entity::id_column())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn select_page(
        &self,
        page: u64,
        page_size: u64,
        apply: impl Fn(Select<Self::Entity>) -> Select<Self::Entity> + Send + Sync,
    ) -> DaoResult<Page<DaoModel<Self>>> {
        let invalid = DaoLayerError::InvalidPagination { page, page_size };
        if page == 0 || page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(invalid);
        }
        // Stores bind OFFSET as a signed 64-bit integer.
        let offset = (page - 1)
            .checked_mul(page_size)
            .filter(|offset| *offset <= i64::MAX as u64)
            .ok_or(invalid)?;

        let total = self.count_where(&apply).await?;

        let items = apply(Self::Entity::find())
            .order_by_asc(Self::Entity::id_column())
            .limit(page_size)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
            has_next: page.saturating_mul(page_size) < total,
        })
    }

    async fn count_where(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<u64> {
        apply(Self::Entity::find())
            .count(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn select_by_id(&self, id: i32) -> DaoResult<Option<DaoModel<Self>>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: i32) -> DaoResult<DaoModel<Self>> {
        self.select_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Loads the row, lets `apply` stage changes and writes it back. Nothing
    /// is written when `apply` leaves every column untouched. `None` when the
    /// row is missing or vanished before the write.
    async fn update_row(
        &self,
        id: i32,
        apply: impl for<'a> FnOnce(&'a mut DaoActiveModel<Self>) + Send,
    ) -> DaoResult<Option<DaoModel<Self>>> {
        let Some(model) = self.select_by_id(id).await? else {
            return Ok(None);
        };
        let mut active = model.clone().into_active_model();
        apply(&mut active);
        if !active.is_changed() {
            return Ok(Some(model));
        }

        match active.update(self.db()).await {
            Ok(updated) => Ok(Some(updated)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(DaoLayerError::Db(err)),
        }
    }

    /// True when a row was removed.
    async fn delete_row(&self, id: i32) -> DaoResult<bool> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(result.rows_affected > 0)
    }
}
