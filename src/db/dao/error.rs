use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// True when the store could not be reached at all, as opposed to a
    /// statement failing on a live connection.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DaoLayerError::Db(DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
        )
    }
}
