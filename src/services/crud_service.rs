use crate::db::dao::DaoLayerError;
use crate::error::AppError;

#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
    pub unavailable: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
            unavailable: "Storage unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

impl CrudOp {
    fn as_str(self) -> &'static str {
        match self {
            CrudOp::Create => "create",
            CrudOp::Find => "find",
            CrudOp::List => "list",
            CrudOp::Update => "update",
            CrudOp::Delete => "delete",
        }
    }
}

/// Translates DAO failures into client facing errors. Store details are
/// logged here and never reach the response body.
pub trait CrudService {
    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(_) if err.is_unavailable() => {
                tracing::error!(op = op.as_str(), error = %err, "store unavailable");
                AppError::store_unavailable(errors.unavailable)
            }
            DaoLayerError::Db(_) => {
                tracing::error!(op = op.as_str(), error = %err, "store operation failed");
                let message = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                AppError::internal(message)
            }
        }
    }
}
