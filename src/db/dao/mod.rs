pub mod base;
pub mod base_traits;
pub mod context;
pub mod error;
pub mod todo_dao;

pub use base::{DaoBase, Page};
pub use base_traits::HasIdColumn;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use todo_dao::{TodoDao, TodoFilter};
