pub mod context;
pub mod crud_service;
pub mod todo_service;

pub use context::ServiceContext;
pub use todo_service::{TodoPage, TodoService};
