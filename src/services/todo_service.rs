use crate::{
    db::dao::{TodoDao, TodoFilter},
    db::entities::todo,
    error::AppError,
    schema::{PageInfo, TodoCreate, TodoPatch, TodoReplace},
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

/// One page of todos plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPage {
    pub total: u64,
    pub info: PageInfo,
    pub items: Vec<todo::Model>,
}

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn create(&self, input: TodoCreate) -> Result<todo::Model, AppError> {
        let todo = self
            .todo_dao
            .create(&input.title, &input.description, input.completed)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn list(&self, filter: TodoFilter) -> Result<Vec<todo::Model>, AppError> {
        self.todo_dao
            .list(filter)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn list_page(
        &self,
        filter: TodoFilter,
        page: u64,
        page_size: u64,
    ) -> Result<TodoPage, AppError> {
        let page = self
            .todo_dao
            .list_page(filter, page, page_size)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))?;

        Ok(TodoPage {
            total: page.total,
            info: PageInfo {
                page: page.page,
                page_size: page.page_size,
                has_next: page.has_next,
            },
            items: page.items,
        })
    }

    pub async fn get(&self, id: i32) -> Result<todo::Model, AppError> {
        self.todo_dao
            .get(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    pub async fn replace(&self, id: i32, input: TodoReplace) -> Result<todo::Model, AppError> {
        let todo = self
            .todo_dao
            .replace(id, input.title, input.description, input.completed)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        tracing::info!(id, "todo replaced");
        Ok(todo)
    }

    pub async fn patch(&self, id: i32, input: TodoPatch) -> Result<todo::Model, AppError> {
        let TodoPatch {
            title,
            description,
            completed,
        } = input;
        let todo = self
            .todo_dao
            .patch(id, title, description, completed)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        tracing::info!(id, "todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.todo_dao
            .delete(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}

impl CrudService for TodoService {
    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Failed to create todo",
            find_failed: "Failed to load todos",
            update_failed: "Failed to update todo",
            delete_failed: "Failed to delete todo",
            unavailable: "Todo store unavailable",
        }
    }
}
