use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{MethodRouter, get},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    db::dao::TodoFilter,
    error::AppError,
    response::ApiResult,
    schema::{
        FieldErrors, ListEnvelope, TodoCreate, TodoPatch, TodoReplace, TodoResponse,
        parse_bool_str,
    },
    services::{ServiceContext, TodoService},
    state::AppState,
};

const MSG_NOT_INTEGER: &str = "A valid integer is required.";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", collection())
        .route("/todos/", collection())
        .route("/todos/{id}", member())
        .route("/todos/{id}/", member())
        .with_state(state)
}

fn collection() -> MethodRouter<Arc<AppState>> {
    get(list_todos).post(create_todo)
}

fn member() -> MethodRouter<Arc<AppState>> {
    get(get_todo)
        .put(replace_todo)
        .patch(patch_todo)
        .delete(delete_todo)
}

/// Raw list query. Values are parsed by hand so bad input is reported per
/// parameter.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub completed: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

struct ListRequest {
    filter: TodoFilter,
    page: Option<(u64, u64)>,
}

impl ListQuery {
    fn parse(self, default_page_size: u64) -> Result<ListRequest, AppError> {
        let mut errors = FieldErrors::new();

        let completed = match self.completed.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = parse_bool_str(raw);
                if parsed.is_none() {
                    errors.add("completed", "Must be a valid boolean.");
                }
                parsed
            }
        };
        let page = parse_integer("page", self.page.as_deref(), &mut errors);
        let page_size = parse_integer("page_size", self.page_size.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let page = match (page, page_size) {
            (None, None) => None,
            (page, page_size) => Some((
                page.unwrap_or(1),
                page_size.unwrap_or(default_page_size),
            )),
        };

        Ok(ListRequest {
            filter: TodoFilter {
                completed,
                search: self.search,
            },
            page,
        })
    }
}

fn parse_integer(
    field: &'static str,
    raw: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, MSG_NOT_INTEGER);
            None
        }
    }
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    let input = TodoCreate::from_json(&payload)?;
    let todo = todo_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListEnvelope<TodoResponse>>> {
    let ListRequest { filter, page } = query.parse(state.config.pagination.default_page_size)?;
    let service = todo_service(&state);

    let envelope = match page {
        None => {
            let todos = service.list(filter).await?;
            ListEnvelope::all(todos.into_iter().map(TodoResponse::from).collect())
        }
        Some((page, page_size)) => {
            let page = service.list_page(filter, page, page_size).await?;
            ListEnvelope::paged(
                page.total,
                page.info,
                page.items.into_iter().map(TodoResponse::from).collect(),
            )
        }
    };
    Ok(Json(envelope))
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = todo_service(&state).get(todo_id(id)?).await?;
    Ok(Json(todo.into()))
}

async fn replace_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<TodoResponse>> {
    let id = todo_id(id)?;
    let service = todo_service(&state);
    service.get(id).await?;
    let input = TodoReplace::from_json(&payload)?;
    let todo = service.replace(id, input).await?;
    Ok(Json(todo.into()))
}

async fn patch_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<TodoResponse>> {
    let id = todo_id(id)?;
    let service = todo_service(&state);
    service.get(id).await?;
    let input = TodoPatch::from_json(&payload)?;
    let todo = service.patch(id, input).await?;
    Ok(Json(todo.into()))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    todo_service(&state).delete(todo_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ids are parsed wider than the column so out-of-range ids read as missing
/// rows instead of malformed paths.
fn todo_id(id: i64) -> Result<i32, AppError> {
    i32::try_from(id).map_err(|_| AppError::not_found(format!("Todo with id {id} not found")))
}

fn todo_service(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
