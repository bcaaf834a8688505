use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, QueryFilter, Select, Set};

use super::{DaoBase, DaoResult, Page};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;

const LIKE_ESCAPE: char = '\\';

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;
    const ENTITY_NAME: &'static str = "Todo";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Narrows list queries. Empty filters match every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    /// Substring looked up in title or description.
    pub search: Option<String>,
}

impl TodoFilter {
    fn apply(&self, query: Select<Todo>) -> Select<Todo> {
        let query = match self.completed {
            Some(completed) => query.filter(todo::Column::Completed.eq(completed)),
            None => query,
        };

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", escape_like(term));
                query.filter(
                    Condition::any()
                        .add(
                            Expr::col(todo::Column::Title)
                                .like(LikeExpr::new(&pattern).escape(LIKE_ESCAPE)),
                        )
                        .add(
                            Expr::col(todo::Column::Description)
                                .like(LikeExpr::new(&pattern).escape(LIKE_ESCAPE)),
                        ),
                )
            }
            _ => query,
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if ch == LIKE_ESCAPE || ch == '%' || ch == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

impl TodoDao {
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        completed: bool,
    ) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            completed: Set(completed),
            ..Default::default()
        };
        self.insert(model).await
    }

    pub async fn list(&self, filter: TodoFilter) -> DaoResult<Vec<todo::Model>> {
        self.select_all(move |query| filter.apply(query)).await
    }

    pub async fn list_page(
        &self,
        filter: TodoFilter,
        page: u64,
        page_size: u64,
    ) -> DaoResult<Page<todo::Model>> {
        self.select_page(page, page_size, move |query| filter.apply(query))
            .await
    }

    pub async fn get(&self, id: i32) -> DaoResult<todo::Model> {
        self.find_by_id(id).await
    }

    pub async fn replace(
        &self,
        id: i32,
        title: String,
        description: String,
        completed: bool,
    ) -> DaoResult<todo::Model> {
        self.update_row(id, move |active| {
            active.title = Set(title);
            active.description = Set(description);
            active.completed = Set(completed);
        })
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn patch(
        &self,
        id: i32,
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> DaoResult<todo::Model> {
        self.update_row(id, move |active| {
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(description) = description {
                active.description = Set(description);
            }
            if let Some(completed) = completed {
                active.completed = Set(completed);
            }
        })
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: i32) -> DaoResult<()> {
        if !self.delete_row(id).await? {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::{TodoDao, TodoFilter, escape_like};
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::todo;

    fn row(id: i32, title: &str, completed: bool) -> todo::Model {
        todo::Model {
            id,
            title: title.to_string(),
            description: String::new(),
            completed,
        }
    }

    #[tokio::test]
    async fn create_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "Buy milk", false)]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let created = dao
            .create("Buy milk", "", false)
            .await
            .expect("insert should succeed");

        assert_eq!(created.id, 1);
        assert_eq!(created.title, "Buy milk");
    }

    #[tokio::test]
    async fn get_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.get(9).await.expect_err("lookup should fail");

        assert!(matches!(
            err,
            DaoLayerError::NotFound {
                entity: "Todo",
                id: 9
            }
        ));
    }

    #[tokio::test]
    async fn empty_patch_skips_the_write() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(3, "Walk dog", true)]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let unchanged = dao
            .patch(3, None, None, None)
            .await
            .expect("patch should succeed");
        drop(dao);

        assert_eq!(unchanged, row(3, "Walk dog", true));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.delete(4).await.expect_err("delete should fail");

        assert_eq!(err.to_string(), "Todo with id 4 not found");
    }

    #[tokio::test]
    async fn rejects_out_of_range_pagination_without_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = TodoDao::new(&db);

        for (page, page_size) in [
            (0, 10),
            (1, 0),
            (1, TodoDao::MAX_PAGE_SIZE + 1),
            (u64::MAX, 2),
            (i64::MAX as u64 / 10 + 2, 10),
        ] {
            let err = dao
                .list_page(TodoFilter::default(), page, page_size)
                .await
                .expect_err("pagination should be rejected");
            assert!(matches!(err, DaoLayerError::InvalidPagination { .. }));
        }
    }

    #[tokio::test]
    async fn search_filters_title_or_description_with_escaped_like() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(2, "50% off", false)]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let rows = dao
            .list(TodoFilter {
                completed: Some(false),
                search: Some("50%".to_string()),
            })
            .await
            .expect("list should succeed");
        drop(dao);

        assert_eq!(rows.len(), 1);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("LIKE"));
        assert!(log.contains("ESCAPE"));
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
