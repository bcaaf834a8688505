use sea_orm::entity::prelude::*;

use crate::db::dao::HasIdColumn;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(default_value = false)]
    pub completed: bool,
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdColumn for Entity {
    fn id_column() -> Self::Column {
        Column::Id
    }
}
