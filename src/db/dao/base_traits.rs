/// Entities keyed by a single integer column.
pub trait HasIdColumn: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
}
