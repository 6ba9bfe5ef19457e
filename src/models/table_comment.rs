//! Row comment entity model. Replies point at their parent through `parent_comment_id`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "table_comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub table_id: Uuid,
    pub row_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::table_row::Entity",
        from = "Column::RowId",
        to = "super::table_row::Column::Id",
        on_delete = "Cascade"
    )]
    TableRow,
}

impl Related<super::table_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TableRow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
