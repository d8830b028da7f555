//! Answer entity.
//!
//! `post_id` is the primary key, so the answer set is write-once by
//! construction: a second insert for the same post fails with a unique
//! violation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "answer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: String,

    /// Ordered answer strings, positionally aligned with the post's questions
    #[sea_orm(column_type = "JsonBinary")]
    pub answers: Json,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The answer list, capped at 3 for display.
    #[must_use]
    pub fn answer_list(&self) -> Vec<String> {
        serde_json::from_value::<Vec<String>>(self.answers.clone())
            .unwrap_or_default()
            .into_iter()
            .take(3)
            .collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
