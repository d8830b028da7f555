//! Post entity (a published repository review with its frozen question set).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Owner email (denormalized for feed rendering)
    pub user_email: String,

    /// Repository short name
    pub repo_name: String,

    /// Repository URL
    pub repo_url: String,

    /// Ordered question strings (at most 3 rendered)
    #[sea_orm(column_type = "JsonBinary")]
    pub questions: Json,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The question list, capped at 3 for display even if more were stored.
    #[must_use]
    pub fn question_list(&self) -> Vec<String> {
        serde_json::from_value::<Vec<String>>(self.questions.clone())
            .unwrap_or_default()
            .into_iter()
            .take(3)
            .collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_one = "super::answer::Entity")]
    Answer,

    #[sea_orm(has_many = "super::reaction::Entity")]
    Reactions,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answer.def()
    }
}

impl Related<super::reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactions.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
