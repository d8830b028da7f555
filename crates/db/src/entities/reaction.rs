//! Reaction entity (typed, single-slot-per-user endorsements on posts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The closed set of reaction kinds.
///
/// Kept as a tagged enum rather than a free-form string so invalid kinds are
/// rejected at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionKind {
    #[sea_orm(string_value = "SKILL")]
    Skill,
    #[sea_orm(string_value = "LOGIC")]
    Logic,
    #[sea_orm(string_value = "SCALABLE")]
    Scalable,
    #[sea_orm(string_value = "ROBUST")]
    Robust,
}

impl ReactionKind {
    /// Stable wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skill => "SKILL",
            Self::Logic => "LOGIC",
            Self::Scalable => "SCALABLE",
            Self::Robust => "ROBUST",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The post being reacted to
    #[sea_orm(indexed)]
    pub post_id: String,

    /// The user who reacted (at most one row per (post, user) pair)
    pub user_id: String,

    pub kind: ReactionKind,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
