//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250801_000001_create_user_table;
mod m20250801_000002_create_login_table;
mod m20250801_000003_create_post_table;
mod m20250801_000004_create_answer_table;
mod m20250801_000005_create_reaction_table;
mod m20250801_000006_create_comment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_user_table::Migration),
            Box::new(m20250801_000002_create_login_table::Migration),
            Box::new(m20250801_000003_create_post_table::Migration),
            Box::new(m20250801_000004_create_answer_table::Migration),
            Box::new(m20250801_000005_create_reaction_table::Migration),
            Box::new(m20250801_000006_create_comment_table::Migration),
        ]
    }
}
