//! Connection helpers and DDL for the board schema.
//!
//! Tables are created explicitly with the query builder so the cascade rules
//! and the composite key of the association table are visible in one place.
//! `create_all` is idempotent (`IF NOT EXISTS` everywhere).

use sea_orm::sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, Table, TableCreateStatement,
};
use sea_orm::{
    error::*, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbConn, ExecResult,
};

use crate::entity::{address, keyword, post, post_keywords, user};

/// In-memory SQLite, the default backing store.
pub const DEFAULT_DB_URL: &str = "sqlite::memory:";

/// Connect with SQL statement logging enabled at DEBUG level.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    Database::connect(options).await
}

/// Connect to `DATABASE_URL`, falling back to [`DEFAULT_DB_URL`].
pub async fn connect_from_env() -> Result<DatabaseConnection, DbErr> {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_URL.to_owned());
    connect(&url).await
}

async fn create_table(db: &DbConn, stmt: &TableCreateStatement) -> Result<ExecResult, DbErr> {
    let builder = db.get_database_backend();
    db.execute(builder.build(stmt)).await
}

/// Create every table of the schema, in dependency order.
pub async fn create_all(db: &DbConn) -> Result<(), DbErr> {
    create_users_table(db).await?;
    create_addresses_table(db).await?;
    create_posts_table(db).await?;
    create_keywords_table(db).await?;
    create_post_keywords_table(db).await?;
    Ok(())
}

pub async fn create_users_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    create_table(db, &users_table()).await
}

pub async fn create_addresses_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    create_table(db, &addresses_table()).await
}

pub async fn create_posts_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    create_table(db, &posts_table()).await
}

pub async fn create_keywords_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    create_table(db, &keywords_table()).await
}

pub async fn create_post_keywords_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    create_table(db, &post_keywords_table()).await
}

fn users_table() -> TableCreateStatement {
    Table::create()
        .table(user::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(user::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(user::Column::Name).string().not_null())
        .col(ColumnDef::new(user::Column::Password).string().not_null())
        .to_owned()
}

fn addresses_table() -> TableCreateStatement {
    Table::create()
        .table(address::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(address::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(address::Column::Email).string().not_null())
        .col(
            ColumnDef::new(address::Column::UserId)
                .integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-addresses-user_id")
                .from(address::Entity, address::Column::UserId)
                .to(user::Entity, user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn posts_table() -> TableCreateStatement {
    Table::create()
        .table(post::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(post::Column::UserId).integer().not_null())
        .col(
            ColumnDef::new(post::Column::Headline)
                .string_len(200)
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-posts-user_id")
                .from(post::Entity, post::Column::UserId)
                .to(user::Entity, user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn keywords_table() -> TableCreateStatement {
    Table::create()
        .table(keyword::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(keyword::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(keyword::Column::Keyword)
                .string()
                .not_null()
                .unique_key(),
        )
        .to_owned()
}

fn post_keywords_table() -> TableCreateStatement {
    Table::create()
        .table(post_keywords::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post_keywords::Column::PostId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(post_keywords::Column::KeywordId)
                .integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .name("pk-post_keywords")
                .col(post_keywords::Column::PostId)
                .col(post_keywords::Column::KeywordId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_keywords-post_id")
                .from(post_keywords::Entity, post_keywords::Column::PostId)
                .to(post::Entity, post::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_keywords-keyword_id")
                .from(post_keywords::Entity, post_keywords::Column::KeywordId)
                .to(keyword::Entity, keyword::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}
