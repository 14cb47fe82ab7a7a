use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Headlines are capped at the schema's VARCHAR(200).
pub const MAX_HEADLINE_LEN: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub headline: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::keyword::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_keywords::Relation::Keyword.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_keywords::Relation::Post.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(headline) | ActiveValue::Unchanged(headline) = &self.headline {
            if headline.is_empty() {
                return Err(DbErr::Custom(format!(
                    "[before_save] empty headline, insert: {insert}"
                )));
            }
            if headline.chars().count() > MAX_HEADLINE_LEN {
                return Err(DbErr::Custom(format!(
                    "[before_save] headline exceeds {MAX_HEADLINE_LEN} chars, insert: {insert}"
                )));
            }
        }
        Ok(self)
    }
}
