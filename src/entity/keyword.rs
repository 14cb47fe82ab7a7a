use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "keywords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub keyword: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_keywords::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_keywords::Relation::Keyword.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(word) | ActiveValue::Unchanged(word) = &self.keyword {
            if word.trim().is_empty() {
                return Err(DbErr::Custom(format!(
                    "[before_save] blank keyword, insert: {insert}"
                )));
            }
        }
        Ok(self)
    }
}
