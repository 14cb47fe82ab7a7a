//! Write side of the board: member accounts, contact addresses, posts and
//! keyword tagging.
//!
//! Every function takes any connection-like handle, so the same operation
//! works on the pool or inside an open transaction. Multi-statement
//! operations open their own transaction and roll back wholesale on error.

use sea_orm::{entity::prelude::*, ConnectionTrait, IntoActiveModel, Set, TransactionTrait};

use crate::entity::{
    address, keyword, post, post_keywords, user, Address, Keyword, Post, PostKeywords, User,
};
use crate::error::{Error, Result};

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C>(db: &C, name: &str, password: &str) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let user = user::ActiveModel {
            name: Set(name.to_owned()),
            password: Set(password.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(user)
    }

    /// Batch insert; returns the number of members created.
    pub async fn create_users<C>(db: &C, members: &[(&str, &str)]) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        if members.is_empty() {
            return Ok(0);
        }
        let models = members.iter().map(|(name, password)| user::ActiveModel {
            name: Set((*name).to_owned()),
            password: Set((*password).to_owned()),
            ..Default::default()
        });
        let rows = User::insert_many(models).exec_without_returning(db).await?;
        Ok(rows)
    }

    pub async fn update_password<C>(db: &C, user_id: i32, new_password: &str) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let user = User::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("user", format!("id {user_id}")))?;
        let mut user = user.into_active_model();
        user.password = Set(new_password.to_owned());
        Ok(user.update(db).await?)
    }

    pub async fn rename_user<C>(db: &C, user_id: i32, new_name: &str) -> Result<user::Model>
    where
        C: ConnectionTrait,
    {
        let user = User::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("user", format!("id {user_id}")))?;
        let mut user = user.into_active_model();
        user.name = Set(new_name.to_owned());
        Ok(user.update(db).await?)
    }

    /// Delete a member. Their addresses, posts and post tags go with them;
    /// the keyword vocabulary stays.
    pub async fn delete_user<C>(db: &C, user_id: i32) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let user = User::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("user", format!("id {user_id}")))?;
        user.delete(db).await?;
        Ok(())
    }

    pub async fn add_address<C>(db: &C, user_id: i32, email: &str) -> Result<address::Model>
    where
        C: ConnectionTrait,
    {
        let added = address::ActiveModel {
            email: Set(email.to_owned()),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(added)
    }

    pub async fn remove_address<C>(db: &C, address_id: i32) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let address = Address::find_by_id(address_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("address", format!("id {address_id}")))?;
        address.delete(db).await?;
        Ok(())
    }

    /// Create a member together with their contact addresses in one
    /// transaction. One bad email means no member at all.
    pub async fn register_member<C>(
        db: &C,
        name: &str,
        password: &str,
        emails: &[&str],
    ) -> Result<(user::Model, Vec<address::Model>)>
    where
        C: TransactionTrait,
    {
        let name = name.to_owned();
        let password = password.to_owned();
        let emails: Vec<String> = emails.iter().map(|email| (*email).to_owned()).collect();
        db.transaction::<_, (user::Model, Vec<address::Model>), Error>(|txn| {
            Box::pin(async move {
                let user = Mutation::create_user(txn, &name, &password).await?;
                let mut addresses = Vec::with_capacity(emails.len());
                for email in &emails {
                    addresses.push(Mutation::add_address(txn, user.id, email).await?);
                }
                Ok((user, addresses))
            })
        })
        .await
        .map_err(Error::from)
    }

    /// Pin a post for a member and tag it, creating missing keywords. All or
    /// nothing.
    pub async fn create_post<C>(
        db: &C,
        user_id: i32,
        headline: &str,
        keywords: &[&str],
    ) -> Result<post::Model>
    where
        C: TransactionTrait,
    {
        let headline = headline.to_owned();
        let keywords: Vec<String> = keywords.iter().map(|word| (*word).to_owned()).collect();
        db.transaction::<_, post::Model, Error>(|txn| {
            Box::pin(async move {
                let post = post::ActiveModel {
                    user_id: Set(user_id),
                    headline: Set(headline),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                for word in &keywords {
                    Mutation::tag_post(txn, post.id, word).await?;
                }
                Ok(post)
            })
        })
        .await
        .map_err(Error::from)
    }

    pub async fn delete_post<C>(db: &C, post_id: i32) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let post = Post::find_by_id(post_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("post", format!("id {post_id}")))?;
        post.delete(db).await?;
        Ok(())
    }

    /// Look a keyword up by its text, creating it on first use. The
    /// vocabulary is shared between posts, one row per distinct keyword.
    pub async fn find_or_create_keyword<C>(db: &C, word: &str) -> Result<keyword::Model>
    where
        C: ConnectionTrait,
    {
        if let Some(existing) = Keyword::find()
            .filter(keyword::Column::Keyword.eq(word))
            .one(db)
            .await?
        {
            return Ok(existing);
        }
        let created = keyword::ActiveModel {
            keyword: Set(word.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(created)
    }

    /// Attach a keyword to a post; linking twice is a no-op.
    pub async fn tag_post<C>(db: &C, post_id: i32, word: &str) -> Result<keyword::Model>
    where
        C: ConnectionTrait,
    {
        let keyword = Self::find_or_create_keyword(db, word).await?;
        let linked = PostKeywords::find_by_id((post_id, keyword.id))
            .one(db)
            .await?;
        if linked.is_none() {
            post_keywords::ActiveModel {
                post_id: Set(post_id),
                keyword_id: Set(keyword.id),
            }
            .insert(db)
            .await?;
        }
        Ok(keyword)
    }

    /// Detach a keyword from a post; the keyword row itself survives.
    pub async fn untag_post<C>(db: &C, post_id: i32, word: &str) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let keyword = Keyword::find()
            .filter(keyword::Column::Keyword.eq(word))
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("keyword", format!("{word:?}")))?;
        let res = PostKeywords::delete_by_id((post_id, keyword.id))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(Error::not_found(
                "tag",
                format!("{word:?} on post {post_id}"),
            ));
        }
        Ok(())
    }
}
