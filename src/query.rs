//! Read side of the board: lookups, filtered listings, projections,
//! aggregates, raw SQL and the join/eager-load combinations.

use sea_orm::{
    entity::prelude::*,
    sea_query::{self, Alias, Expr},
    Condition, ConnectionTrait, FromQueryResult, JoinType, LoaderTrait, QueryOrder, QuerySelect,
    Statement,
};

use crate::entity::{
    address, keyword, post, post_keywords, user, Address, Keyword, Post, PostKeywords, User,
};
use crate::error::{Error, Result};

pub struct Query;

impl Query {
    /// Look up a member by primary key.
    pub async fn user_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<user::Model>> {
        Ok(User::find_by_id(id).one(db).await?)
    }

    /// Look up the single member with the given name.
    ///
    /// Fails with [`Error::NotFound`] when no member matches and with
    /// [`Error::Ambiguous`] when several do. Fetches at most two rows to
    /// decide which.
    pub async fn user_named<C: ConnectionTrait>(db: &C, name: &str) -> Result<user::Model> {
        let mut users = User::find()
            .filter(user::Column::Name.eq(name))
            .limit(2)
            .all(db)
            .await?;
        match users.len() {
            0 => Err(Error::not_found("user", name)),
            1 => Ok(users.remove(0)),
            _ => Err(Error::ambiguous("user", name)),
        }
    }

    /// All members, ordered by id.
    pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>> {
        Ok(User::find().order_by_asc(user::Column::Id).all(db).await?)
    }

    /// One page of members plus the total number of pages. A zero
    /// `per_page` yields no rows and no pages.
    pub async fn users_page<C: ConnectionTrait>(
        db: &C,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<user::Model>, u64)> {
        if per_page == 0 {
            return Ok((Vec::new(), 0));
        }
        let paginator = User::find()
            .order_by_asc(user::Column::Id)
            .paginate(db, per_page);
        let num_pages = paginator.num_pages().await?;
        let users = paginator.fetch_page(page).await?;
        Ok((users, num_pages))
    }

    /// A window of the member listing, `OFFSET`/`LIMIT` style.
    pub async fn users_sliced<C: ConnectionTrait>(
        db: &C,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?)
    }

    /// Members whose name matches a `LIKE` pattern such as `%ed%`.
    pub async fn search_users<C: ConnectionTrait>(
        db: &C,
        pattern: &str,
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Name.like(pattern))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Members whose name is in the given list.
    pub async fn users_named_any<C: ConnectionTrait>(
        db: &C,
        names: &[&str],
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Name.is_in(names.iter().copied()))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Members matching both names at once. Empty unless `a` equals `b`.
    pub async fn users_named_all_of<C: ConnectionTrait>(
        db: &C,
        a: &str,
        b: &str,
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .filter(
                Condition::all()
                    .add(user::Column::Name.eq(a))
                    .add(user::Column::Name.eq(b)),
            )
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Members matching either name.
    pub async fn users_named_either<C: ConnectionTrait>(
        db: &C,
        a: &str,
        b: &str,
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Name.eq(a))
                    .add(user::Column::Name.eq(b)),
            )
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Just the member names, as a labelled single-column projection.
    pub async fn user_name_labels<C: ConnectionTrait>(db: &C) -> Result<Vec<String>> {
        Ok(User::find()
            .select_only()
            .column_as(user::Column::Name, "name_label")
            .order_by_asc(user::Column::Id)
            .into_tuple::<String>()
            .all(db)
            .await?)
    }

    /// `(id, name)` pairs without materializing full models.
    pub async fn user_id_name_pairs<C: ConnectionTrait>(db: &C) -> Result<Vec<(i32, String)>> {
        Ok(User::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .order_by_asc(user::Column::Id)
            .into_tuple::<(i32, String)>()
            .all(db)
            .await?)
    }

    pub async fn count_users<C: ConnectionTrait>(db: &C) -> Result<u64> {
        Ok(User::find().count(db).await?)
    }

    /// Post count per member, members without posts included with zero.
    pub async fn posts_per_user<C: ConnectionTrait>(db: &C) -> Result<Vec<(String, i64)>> {
        Ok(User::find()
            .select_only()
            .column(user::Column::Name)
            .column_as(post::Column::Id.count(), "post_count")
            .join(JoinType::LeftJoin, user::Relation::Post.def())
            .group_by(user::Column::Id)
            .order_by_asc(user::Column::Id)
            .into_tuple::<(String, i64)>()
            .all(db)
            .await?)
    }

    /// Members below an id threshold with a given name, via raw SQL with
    /// bound parameters.
    pub async fn users_below_id_raw<C: ConnectionTrait>(
        db: &C,
        max_id: i32,
        name: &str,
    ) -> Result<Vec<user::Model>> {
        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"SELECT "id", "name", "password" FROM "users" WHERE "id" < ? AND "name" = ? ORDER BY "id""#,
            [max_id.into(), name.into()],
        );
        Ok(User::find().from_raw_sql(stmt).all(db).await?)
    }

    /// First member by id, selected through a complete raw statement.
    pub async fn first_user_raw<C: ConnectionTrait>(db: &C) -> Result<Option<user::Model>> {
        let stmt = Statement::from_string(
            db.get_database_backend(),
            r#"SELECT "id", "name", "password" FROM "users" ORDER BY "id" LIMIT 1"#,
        );
        Ok(user::Model::find_by_statement(stmt).one(db).await?)
    }

    /// Members holding the given email, through an explicit inner join.
    pub async fn users_with_address_joined<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Vec<user::Model>> {
        Ok(User::find()
            .join(JoinType::InnerJoin, user::Relation::Address.def())
            .filter(address::Column::Email.eq(email))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Every member paired with each of their addresses, one row per pair.
    /// Members without addresses appear once with `None`.
    pub async fn user_and_address_pairs<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(user::Model, Option<address::Model>)>> {
        Ok(User::find()
            .find_also_related(Address)
            .order_by_asc(user::Column::Id)
            .order_by_asc(address::Column::Id)
            .all(db)
            .await?)
    }

    /// Members with all their addresses eagerly loaded in a single join.
    pub async fn users_with_addresses<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(user::Model, Vec<address::Model>)>> {
        Ok(User::find()
            .find_with_related(Address)
            .order_by_asc(address::Column::Id)
            .all(db)
            .await?)
    }

    /// Addresses with their owning member attached, child side outward.
    pub async fn addresses_with_user<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(address::Model, Option<user::Model>)>> {
        Ok(Address::find()
            .find_also_related(User)
            .order_by_asc(address::Column::Id)
            .all(db)
            .await?)
    }

    /// The member holding both emails, by joining the address table twice
    /// under different aliases. Returns `(name, first email, second email)`.
    pub async fn user_with_both_emails<C: ConnectionTrait>(
        db: &C,
        first: &str,
        second: &str,
    ) -> Result<Option<(String, String, String)>> {
        let a1 = Alias::new("a1");
        let a2 = Alias::new("a2");
        Ok(User::find()
            .select_only()
            .column(user::Column::Name)
            .column_as(Expr::col((a1.clone(), address::Column::Email)), "email_a")
            .column_as(Expr::col((a2.clone(), address::Column::Email)), "email_b")
            .join_as(
                JoinType::InnerJoin,
                user::Relation::Address.def(),
                a1.clone(),
            )
            .join_as(
                JoinType::InnerJoin,
                user::Relation::Address.def(),
                a2.clone(),
            )
            .filter(Expr::col((a1, address::Column::Email)).eq(first))
            .filter(Expr::col((a2, address::Column::Email)).eq(second))
            .into_tuple::<(String, String, String)>()
            .one(db)
            .await?)
    }

    /// Members with at least one address, through a correlated `EXISTS`.
    pub async fn users_with_any_address<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>> {
        let addresses = sea_query::Query::select()
            .column(address::Column::Id)
            .from(Address)
            .and_where(
                Expr::col((Address, address::Column::UserId)).equals((User, user::Column::Id)),
            )
            .to_owned();
        Ok(User::find()
            .filter(Expr::exists(addresses))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await?)
    }

    /// Posts carrying the given keyword, joined through the association
    /// table.
    pub async fn posts_tagged<C: ConnectionTrait>(db: &C, word: &str) -> Result<Vec<post::Model>> {
        Ok(Post::find()
            .join(
                JoinType::InnerJoin,
                post_keywords::Relation::Post.def().rev(),
            )
            .join(JoinType::InnerJoin, post_keywords::Relation::Keyword.def())
            .filter(keyword::Column::Keyword.eq(word))
            .order_by_asc(post::Column::Id)
            .all(db)
            .await?)
    }

    /// Posts with their keywords eagerly loaded through the association
    /// table.
    pub async fn posts_with_keywords<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(post::Model, Vec<keyword::Model>)>> {
        Ok(Post::find()
            .find_with_related(Keyword)
            .order_by_asc(keyword::Column::Id)
            .all(db)
            .await?)
    }

    /// Keywords for each given post, batch loaded in two queries.
    pub async fn keywords_per_post<C: ConnectionTrait>(
        db: &C,
        posts: &[post::Model],
    ) -> Result<Vec<Vec<keyword::Model>>> {
        Ok(posts.load_many_to_many(Keyword, PostKeywords, db).await?)
    }

    /// Addresses for each given member, batch loaded in one extra query.
    pub async fn addresses_per_user<C: ConnectionTrait>(
        db: &C,
        users: &[user::Model],
    ) -> Result<Vec<Vec<address::Model>>> {
        Ok(users.load_many(Address, db).await?)
    }

    /// The member who pinned the post.
    pub async fn post_author<C: ConnectionTrait>(
        db: &C,
        post: &post::Model,
    ) -> Result<Option<user::Model>> {
        Ok(post.find_related(User).one(db).await?)
    }
}
