//! Top-to-bottom walkthrough of the board: seeds members, revises and
//! rolls back, runs the query catalog, pins and tags posts, then retires
//! a member and shows the cascade. Every SQL statement is logged at
//! DEBUG through the connection's statement logging.

use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

use corkboard::{connect_from_env, create_all, Error, Mutation, Query};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = connect_from_env().await?;
    create_all(&db).await?;
    tracing::info!("schema ready");

    println!("===== seed members =====\n");
    seed_members(&db).await?;

    println!("\n===== revise and roll back =====\n");
    revise_and_roll_back(&db).await?;

    println!("\n===== query catalog =====\n");
    query_catalog(&db).await?;

    println!("\n===== addresses and joins =====\n");
    addresses_and_joins(&db).await?;

    println!("\n===== posts and tags =====\n");
    posts_and_tags(&db).await?;

    println!("\n===== retire a member =====\n");
    retire_member(&db).await?;

    let digest = json!({
        "members": Query::users_with_addresses(&db).await?,
        "posts": Query::posts_with_keywords(&db).await?,
    });
    println!("\n{digest:#}");

    Ok(())
}

async fn seed_members(db: &DatabaseConnection) -> Result<(), Error> {
    let ed = Mutation::create_user(db, "ed", "edspassword").await?;
    println!("first member in: {ed:?}");

    let added =
        Mutation::create_users(db, &[("wendy", "foobar"), ("mary", "xxg527"), ("fred", "blah")])
            .await?;
    println!("batch insert added {added} members");

    // the change set knows it is dirty before anything is sent
    let mut draft = ed.clone().into_active_model();
    draft.password = Set("f8s7ccs".to_owned());
    println!("draft password change pending: {}", draft.is_changed());

    let ed = Mutation::update_password(db, ed.id, "f8s7ccs").await?;
    println!("password rotated for {}", ed.name);
    Ok(())
}

async fn revise_and_roll_back(db: &DatabaseConnection) -> Result<(), Error> {
    let ed = Query::user_named(db, "ed").await?;

    let txn = db.begin().await?;
    Mutation::create_user(&txn, "ed", "shadow").await?;
    match Query::user_named(&txn, "ed").await {
        Err(err) => println!("two eds now, lookup refuses to pick: {err}"),
        Ok(user) => println!("unexpectedly picked {user:?}"),
    }
    Mutation::rename_user(&txn, ed.id, "Edwardo").await?;
    let phantom = Mutation::create_user(&txn, "fakeuser", "12345").await?;
    println!("inside the transaction: {:?}", Query::list_users(&txn).await?);
    txn.rollback().await?;

    println!("after rollback: {:?}", Query::list_users(db).await?);
    println!(
        "phantom member gone: {:?}",
        Query::user_by_id(db, phantom.id).await?
    );
    Ok(())
}

async fn query_catalog(db: &DatabaseConnection) -> Result<(), Error> {
    println!("everyone: {:?}", Query::list_users(db).await?);

    let (page, pages) = Query::users_page(db, 0, 2).await?;
    println!("page 1 of {pages}: {page:?}");
    println!("slice [1..3]: {:?}", Query::users_sliced(db, 1, 2).await?);

    println!(
        "names ending in ed: {:?}",
        Query::search_users(db, "%ed").await?
    );
    println!(
        "ed or wendy by list: {:?}",
        Query::users_named_any(db, &["ed", "wendy"]).await?
    );
    println!(
        "both names at once: {:?}",
        Query::users_named_all_of(db, "ed", "wendy").await?
    );
    println!(
        "either name: {:?}",
        Query::users_named_either(db, "ed", "wendy").await?
    );

    println!("labels: {:?}", Query::user_name_labels(db).await?);
    println!("pairs: {:?}", Query::user_id_name_pairs(db).await?);
    println!("{} members in total", Query::count_users(db).await?);

    match Query::user_named(db, "nobody").await {
        Err(err) => println!("missing member reported: {err}"),
        Ok(user) => println!("unexpectedly found {user:?}"),
    }

    println!(
        "raw bound-parameter filter: {:?}",
        Query::users_below_id_raw(db, 224, "fred").await?
    );
    println!("raw first member: {:?}", Query::first_user_raw(db).await?);
    Ok(())
}

async fn addresses_and_joins(db: &DatabaseConnection) -> Result<(), Error> {
    let (jack, addresses) =
        Mutation::register_member(db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await?;
    println!("registered {jack:?} with {addresses:?}");

    // registration is atomic; a bad address sinks the member with it
    if let Err(err) = Mutation::register_member(db, "eve", "hush", &["not-an-email"]).await {
        println!("registration refused: {err}");
    }
    match Query::user_named(db, "eve").await {
        Err(err) => println!("and nothing was kept: {err}"),
        Ok(user) => println!("unexpectedly kept {user:?}"),
    }

    println!(
        "joined on email: {:?}",
        Query::users_with_address_joined(db, "jack@google.com").await?
    );
    println!(
        "member and address pairs: {:?}",
        Query::user_and_address_pairs(db).await?
    );
    println!(
        "members with addresses in one query: {:?}",
        Query::users_with_addresses(db).await?
    );
    println!(
        "addresses with their owner: {:?}",
        Query::addresses_with_user(db).await?
    );
    println!(
        "holder of both emails: {:?}",
        Query::user_with_both_emails(db, "jack@google.com", "j25@yahoo.com").await?
    );
    println!(
        "members with any address: {:?}",
        Query::users_with_any_address(db).await?
    );

    let members = Query::list_users(db).await?;
    println!(
        "addresses per member: {:?}",
        Query::addresses_per_user(db, &members).await?
    );

    if let Some(spare) = addresses.get(1) {
        Mutation::remove_address(db, spare.id).await?;
        println!(
            "dropped {}, remaining: {:?}",
            spare.email,
            Query::users_with_addresses(db).await?
        );
    }
    Ok(())
}

async fn posts_and_tags(db: &DatabaseConnection) -> Result<(), Error> {
    let wendy = Query::user_named(db, "wendy").await?;
    let post =
        Mutation::create_post(db, wendy.id, "Wendy's Blog Post", &["wendy", "firstpost"]).await?;
    println!("pinned {post:?}");

    let ed = Query::user_named(db, "ed").await?;
    // "firstpost" already exists in the vocabulary and is reused as-is
    let eds_post = Mutation::create_post(db, ed.id, "Ed's corner", &["firstpost"]).await?;
    println!("pinned {eds_post:?}");

    let review = Mutation::tag_post(db, post.id, "review").await?;
    println!("tagged with {review:?}");
    Mutation::untag_post(db, post.id, "review").await?;
    println!("and untagged again");

    println!(
        "tagged firstpost: {:?}",
        Query::posts_tagged(db, "firstpost").await?
    );
    println!(
        "posts with keywords: {:?}",
        Query::posts_with_keywords(db).await?
    );

    let posts = Query::posts_tagged(db, "firstpost").await?;
    println!(
        "keywords per post: {:?}",
        Query::keywords_per_post(db, &posts).await?
    );
    if let Some(first) = posts.first() {
        println!("author of the first: {:?}", Query::post_author(db, first).await?);
    }
    println!("posts per member: {:?}", Query::posts_per_user(db).await?);

    // unpinning drops the links but the vocabulary stays
    Mutation::delete_post(db, eds_post.id).await?;
    println!(
        "after unpinning ed's: {:?}",
        Query::posts_tagged(db, "firstpost").await?
    );
    Ok(())
}

async fn retire_member(db: &DatabaseConnection) -> Result<(), Error> {
    let jack = Query::user_named(db, "jack").await?;
    Mutation::delete_user(db, jack.id).await?;

    println!("jack retired: {:?}", Query::user_by_id(db, jack.id).await?);
    println!(
        "his addresses went with him: {:?}",
        Query::addresses_with_user(db).await?
    );
    Ok(())
}
