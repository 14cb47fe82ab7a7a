mod common;

use corkboard::entity::{user, Address, Keyword, Post, PostKeywords, User};
use corkboard::{Mutation, Query};
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};

use common::{seed_members, setup};

fn names(members: &[user::Model]) -> Vec<&str> {
    members.iter().map(|member| member.name.as_str()).collect()
}

#[tokio::test]
async fn explicit_join_filters_on_the_child() {
    let db = setup().await;
    seed_members(&db).await;
    let (jack, _) =
        Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await
            .unwrap();

    let holders = Query::users_with_address_joined(&db, "jack@google.com")
        .await
        .unwrap();
    assert_eq!(holders, [jack]);

    let nobody = Query::users_with_address_joined(&db, "unknown@example.com")
        .await
        .unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn pairing_emits_one_row_per_address() {
    let db = setup().await;
    let ed = Mutation::create_user(&db, "ed", "edspassword")
        .await
        .unwrap();
    let (jack, addresses) =
        Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await
            .unwrap();

    let pairs = Query::user_and_address_pairs(&db).await.unwrap();
    assert_eq!(
        pairs,
        [
            (ed, None),
            (jack.clone(), Some(addresses[0].clone())),
            (jack, Some(addresses[1].clone())),
        ]
    );
}

#[tokio::test]
async fn eager_loads_agree_with_navigation() {
    let db = setup().await;
    let ed = Mutation::create_user(&db, "ed", "edspassword")
        .await
        .unwrap();
    let (jack, addresses) =
        Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await
            .unwrap();

    let eager = Query::users_with_addresses(&db).await.unwrap();
    assert_eq!(eager, [(ed.clone(), vec![]), (jack.clone(), addresses.clone())]);

    // the batch loader groups the same way
    let members = Query::list_users(&db).await.unwrap();
    let loaded = Query::addresses_per_user(&db, &members).await.unwrap();
    assert_eq!(loaded, [vec![], addresses.clone()]);

    // and per-row navigation returns the same rows in both directions
    let navigated = jack.find_related(Address).all(&db).await.unwrap();
    assert_eq!(navigated, addresses);
    let owner = addresses[0].find_related(User).one(&db).await.unwrap();
    assert_eq!(owner, Some(jack));
}

#[tokio::test]
async fn child_side_eager_load_carries_the_owner() {
    let db = setup().await;
    let (jack, addresses) =
        Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await
            .unwrap();

    let with_owner = Query::addresses_with_user(&db).await.unwrap();
    assert_eq!(
        with_owner,
        [
            (addresses[0].clone(), Some(jack.clone())),
            (addresses[1].clone(), Some(jack)),
        ]
    );
}

#[tokio::test]
async fn double_aliased_join_finds_the_holder_of_both_emails() {
    let db = setup().await;
    seed_members(&db).await;
    Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
        .await
        .unwrap();
    // wendy shares one of the two emails
    let wendy = Query::user_named(&db, "wendy").await.unwrap();
    Mutation::add_address(&db, wendy.id, "j25@yahoo.com")
        .await
        .unwrap();

    let holder = Query::user_with_both_emails(&db, "jack@google.com", "j25@yahoo.com")
        .await
        .unwrap();
    assert_eq!(
        holder,
        Some((
            "jack".to_owned(),
            "jack@google.com".to_owned(),
            "j25@yahoo.com".to_owned(),
        ))
    );

    // both emails exist, but never on one member
    let nobody = Query::user_with_both_emails(&db, "jack@google.com", "missing@example.com")
        .await
        .unwrap();
    assert_eq!(nobody, None);
}

#[tokio::test]
async fn exists_subquery_skips_the_addressless() {
    let db = setup().await;
    seed_members(&db).await;
    Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com"])
        .await
        .unwrap();
    let wendy = Query::user_named(&db, "wendy").await.unwrap();
    Mutation::add_address(&db, wendy.id, "wendy@example.com")
        .await
        .unwrap();

    let reachable = Query::users_with_any_address(&db).await.unwrap();
    assert_eq!(names(&reachable), ["wendy", "jack"]);
}

#[tokio::test]
async fn tagging_links_both_directions() {
    let db = setup().await;
    let wendy = Mutation::create_user(&db, "wendy", "foobar").await.unwrap();
    let post = Mutation::create_post(&db, wendy.id, "Wendy's Blog Post", &["wendy", "firstpost"])
        .await
        .unwrap();

    let tagged = Query::posts_tagged(&db, "firstpost").await.unwrap();
    assert_eq!(tagged, [post.clone()]);

    let eager = Query::posts_with_keywords(&db).await.unwrap();
    assert_eq!(eager.len(), 1);
    let (eager_post, words) = &eager[0];
    assert_eq!(eager_post, &post);
    let words: Vec<&str> = words.iter().map(|word| word.keyword.as_str()).collect();
    assert_eq!(words, ["wendy", "firstpost"]);

    // the loader agrees with the join
    let posts = vec![post.clone()];
    let loaded = Query::keywords_per_post(&db, &posts).await.unwrap();
    assert_eq!(loaded.len(), 1);
    let loaded_words: Vec<&str> = loaded[0].iter().map(|word| word.keyword.as_str()).collect();
    assert_eq!(loaded_words, ["wendy", "firstpost"]);

    assert_eq!(Query::post_author(&db, &post).await.unwrap(), Some(wendy));
}

#[tokio::test]
async fn tagging_is_idempotent_and_untagging_keeps_the_word() {
    let db = setup().await;
    let wendy = Mutation::create_user(&db, "wendy", "foobar").await.unwrap();
    let post = Mutation::create_post(&db, wendy.id, "Wendy's Blog Post", &["wendy"])
        .await
        .unwrap();

    let review = Mutation::tag_post(&db, post.id, "review").await.unwrap();
    let again = Mutation::tag_post(&db, post.id, "review").await.unwrap();
    assert_eq!(review.id, again.id);
    assert_eq!(PostKeywords::find().count(&db).await.unwrap(), 2);

    Mutation::untag_post(&db, post.id, "review").await.unwrap();
    assert_eq!(PostKeywords::find().count(&db).await.unwrap(), 1);
    // the word stays in the vocabulary
    assert_eq!(Keyword::find().count(&db).await.unwrap(), 2);

    assert!(Mutation::untag_post(&db, post.id, "review")
        .await
        .unwrap_err()
        .is_not_found());
    assert!(Mutation::untag_post(&db, post.id, "neverwas")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn deleting_a_member_cascades_to_their_things() {
    let db = setup().await;
    let (jack, _) =
        Mutation::register_member(&db, "jack", "gjffdd", &["jack@google.com", "j25@yahoo.com"])
            .await
            .unwrap();
    Mutation::create_post(&db, jack.id, "Jack's post", &["jack", "firstpost"])
        .await
        .unwrap();

    Mutation::delete_user(&db, jack.id).await.unwrap();

    assert_eq!(Query::user_by_id(&db, jack.id).await.unwrap(), None);
    assert_eq!(Address::find().count(&db).await.unwrap(), 0);
    assert_eq!(Post::find().count(&db).await.unwrap(), 0);
    assert_eq!(PostKeywords::find().count(&db).await.unwrap(), 0);
    // the vocabulary outlives the posts
    assert_eq!(Keyword::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn unpinning_a_post_keeps_the_vocabulary() {
    let db = setup().await;
    let wendy = Mutation::create_user(&db, "wendy", "foobar").await.unwrap();
    let post = Mutation::create_post(&db, wendy.id, "Wendy's Blog Post", &["wendy", "firstpost"])
        .await
        .unwrap();

    Mutation::delete_post(&db, post.id).await.unwrap();

    assert!(Query::posts_tagged(&db, "wendy").await.unwrap().is_empty());
    assert_eq!(PostKeywords::find().count(&db).await.unwrap(), 0);
    assert_eq!(Keyword::find().count(&db).await.unwrap(), 2);
    assert!(Query::user_by_id(&db, wendy.id).await.unwrap().is_some());

    assert!(Mutation::delete_post(&db, post.id)
        .await
        .unwrap_err()
        .is_not_found());
}
