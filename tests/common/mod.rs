#![allow(dead_code)]

use corkboard::entity::user;
use corkboard::{create_all, Mutation};
use sea_orm::{Database, DatabaseConnection};

/// The four founding members, in insertion order.
pub const MEMBERS: [(&str, &str); 4] = [
    ("ed", "edspassword"),
    ("wendy", "foobar"),
    ("mary", "xxg527"),
    ("fred", "blah"),
];

/// Fresh in-memory database with the full schema in place.
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("could not open the in-memory database");
    create_all(&db).await.expect("could not create the schema");
    db
}

/// Inserts the founding members one by one and returns them with their ids.
pub async fn seed_members(db: &DatabaseConnection) -> Vec<user::Model> {
    let mut members = Vec::new();
    for (name, password) in MEMBERS {
        let member = Mutation::create_user(db, name, password)
            .await
            .expect("could not seed member");
        members.push(member);
    }
    members
}
