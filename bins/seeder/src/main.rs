//! Database seeder for Photoboard development and testing.
//!
//! Seeds a handful of sample posts for local development. Seeded posts carry
//! no attachments, so the gallery shows them with an empty photo slot.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use photoboard_db::entities::posts;

/// Seed post IDs (consistent across runs so re-seeding is a no-op).
const SEED_POSTS: [(&str, &str); 3] = [
    ("00000000-0000-0000-0000-000000000101", "Bench at dusk"),
    ("00000000-0000-0000-0000-000000000102", "Morning walk"),
    ("00000000-0000-0000-0000-000000000103", "Harbor lights"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = photoboard_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding sample posts...");
    seed_posts(&db).await;

    println!("Seeding complete!");
}

async fn seed_posts(db: &DatabaseConnection) {
    let base = Utc::now();

    for (i, (id, title)) in SEED_POSTS.iter().enumerate() {
        let post_id = Uuid::parse_str(id).expect("seed id should be a valid UUID");

        let existing = posts::Entity::find_by_id(post_id)
            .one(db)
            .await
            .expect("Failed to query posts");
        if existing.is_some() {
            println!("  post '{title}' already seeded, skipping");
            continue;
        }

        // Stagger timestamps so the gallery ordering is visible.
        let created_at = base - Duration::minutes(i64::try_from(i).unwrap() * 10);
        posts::ActiveModel {
            id: Set(post_id),
            title: Set((*title).to_string()),
            created_at: Set(created_at.into()),
            updated_at: Set(created_at.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert seed post");

        println!("  seeded post '{title}'");
    }
}
