//! Initial database migration.
//!
//! Creates the posts and attachments tables, their indexes, and the
//! `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(POSTS_SQL).await?;
        db.execute_unprepared(ATTACHMENTS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const POSTS_SQL: &str = r#"
CREATE TABLE posts (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Listing is always newest-first.
CREATE INDEX idx_posts_created_at ON posts (created_at DESC, id DESC);
"#;

const ATTACHMENTS_SQL: &str = r#"
CREATE TABLE attachments (
    id UUID PRIMARY KEY,
    post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('photo', 'image')),
    "position" INTEGER NOT NULL DEFAULT 0,
    file_name TEXT NOT NULL,
    mime_type TEXT NOT NULL,
    file_size BIGINT NOT NULL,
    storage_key TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_attachments_post_id ON attachments (post_id, "position");

-- At most one photo attachment per post.
CREATE UNIQUE INDEX uniq_attachments_post_photo
    ON attachments (post_id)
    WHERE kind = 'photo';
"#;

const TRIGGERS_SQL: &str = r#"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER posts_set_updated_at
    BEFORE UPDATE ON posts
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();
"#;

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS posts_set_updated_at ON posts;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TABLE IF EXISTS attachments;
DROP TABLE IF EXISTS posts;
";
