//! Post repository for database operations.
//!
//! Implements post and attachment persistence using SeaORM.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{attachments, posts};
use photoboard_core::post::{
    Attachment, AttachmentKind, NewPost, Post, PostError, PostRepository as PostRepoTrait,
};

/// Post repository implementation.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl PostRepoTrait for PostRepository {
    async fn insert_with_attachments(&self, post: NewPost) -> Result<Post, PostError> {
        let now = Utc::now();

        // One transaction: the listing never observes a post without its
        // attachment rows.
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        let post_model = posts::ActiveModel {
            id: Set(post.id),
            title: Set(post.title.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| PostError::repository(e.to_string()))?;

        let mut attachment_models = Vec::with_capacity(post.attachments.len());
        for a in &post.attachments {
            let model = attachments::ActiveModel {
                id: Set(a.id),
                post_id: Set(post.id),
                kind: Set(a.kind.as_str().to_string()),
                position: Set(a.position),
                file_name: Set(a.file_name.clone()),
                mime_type: Set(a.mime_type.clone()),
                file_size: Set(a.file_size),
                storage_key: Set(a.storage_key.clone()),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;
            attachment_models.push(model);
        }

        txn.commit()
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(to_domain_post(post_model, attachment_models))
    }

    async fn list_newest_first(&self) -> Result<Vec<Post>, PostError> {
        let post_models = posts::Entity::find()
            .order_by_desc(posts::Column::CreatedAt)
            .order_by_desc(posts::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        if post_models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = post_models.iter().map(|p| p.id).collect();
        let attachment_models = attachments::Entity::find()
            .filter(attachments::Column::PostId.is_in(post_ids))
            .order_by_asc(attachments::Column::Position)
            .order_by_asc(attachments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        let mut by_post: HashMap<Uuid, Vec<attachments::Model>> = HashMap::new();
        for model in attachment_models {
            by_post.entry(model.post_id).or_default().push(model);
        }

        Ok(post_models
            .into_iter()
            .map(|p| {
                let attachments = by_post.remove(&p.id).unwrap_or_default();
                to_domain_post(p, attachments)
            })
            .collect())
    }

    async fn find_attachment(&self, id: Uuid) -> Result<Option<Attachment>, PostError> {
        let model = attachments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PostError::repository(e.to_string()))?;

        Ok(model.map(to_domain_attachment))
    }
}

/// Convert database models to the domain post.
fn to_domain_post(post: posts::Model, attachment_models: Vec<attachments::Model>) -> Post {
    let mut photo = None;
    let mut images = Vec::new();

    for model in attachment_models {
        let attachment = to_domain_attachment(model);
        match attachment.kind {
            AttachmentKind::Photo => photo = Some(attachment),
            AttachmentKind::Image => images.push(attachment),
        }
    }

    Post {
        id: post.id,
        title: post.title,
        photo,
        images,
        created_at: post.created_at.with_timezone(&Utc),
        updated_at: post.updated_at.with_timezone(&Utc),
    }
}

/// Convert a database model to the domain attachment.
fn to_domain_attachment(model: attachments::Model) -> Attachment {
    Attachment {
        id: model.id,
        post_id: model.post_id,
        // Rows can only hold "photo" or "image" (check constraint).
        kind: AttachmentKind::parse(&model.kind).unwrap_or(AttachmentKind::Image),
        position: model.position,
        file_name: model.file_name,
        mime_type: model.mime_type,
        file_size: model.file_size,
        storage_key: model.storage_key,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
