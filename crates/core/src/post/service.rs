//! Post service implementation.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use super::error::PostError;
use super::types::{
    Attachment, AttachmentKind, CreatePostInput, DefaultAsset, NewAttachment, NewPost, Post,
    PostPolicy, UploadPayload, UploadedFile,
};
use super::validation::validate;
use crate::storage::StorageService;

/// Repository trait for post persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations.
pub trait PostRepository: Send + Sync {
    /// Insert a post and all of its attachment rows atomically.
    fn insert_with_attachments(
        &self,
        post: NewPost,
    ) -> impl std::future::Future<Output = Result<Post, PostError>> + Send;

    /// Fetch all posts with their attachments.
    fn list_newest_first(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Post>, PostError>> + Send;

    /// Find a single attachment by ID.
    fn find_attachment(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, PostError>> + Send;
}

/// Fetcher for the remote default asset.
///
/// Implemented by the API crate over an HTTP client; tests substitute a mock
/// so validation and creation stay exercisable without network access.
pub trait AssetFetcher: Send + Sync {
    /// Download the asset at `url`, returning its raw bytes.
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<Bytes, PostError>> + Send;
}

/// Post service: creation and listing.
pub struct PostService<R: PostRepository, F: AssetFetcher> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
    fetcher: Arc<F>,
    policy: PostPolicy,
    default_asset: DefaultAsset,
}

impl<R: PostRepository, F: AssetFetcher> PostService<R, F> {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        storage: Arc<StorageService>,
        repo: Arc<R>,
        fetcher: Arc<F>,
        policy: PostPolicy,
        default_asset: DefaultAsset,
    ) -> Self {
        Self {
            storage,
            repo,
            fetcher,
            policy,
            default_asset,
        }
    }

    /// Create a post from a validated-and-resolved upload payload.
    ///
    /// Runs pure validation first, then the explicit default-photo fill when
    /// the policy enables it, writes all files to object storage, and finally
    /// inserts the post and its attachments in one transaction. Nothing is
    /// persisted when validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Validation rules are violated (`PostError::Validation`)
    /// - The default asset download fails (`PostError::DefaultAssetFetch`)
    /// - A storage write fails
    /// - The database insert fails
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostError> {
        let mut errors = validate(&input.title, &input.upload, &self.policy);

        // Storage constraints (MIME allowlist, max size) join the validation
        // list: one message per violated rule.
        for file in input.upload.files() {
            let size = u64::try_from(file.bytes.len()).unwrap_or(u64::MAX);
            if let Err(e) = self.storage.validate_upload(&file.content_type, size) {
                errors.push(e.to_string());
            }
        }

        if !errors.is_empty() {
            return Err(PostError::Validation(errors));
        }

        let upload = if input.upload.is_empty() && self.policy.auto_fill_default_photo {
            let bytes = self.fetcher.fetch(&self.default_asset.url).await?;
            UploadPayload::Single(UploadedFile {
                file_name: self.default_asset.file_name.clone(),
                content_type: self.default_asset.mime_type.clone(),
                bytes,
            })
        } else {
            input.upload
        };

        let post_id = Uuid::new_v4();
        let kind = match upload {
            UploadPayload::Single(_) => AttachmentKind::Photo,
            _ => AttachmentKind::Image,
        };
        let mut attachments = Vec::new();

        for (position, file) in upload.files().into_iter().enumerate() {
            let attachment_id = Uuid::new_v4();
            let storage_key =
                StorageService::generate_storage_key(post_id, attachment_id, &file.file_name);

            self.storage.write(&storage_key, file.bytes.clone()).await?;

            attachments.push(NewAttachment {
                id: attachment_id,
                kind,
                position: i32::try_from(position).unwrap_or(i32::MAX),
                file_name: file.file_name.clone(),
                mime_type: file.content_type.clone(),
                file_size: i64::try_from(file.bytes.len()).unwrap_or(i64::MAX),
                storage_key,
            });
        }

        self.repo
            .insert_with_attachments(NewPost {
                id: post_id,
                title: input.title.trim().to_string(),
                attachments,
            })
            .await
    }

    /// List all posts, newest first.
    ///
    /// The ordering is applied here deterministically regardless of the
    /// repository's natural order: `created_at` descending, `id` descending
    /// as the tie-breaker.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fetch fails.
    pub async fn list(&self) -> Result<Vec<Post>, PostError> {
        let mut posts = self.repo.list_newest_first().await?;
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    /// Get an attachment by ID, for serving its bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment does not exist or the lookup fails.
    pub async fn get_attachment(&self, id: Uuid) -> Result<Attachment, PostError> {
        self.repo
            .find_attachment(id)
            .await?
            .ok_or_else(|| PostError::attachment_not_found(id))
    }

    /// Read the stored bytes of an attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be read from storage.
    pub async fn read_attachment_bytes(&self, attachment: &Attachment) -> Result<Bytes, PostError> {
        Ok(self.storage.read(&attachment.storage_key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageProvider};
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    /// Mock repository for testing.
    struct MockPostRepository {
        posts: Mutex<Vec<Post>>,
    }

    impl MockPostRepository {
        fn new() -> Self {
            Self {
                posts: Mutex::new(Vec::new()),
            }
        }

        fn with_posts(posts: Vec<Post>) -> Self {
            Self {
                posts: Mutex::new(posts),
            }
        }

        fn count(&self) -> usize {
            self.posts.lock().unwrap().len()
        }
    }

    impl PostRepository for MockPostRepository {
        async fn insert_with_attachments(&self, post: NewPost) -> Result<Post, PostError> {
            let now = Utc::now();
            let mut photo = None;
            let mut images = Vec::new();
            for a in post.attachments {
                let attachment = Attachment {
                    id: a.id,
                    post_id: post.id,
                    kind: a.kind,
                    position: a.position,
                    file_name: a.file_name,
                    mime_type: a.mime_type,
                    file_size: a.file_size,
                    storage_key: a.storage_key,
                    created_at: now,
                };
                match a.kind {
                    AttachmentKind::Photo => photo = Some(attachment),
                    AttachmentKind::Image => images.push(attachment),
                }
            }
            let created = Post {
                id: post.id,
                title: post.title,
                photo,
                images,
                created_at: now,
                updated_at: now,
            };
            self.posts.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn list_newest_first(&self) -> Result<Vec<Post>, PostError> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn find_attachment(&self, id: Uuid) -> Result<Option<Attachment>, PostError> {
            let posts = self.posts.lock().unwrap();
            for post in posts.iter() {
                if let Some(photo) = &post.photo {
                    if photo.id == id {
                        return Ok(Some(photo.clone()));
                    }
                }
                if let Some(image) = post.images.iter().find(|i| i.id == id) {
                    return Ok(Some(image.clone()));
                }
            }
            Ok(None)
        }
    }

    /// Mock fetcher returning canned bytes or a canned failure.
    struct MockFetcher {
        response: Result<&'static [u8], String>,
    }

    impl AssetFetcher for MockFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, PostError> {
            match &self.response {
                Ok(bytes) => Ok(Bytes::from_static(bytes)),
                Err(msg) => Err(PostError::default_asset_fetch(msg.clone())),
            }
        }
    }

    fn temp_storage() -> Arc<StorageService> {
        let root = std::env::temp_dir().join(format!("photoboard-test-{}", Uuid::new_v4()));
        let config = StorageConfig::new(StorageProvider::local_fs(root));
        Arc::new(StorageService::from_config(config).expect("should create storage"))
    }

    fn service(
        repo: Arc<MockPostRepository>,
        fetcher: MockFetcher,
        policy: PostPolicy,
    ) -> PostService<MockPostRepository, MockFetcher> {
        PostService::new(
            temp_storage(),
            repo,
            Arc::new(fetcher),
            policy,
            DefaultAsset {
                url: "https://assets.example.com/default.jpg".to_string(),
                file_name: "default.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
            },
        )
    }

    fn ok_fetcher() -> MockFetcher {
        MockFetcher {
            response: Ok(b"default image bytes"),
        }
    }

    fn png(name: &str, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn test_create_with_photo_persists_post() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo.clone(), ok_fetcher(), PostPolicy::default());

        let post = service
            .create(CreatePostInput {
                title: "Sunset".to_string(),
                upload: UploadPayload::Single(png("sunset.png", b"pixels")),
            })
            .await
            .expect("create should succeed");

        assert_eq!(post.title, "Sunset");
        let photo = post.photo.expect("photo should be attached");
        assert_eq!(photo.kind, AttachmentKind::Photo);
        assert_eq!(photo.file_name, "sunset.png");
        assert!(post.images.is_empty());
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_create_blank_title_persists_nothing() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo.clone(), ok_fetcher(), PostPolicy::default());

        let result = service
            .create(CreatePostInput {
                title: "   ".to_string(),
                upload: UploadPayload::Single(png("a.png", b"pixels")),
            })
            .await;

        match result {
            Err(PostError::Validation(messages)) => {
                assert_eq!(messages, vec!["Title can't be blank".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_create_missing_photo_persists_nothing() {
        let repo = Arc::new(MockPostRepository::new());
        let policy = PostPolicy {
            require_photo: true,
            auto_fill_default_photo: false,
            ..PostPolicy::default()
        };
        let service = service(repo.clone(), ok_fetcher(), policy);

        let result = service
            .create(CreatePostInput {
                title: "Sunset".to_string(),
                upload: UploadPayload::None,
            })
            .await;

        match result {
            Err(PostError::Validation(messages)) => {
                assert_eq!(messages, vec!["Photo must be attached".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_create_auto_fills_default_photo() {
        let repo = Arc::new(MockPostRepository::new());
        let policy = PostPolicy {
            require_photo: true,
            auto_fill_default_photo: true,
            ..PostPolicy::default()
        };
        let service = service(repo.clone(), ok_fetcher(), policy);

        let post = service
            .create(CreatePostInput {
                title: "Bench".to_string(),
                upload: UploadPayload::None,
            })
            .await
            .expect("create should succeed with default fill");

        let photo = post.photo.expect("default photo should be attached");
        assert_eq!(photo.file_name, "default.jpg");
        assert_eq!(photo.mime_type, "image/jpeg");
        assert!(
            service.storage.exists(&photo.storage_key).await,
            "default bytes should be written to storage"
        );
    }

    #[tokio::test]
    async fn test_create_default_fetch_failure_aborts() {
        let repo = Arc::new(MockPostRepository::new());
        let policy = PostPolicy {
            auto_fill_default_photo: true,
            ..PostPolicy::default()
        };
        let fetcher = MockFetcher {
            response: Err("connection refused".to_string()),
        };
        let service = service(repo.clone(), fetcher, policy);

        let result = service
            .create(CreatePostInput {
                title: "Bench".to_string(),
                upload: UploadPayload::None,
            })
            .await;

        assert!(matches!(result, Err(PostError::DefaultAssetFetch(_))));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_create_multi_image_preserves_order() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo.clone(), ok_fetcher(), PostPolicy::default());

        let post = service
            .create(CreatePostInput {
                title: "Trip".to_string(),
                upload: UploadPayload::Multiple(vec![
                    png("one.png", b"1"),
                    png("two.png", b"2"),
                    png("three.png", b"3"),
                ]),
            })
            .await
            .expect("create should succeed");

        assert!(post.photo.is_none());
        assert_eq!(post.images.len(), 3);
        let names: Vec<&str> = post.images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["one.png", "two.png", "three.png"]);
        let positions: Vec<i32> = post.images.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_create_rejects_disallowed_mime_type() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo.clone(), ok_fetcher(), PostPolicy::default());

        let result = service
            .create(CreatePostInput {
                title: "Doc".to_string(),
                upload: UploadPayload::Single(UploadedFile {
                    file_name: "notes.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    bytes: Bytes::from_static(b"%PDF"),
                }),
            })
            .await;

        match result {
            Err(PostError::Validation(messages)) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("application/pdf"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first() {
        let base = Utc::now();
        let mk = |title: &str, age: i64| Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            photo: None,
            images: Vec::new(),
            created_at: base - Duration::seconds(age),
            updated_at: base - Duration::seconds(age),
        };

        // Repository returns them out of order on purpose.
        let repo = Arc::new(MockPostRepository::with_posts(vec![
            mk("middle", 60),
            mk("oldest", 3600),
            mk("newest", 0),
        ]));
        let service = service(repo, ok_fetcher(), PostPolicy::default());

        let posts = service.list().await.expect("list should succeed");
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
        for pair in posts.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo.clone(), ok_fetcher(), PostPolicy::default());

        service
            .create(CreatePostInput {
                title: "Sunset".to_string(),
                upload: UploadPayload::Single(png("sunset.png", b"pixels")),
            })
            .await
            .expect("create should succeed");

        let first = service.list().await.expect("list should succeed");
        let second = service.list().await.expect("list should succeed");
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].title, second[0].title);
    }

    #[tokio::test]
    async fn test_get_attachment_not_found() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo, ok_fetcher(), PostPolicy::default());

        let result = service.get_attachment(Uuid::new_v4()).await;
        assert!(matches!(result, Err(PostError::AttachmentNotFound(_))));
    }

    #[tokio::test]
    async fn test_created_attachment_bytes_round_trip() {
        let repo = Arc::new(MockPostRepository::new());
        let service = service(repo, ok_fetcher(), PostPolicy::default());

        let post = service
            .create(CreatePostInput {
                title: "Sunset".to_string(),
                upload: UploadPayload::Single(png("sunset.png", b"pixels")),
            })
            .await
            .expect("create should succeed");

        let photo = post.photo.expect("photo should be attached");
        let fetched = service.get_attachment(photo.id).await.expect("found");
        let bytes = service
            .read_attachment_bytes(&fetched)
            .await
            .expect("read should succeed");
        assert_eq!(bytes.as_ref(), b"pixels");
    }
}
