use crate::errors::ApiError;
use crate::models::{Article, Bookmark, Category, NewArticle};
use async_trait::async_trait;

/// Persisted article cache keyed by identity.
#[async_trait]
pub trait ArticleRepository: Clone + Send + Sync + 'static {
    /// Insert-or-replace by identity. Last write wins on conflict; the whole
    /// row is overwritten, no field merge.
    async fn upsert(&self, articles: &[NewArticle]) -> Result<(), ApiError>;

    /// One page of articles ordered by publish time descending, optionally
    /// filtered by a title substring and/or an exact category.
    async fn query_page(
        &self,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Article>, ApiError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, ApiError>;
}

/// Persisted set of (user, article identity) pairs.
#[async_trait]
pub trait BookmarkRepository: Clone + Send + Sync + 'static {
    /// Idempotent: adding an existing pair is a no-op, not an error.
    async fn add(&self, user_id: &str, article_id: &str) -> Result<(), ApiError>;

    /// Idempotent: removing an absent pair is a no-op.
    async fn remove(&self, user_id: &str, article_id: &str) -> Result<(), ApiError>;

    /// The user's bookmarks, most recently created first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Bookmark>, ApiError>;
}
