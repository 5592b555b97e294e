//! Read-through orchestration over the article cache, the upstream
//! provider, and the bookmark store.
//!
//! Reads never hard-fail: every storage or provider problem degrades to a
//! live fetch or, at worst, the built-in sample set. Sequencing matters
//! here — bookmark annotation only ever runs against cache-sourced rows.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::Url;

use crate::errors::ApiError;
use crate::identity;
use crate::models::{Article, ArticleView, BookmarkedArticle, Category, NewArticle};
use crate::provider::{self, NewsClient};
use crate::repositories::{ArticleRepository, BookmarkRepository};

const PLACEHOLDER_NOTE: &str = "This article may no longer be available in the cache.";

#[derive(Clone)]
pub struct NewsService<A, B> {
    provider: NewsClient,
    articles: A,
    bookmarks: B,
}

impl<A, B> NewsService<A, B>
where
    A: ArticleRepository,
    B: BookmarkRepository,
{
    pub fn new(provider: NewsClient, articles: A, bookmarks: B) -> Self {
        NewsService {
            provider,
            articles,
            bookmarks,
        }
    }

    /// One page of articles for the given filters, annotated with the
    /// user's bookmark state when served from cache.
    pub async fn get_articles(
        &self,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
        user: Option<&str>,
    ) -> Vec<ArticleView> {
        match self.read_through(page, query, category, user).await {
            Ok(views) => views,
            Err(err) => {
                warn!(error = %err, "read path failed entirely, serving sample data");
                provider::filter_samples(query, category)
                    .into_iter()
                    .map(Into::into)
                    .collect()
            }
        }
    }

    async fn read_through(
        &self,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
        user: Option<&str>,
    ) -> Result<Vec<ArticleView>, ApiError> {
        // Default landing view: freshness beats the cache, which is then
        // repopulated opportunistically.
        if query.is_none() && category.is_none() && page <= 1 {
            debug!("unfiltered first page, fetching live");
            let fetched = self.provider.fetch_live(page, None, None).await;
            self.populate_cache(&fetched).await;
            return Ok(fetched.into_iter().map(Into::into).collect());
        }

        let cached = match self.articles.query_page(page, query, category).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "cache read failed, falling back to live fetch");
                let fetched = self.provider.fetch_live(page, query, category).await;
                return Ok(fetched.into_iter().map(Into::into).collect());
            }
        };

        if !cached.is_empty() && query.is_none() {
            debug!(count = cached.len(), "serving cache hit");
            return Ok(self.annotate(cached, user).await);
        }

        // Cache miss, or a free-text query: the cache makes no full-text
        // search guarantees, so queries always go live.
        let fetched = self.provider.fetch_live(page, query, category).await;
        self.populate_cache(&fetched).await;
        Ok(fetched.into_iter().map(Into::into).collect())
    }

    /// Best-effort cache population. Write failures are logged, never
    /// propagated to the read that triggered them.
    async fn populate_cache(&self, fetched: &[NewArticle]) {
        if fetched.is_empty() {
            return;
        }
        if let Err(err) = self.articles.upsert(fetched).await {
            warn!(error = %err, count = fetched.len(), "failed to cache fetched articles");
        }
    }

    async fn annotate(&self, cached: Vec<Article>, user: Option<&str>) -> Vec<ArticleView> {
        // No session means everything is unbookmarked; a failed lookup
        // degrades to unannotated rather than failing the read.
        let bookmarked: Option<HashSet<String>> = match user {
            None => Some(HashSet::new()),
            Some(uid) => match self.bookmarks.list_for_user(uid).await {
                Ok(rows) => Some(rows.into_iter().map(|b| b.article_id).collect()),
                Err(err) => {
                    warn!(error = %err, "bookmark lookup failed, returning unannotated results");
                    None
                }
            },
        };

        cached
            .into_iter()
            .map(|article| {
                let mut view = ArticleView::from(article);
                view.is_bookmarked = bookmarked.as_ref().map(|set| set.contains(&view.id));
                view
            })
            .collect()
    }

    /// Reconstruct the user's bookmarked articles. Identities missing from
    /// the cache become placeholders; a bookmark never silently disappears.
    pub async fn get_bookmarked_articles(
        &self,
        user: &str,
    ) -> Result<Vec<BookmarkedArticle>, ApiError> {
        let rows = self.bookmarks.list_for_user(user).await?;
        let mut entries = Vec::with_capacity(rows.len());

        for bookmark in rows {
            match self.articles.find_by_id(&bookmark.article_id).await {
                Ok(Some(article)) => {
                    let mut view = ArticleView::from(article);
                    view.is_bookmarked = Some(true);
                    entries.push(BookmarkedArticle::Cached { article: view });
                }
                Ok(None) => entries.push(placeholder_for(&bookmark.article_id)),
                Err(err) => {
                    warn!(
                        error = %err,
                        article_id = %bookmark.article_id,
                        "cache lookup failed for bookmark, synthesizing placeholder"
                    );
                    entries.push(placeholder_for(&bookmark.article_id));
                }
            }
        }

        Ok(entries)
    }

    /// Refresh the cache for every category. Fire-and-forget maintenance:
    /// per-category failures are logged and skipped.
    pub async fn refresh_all(&self) {
        for category in Category::ALL {
            let fetched = self.provider.fetch_live(1, None, Some(category)).await;
            if fetched.is_empty() {
                debug!(%category, "nothing fetched for category");
                continue;
            }
            match self.articles.upsert(&fetched).await {
                Ok(()) => info!(%category, count = fetched.len(), "refreshed category"),
                Err(err) => warn!(error = %err, %category, "category refresh failed, skipping"),
            }
        }
    }
}

fn placeholder_for(article_id: &str) -> BookmarkedArticle {
    let decoded = identity::decode(article_id);
    let host = Url::parse(&decoded)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .and_then(|u| u.host_str().map(str::to_owned));

    match host {
        Some(host) => BookmarkedArticle::Placeholder {
            id: article_id.to_string(),
            title: format!("Article from {host}"),
            url: Some(decoded),
            description: PLACEHOLDER_NOTE.to_string(),
        },
        None => BookmarkedArticle::Placeholder {
            id: article_id.to_string(),
            title: "Bookmarked article".to_string(),
            url: None,
            description: PLACEHOLDER_NOTE.to_string(),
        },
    }
}
