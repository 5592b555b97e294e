use axum::Router;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod errors;
pub mod identity;
pub mod models;
pub mod news;
pub mod provider;
pub mod repositories;
pub mod routes;
pub mod schema;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use news::NewsService;
use provider::NewsClient;
use repositories::{
    ArticleRepository, BookmarkRepository, SqliteArticleRepository, SqliteBookmarkRepository,
};

pub trait AppState: Clone + Send + Sync + 'static {
    type Articles: ArticleRepository;
    type Bookmarks: BookmarkRepository;

    fn news(&self) -> &NewsService<Self::Articles, Self::Bookmarks>;
    fn bookmarks(&self) -> &Self::Bookmarks;
}

#[derive(Clone)]
pub struct DefaultAppState {
    news: NewsService<SqliteArticleRepository, SqliteBookmarkRepository>,
    bookmarks: SqliteBookmarkRepository,
}

impl DefaultAppState {
    pub fn new(db: Arc<Mutex<SqliteConnection>>, provider: NewsClient) -> Self {
        let articles = SqliteArticleRepository::new(db.clone());
        let bookmarks = SqliteBookmarkRepository::new(db);
        DefaultAppState {
            news: NewsService::new(provider, articles, bookmarks.clone()),
            bookmarks,
        }
    }
}

impl AppState for DefaultAppState {
    type Articles = SqliteArticleRepository;
    type Bookmarks = SqliteBookmarkRepository;

    fn news(&self) -> &NewsService<Self::Articles, Self::Bookmarks> {
        &self.news
    }

    fn bookmarks(&self) -> &Self::Bookmarks {
        &self.bookmarks
    }
}

pub fn create_app(state: DefaultAppState) -> Router {
    routes::create_router().with_state(state)
}
