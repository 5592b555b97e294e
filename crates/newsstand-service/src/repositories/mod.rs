mod articles;
mod bookmarks;
mod traits;

pub use articles::SqliteArticleRepository;
pub use bookmarks::SqliteBookmarkRepository;
pub use traits::{ArticleRepository, BookmarkRepository};
