use super::traits::BookmarkRepository;
use crate::errors::ApiError;
use crate::models::Bookmark;
use crate::schema::bookmarks;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookmarks)]
struct NewBookmark<'a> {
    user_id: &'a str,
    article_id: &'a str,
}

#[derive(Clone)]
pub struct SqliteBookmarkRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteBookmarkRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookmarkRepository for SqliteBookmarkRepository {
    async fn add(&self, user_id: &str, article_id: &str) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        // INSERT OR IGNORE rides on the (user_id, article_id) unique
        // constraint, so a concurrent duplicate insert is a success, not a
        // conflict error.
        diesel::insert_or_ignore_into(bookmarks::table)
            .values(&NewBookmark {
                user_id,
                article_id,
            })
            .execute(&mut *conn)?;
        Ok(())
    }

    async fn remove(&self, user_id: &str, article_id: &str) -> Result<(), ApiError> {
        let mut conn = self.db.lock().unwrap();
        diesel::delete(
            bookmarks::table
                .filter(bookmarks::user_id.eq(user_id))
                .filter(bookmarks::article_id.eq(article_id)),
        )
        .execute(&mut *conn)?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Bookmark>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let rows = bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .order(bookmarks::created_at.desc())
            .select(Bookmark::as_select())
            .load::<Bookmark>(&mut *conn)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::establish_test_connection;

    fn repo() -> SqliteBookmarkRepository {
        SqliteBookmarkRepository::new(Arc::new(Mutex::new(establish_test_connection())))
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let repo = repo();

        repo.add("user-1", "article-1").await.unwrap();
        repo.add("user-1", "article-1").await.unwrap();

        let rows = repo.list_for_user("user-1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].article_id, "article-1");
    }

    #[tokio::test]
    async fn remove_of_absent_bookmark_is_a_noop() {
        let repo = repo();
        repo.remove("user-1", "never-added").await.unwrap();
        assert!(repo.list_for_user("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bookmarks_are_scoped_per_user() {
        let repo = repo();

        repo.add("user-1", "article-1").await.unwrap();
        repo.add("user-2", "article-1").await.unwrap();
        repo.add("user-2", "article-2").await.unwrap();
        repo.remove("user-2", "article-1").await.unwrap();

        let first = repo.list_for_user("user-1").await.unwrap();
        assert_eq!(first.len(), 1);

        let second = repo.list_for_user("user-2").await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].article_id, "article-2");
    }
}
