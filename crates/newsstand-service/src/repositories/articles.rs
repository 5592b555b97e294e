use super::traits::ArticleRepository;
use crate::errors::ApiError;
use crate::models::{Article, Category, NewArticle};
use crate::schema::articles;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

const PAGE_SIZE: i64 = 10;

#[derive(Clone)]
pub struct SqliteArticleRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteArticleRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn upsert(&self, new_articles: &[NewArticle]) -> Result<(), ApiError> {
        if new_articles.is_empty() {
            return Ok(());
        }
        let mut conn = self.db.lock().unwrap();
        // REPLACE semantics: concurrent upserts of the same identity resolve
        // to whichever write lands last, which is all the cache needs.
        diesel::replace_into(articles::table)
            .values(new_articles)
            .execute(&mut *conn)?;
        Ok(())
    }

    async fn query_page(
        &self,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Article>, ApiError> {
        let page = page.max(1);
        let mut conn = self.db.lock().unwrap();

        let mut stmt = articles::table.into_boxed();

        if let Some(term) = query {
            stmt = stmt.filter(articles::title.like(format!("%{term}%")));
        }

        if let Some(cat) = category {
            stmt = stmt.filter(articles::category.eq(cat.as_str()));
        }

        let rows = stmt
            .order(articles::published_at.desc())
            .limit(PAGE_SIZE)
            .offset((page as i64 - 1) * PAGE_SIZE)
            .select(Article::as_select())
            .load::<Article>(&mut *conn)?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = articles::table
            .find(id)
            .select(Article::as_select())
            .first::<Article>(&mut *conn)
            .optional()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::establish_test_connection;
    use chrono::NaiveDate;

    fn repo() -> SqliteArticleRepository {
        SqliteArticleRepository::new(Arc::new(Mutex::new(establish_test_connection())))
    }

    fn article(id: &str, title: &str, category: &str, day: u32) -> NewArticle {
        NewArticle {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            content: None,
            url: format!("https://example.com/{id}"),
            image_url: None,
            source: "Test Wire".to_string(),
            author: None,
            published_at: NaiveDate::from_ymd_opt(2025, 8, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            category: Some(category.to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_existing_row() {
        let repo = repo();

        repo.upsert(&[article("a1", "First title", "technology", 1)])
            .await
            .unwrap();
        repo.upsert(&[article("a1", "Updated title", "technology", 2)])
            .await
            .unwrap();

        let rows = repo.query_page(1, None, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Updated title");
    }

    #[tokio::test]
    async fn query_page_orders_by_publish_time_descending() {
        let repo = repo();
        repo.upsert(&[
            article("old", "Old story", "general", 1),
            article("new", "New story", "general", 5),
            article("mid", "Mid story", "general", 3),
        ])
        .await
        .unwrap();

        let rows = repo.query_page(1, None, None).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn query_page_filters_by_category_and_title() {
        let repo = repo();
        repo.upsert(&[
            article("t1", "Rust ships new release", "technology", 1),
            article("t2", "Compiler internals explained", "technology", 2),
            article("s1", "Cup final tonight", "sports", 3),
        ])
        .await
        .unwrap();

        let tech = repo
            .query_page(1, None, Some(Category::Technology))
            .await
            .unwrap();
        assert_eq!(tech.len(), 2);

        let rust = repo.query_page(1, Some("Rust"), None).await.unwrap();
        assert_eq!(rust.len(), 1);
        assert_eq!(rust[0].id, "t1");
    }

    #[tokio::test]
    async fn query_page_paginates() {
        let repo = repo();
        let batch: Vec<NewArticle> = (1..=12)
            .map(|i| article(&format!("a{i}"), &format!("Story {i}"), "general", i))
            .collect();
        repo.upsert(&batch).await.unwrap();

        let first = repo.query_page(1, None, None).await.unwrap();
        let second = repo.query_page(2, None, None).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].id, "a1");
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let repo = repo();
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }
}
