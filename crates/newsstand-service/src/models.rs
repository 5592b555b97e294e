use std::fmt;
use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of provider categories. Absence means "unfiltered".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "business" => Ok(Category::Business),
            "entertainment" => Ok(Category::Entertainment),
            "general" => Ok(Category::General),
            "health" => Ok(Category::Health),
            "science" => Ok(Category::Science),
            "sports" => Ok(Category::Sports),
            "technology" => Ok(Category::Technology),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A cached article row. `created_at` is assigned by the database on insert.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub author: Option<String>,
    pub published_at: chrono::NaiveDateTime,
    pub category: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// An article as produced by the provider client, ready for cache upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub author: Option<String>,
    pub published_at: chrono::NaiveDateTime,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bookmark {
    pub id: i32,
    pub user_id: String,
    pub article_id: String,
    pub created_at: chrono::NaiveDateTime,
}

/// API representation of an article. `is_bookmarked` is present only on
/// cache-sourced reads where the bookmark annotation ran.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub author: Option<String>,
    pub published_at: chrono::NaiveDateTime,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
}

impl From<Article> for ArticleView {
    fn from(a: Article) -> Self {
        ArticleView {
            id: a.id,
            title: a.title,
            description: a.description,
            content: a.content,
            url: a.url,
            image_url: a.image_url,
            source: a.source,
            author: a.author,
            published_at: a.published_at,
            category: a.category,
            is_bookmarked: None,
        }
    }
}

impl From<NewArticle> for ArticleView {
    fn from(a: NewArticle) -> Self {
        ArticleView {
            id: a.id,
            title: a.title,
            description: a.description,
            content: a.content,
            url: a.url,
            image_url: a.image_url,
            source: a.source,
            author: a.author,
            published_at: a.published_at,
            category: a.category,
            is_bookmarked: None,
        }
    }
}

/// One entry in a user's bookmarks listing.
///
/// A bookmark outlives its cache entry, so an entry is either the cached
/// article or a placeholder synthesized from the decoded identity. The two
/// are kept as distinct variants so clients can tell stale data apart.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum BookmarkedArticle {
    Cached {
        #[serde(flatten)]
        article: ArticleView,
    },
    Placeholder {
        id: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        description: String,
    },
}
