//! Upstream news provider client.
//!
//! Wraps the provider's page-based top-headlines listing. The client is
//! infallible by contract: a missing API key, a non-success status, or any
//! transport/decode error degrades to the built-in sample set, filtered by
//! the same rules the live call would apply. This component never touches
//! the cache.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::identity;
use crate::models::{Category, NewArticle};

const PAGE_SIZE: u32 = 10;
const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Clone)]
pub struct NewsClientConfig {
    /// Provider API key. Absent means the client only serves sample data.
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for NewsClientConfig {
    fn default() -> Self {
        NewsClientConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Error, Debug)]
enum FetchError {
    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct NewsClient {
    client: Client,
    config: NewsClientConfig,
}

impl NewsClient {
    pub fn new(config: NewsClientConfig) -> Self {
        // Bound the fallback latency of cache-miss reads: the provider gets
        // a hard deadline rather than inheriting the request timeout.
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("newsstand/0.1")
            .build()
            .expect("failed to build HTTP client");

        NewsClient { client, config }
    }

    /// Fetch one page of articles, filtered by optional query and category.
    ///
    /// Never fails: all provider trouble degrades to the filtered sample set.
    pub async fn fetch_live(
        &self,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
    ) -> Vec<NewArticle> {
        let Some(api_key) = self.config.api_key.clone() else {
            warn!("no provider API key configured, serving sample data");
            return filter_samples(query, category);
        };

        match self.fetch_from_api(&api_key, page, query, category).await {
            Ok(articles) => {
                debug!(count = articles.len(), page, "fetched articles from provider");
                articles
            }
            Err(err) => {
                warn!(error = %err, page, "live fetch failed, serving sample data");
                filter_samples(query, category)
            }
        }
    }

    async fn fetch_from_api(
        &self,
        api_key: &str,
        page: u32,
        query: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<NewArticle>, FetchError> {
        let mut request = self
            .client
            .get(format!("{}/top-headlines", self.config.base_url))
            .header("X-Api-Key", api_key)
            .query(&[("pageSize", PAGE_SIZE), ("page", page)])
            .query(&[("language", "en")]);

        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }

        // Without any filter the provider would return unranked firehose
        // results, so the default landing view pins the general category.
        match (category, query) {
            (Some(cat), _) => request = request.query(&[("category", cat.as_str())]),
            (None, None) => request = request.query(&[("category", "general")]),
            (None, Some(_)) => {}
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let payload: HeadlinesResponse = response.json().await?;

        // The stamped category is the one we asked for, not whatever the
        // provider tags the item with.
        let stamped = category.unwrap_or(Category::General);

        let articles = payload
            .articles
            .into_iter()
            .map(|raw| raw.into_article(stamped))
            .collect();

        Ok(articles)
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    source: RawSource,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: String,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl RawArticle {
    fn into_article(self, category: Category) -> NewArticle {
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.naive_utc())
            .unwrap_or_else(|| Utc::now().naive_utc());

        NewArticle {
            id: identity::encode(&self.url),
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "No title available".to_string()),
            description: self.description,
            content: self.content,
            url: self.url,
            image_url: self.url_to_image,
            source: self
                .source
                .name
                .unwrap_or_else(|| "Unknown".to_string()),
            author: self.author,
            published_at,
            category: Some(category.as_str().to_string()),
        }
    }
}

/// The deterministic fallback set served when the provider is unavailable.
pub fn sample_articles() -> Vec<NewArticle> {
    let now = Utc::now().naive_utc();
    let hour = chrono::Duration::hours(1);

    vec![
        NewArticle {
            id: "sample-1".to_string(),
            title: "Tech Giants Announce New AI Collaboration".to_string(),
            description: Some(
                "Major technology companies have joined forces to develop new artificial \
                 intelligence standards."
                    .to_string(),
            ),
            content: Some(
                "In a landmark announcement, several leading tech companies revealed plans to \
                 collaborate on developing ethical AI standards that will shape the future of \
                 the industry..."
                    .to_string(),
            ),
            url: "https://example.com/tech-ai-collaboration".to_string(),
            image_url: Some("https://picsum.photos/id/1/800/600".to_string()),
            source: "Tech Daily".to_string(),
            author: Some("Jane Smith".to_string()),
            published_at: now,
            category: Some("technology".to_string()),
        },
        NewArticle {
            id: "sample-2".to_string(),
            title: "Global Markets React to Economic Policy Changes".to_string(),
            description: Some(
                "Stock markets worldwide show volatility following new economic policies."
                    .to_string(),
            ),
            content: Some(
                "Investors are closely monitoring market reactions after the announcement of \
                 significant changes to economic policies in several major economies..."
                    .to_string(),
            ),
            url: "https://example.com/markets-economic-policy".to_string(),
            image_url: Some("https://picsum.photos/id/20/800/600".to_string()),
            source: "Financial Times".to_string(),
            author: Some("John Doe".to_string()),
            published_at: now - hour,
            category: Some("business".to_string()),
        },
        NewArticle {
            id: "sample-3".to_string(),
            title: "New Study Reveals Health Benefits of Mediterranean Diet".to_string(),
            description: Some(
                "Research confirms significant health improvements from following Mediterranean \
                 eating patterns."
                    .to_string(),
            ),
            content: Some(
                "A comprehensive study published today has provided further evidence of the \
                 numerous health benefits associated with adhering to a Mediterranean diet..."
                    .to_string(),
            ),
            url: "https://example.com/mediterranean-diet-benefits".to_string(),
            image_url: Some("https://picsum.photos/id/30/800/600".to_string()),
            source: "Health Journal".to_string(),
            author: Some("Dr. Maria Rodriguez".to_string()),
            published_at: now - hour * 2,
            category: Some("health".to_string()),
        },
        NewArticle {
            id: "sample-4".to_string(),
            title: "Scientists Discover New Species in Amazon Rainforest".to_string(),
            description: Some(
                "Expedition team identifies previously unknown plant and insect species."
                    .to_string(),
            ),
            content: Some(
                "A team of international researchers has announced the discovery of several new \
                 species during their recent expedition to remote areas of the Amazon \
                 rainforest..."
                    .to_string(),
            ),
            url: "https://example.com/amazon-new-species".to_string(),
            image_url: Some("https://picsum.photos/id/40/800/600".to_string()),
            source: "Science Today".to_string(),
            author: Some("Dr. Robert Chen".to_string()),
            published_at: now - hour * 3,
            category: Some("science".to_string()),
        },
        NewArticle {
            id: "sample-5".to_string(),
            title: "Major Sports League Announces Expansion Teams".to_string(),
            description: Some(
                "Two new cities will join the league in the upcoming season.".to_string(),
            ),
            content: Some(
                "Sports fans are celebrating the announcement that two additional cities will \
                 be home to new professional teams starting next season..."
                    .to_string(),
            ),
            url: "https://example.com/sports-league-expansion".to_string(),
            image_url: Some("https://picsum.photos/id/50/800/600".to_string()),
            source: "Sports Network".to_string(),
            author: Some("Mike Johnson".to_string()),
            published_at: now - hour * 4,
            category: Some("sports".to_string()),
        },
    ]
}

/// Filter the sample set the way the live call would: case-insensitive
/// exact category match, case-insensitive substring query match on title or
/// description.
pub fn filter_samples(query: Option<&str>, category: Option<Category>) -> Vec<NewArticle> {
    let mut articles = sample_articles();

    if let Some(cat) = category {
        articles.retain(|a| {
            a.category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(cat.as_str()))
        });
    }

    if let Some(q) = query {
        let needle = q.to_lowercase();
        articles.retain(|a| {
            a.title.to_lowercase().contains(&needle)
                || a.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_returned_unfiltered() {
        assert_eq!(filter_samples(None, None).len(), 5);
    }

    #[test]
    fn query_filter_matches_title_or_description() {
        let matches = filter_samples(Some("mediterranean"), None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "sample-3");

        // "volatility" appears only in a description
        let matches = filter_samples(Some("VOLATILITY"), None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "sample-2");
    }

    #[test]
    fn category_filter_is_case_insensitive_exact() {
        let matches = filter_samples(None, Some(Category::Technology));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "sample-1");

        assert!(filter_samples(None, Some(Category::Entertainment)).is_empty());
    }

    #[test]
    fn query_and_category_filters_compose() {
        assert_eq!(
            filter_samples(Some("markets"), Some(Category::Business)).len(),
            1
        );
        assert!(filter_samples(Some("markets"), Some(Category::Health)).is_empty());
    }

    #[tokio::test]
    async fn fetch_without_api_key_serves_samples() {
        let client = NewsClient::new(NewsClientConfig::default());
        let articles = client.fetch_live(1, None, None).await;
        assert_eq!(articles.len(), 5);
    }

    #[tokio::test]
    async fn fetch_without_api_key_applies_filters() {
        let client = NewsClient::new(NewsClientConfig::default());
        let articles = client.fetch_live(1, Some("mediterranean"), None).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "sample-3");
    }
}
