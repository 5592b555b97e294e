use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;

#[derive(Parser)]
#[command(name = "newsstand")]
#[command(about = "A CLI for the Newsstand news cache service")]
struct Cli {
    /// Base URL for the Newsstand service
    #[arg(long, default_value = "http://localhost:3000")]
    service_url: String,

    /// User identity forwarded to the service; required for bookmark changes
    #[arg(long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles
    News {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Free-text search query
        #[arg(short, long)]
        query: Option<String>,
        /// Category filter (business, entertainment, general, health,
        /// science, sports, technology)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Refresh the article cache for every category
    Refresh,
    /// List your bookmarked articles
    Bookmarks,
    /// Bookmark an article by identity or URL
    Bookmark {
        /// Article identity (or raw article URL)
        article_id: String,
    },
    /// Remove a bookmark by article identity
    Unbookmark {
        /// Article identity as shown in listings
        article_id: String,
    },
}

#[derive(Serialize)]
struct AddBookmarkRequest {
    article_id: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    let with_user = |mut request: reqwest::RequestBuilder| {
        if let Some(user) = &cli.user {
            request = request.header("x-user-id", user);
        }
        request
    };

    match cli.command {
        Commands::News {
            page,
            query,
            category,
        } => {
            let mut request = client
                .get(format!("{}/api/v1/news", cli.service_url))
                .query(&[("page", page.to_string())]);
            if let Some(q) = query {
                request = request.query(&[("q", q)]);
            }
            if let Some(c) = category {
                request = request.query(&[("category", c)]);
            }

            let response = with_user(request).send().await?;
            if !response.status().is_success() {
                return Err(format!("request failed: {}", response.status()).into());
            }
            let articles: Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
        Commands::Refresh => {
            let response = client
                .post(format!("{}/api/v1/news/refresh", cli.service_url))
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(format!("refresh failed: {}", response.status()).into());
            }
            println!("Cache refreshed");
        }
        Commands::Bookmarks => {
            let request = client.get(format!("{}/api/v1/bookmarks", cli.service_url));
            let response = with_user(request).send().await?;
            if !response.status().is_success() {
                return Err(format!("request failed: {}", response.status()).into());
            }
            let bookmarks: Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&bookmarks)?);
        }
        Commands::Bookmark { article_id } => {
            let request = client
                .post(format!("{}/api/v1/bookmarks", cli.service_url))
                .json(&AddBookmarkRequest { article_id });
            let response = with_user(request).send().await?;
            if !response.status().is_success() {
                return Err(format!("bookmark failed: {}", response.status()).into());
            }
            println!("Bookmark saved");
        }
        Commands::Unbookmark { article_id } => {
            let request = client.delete(format!(
                "{}/api/v1/bookmarks/{}",
                cli.service_url, article_id
            ));
            let response = with_user(request).send().await?;
            if !response.status().is_success() {
                return Err(format!("unbookmark failed: {}", response.status()).into());
            }
            println!("Bookmark removed");
        }
    }

    Ok(())
}
