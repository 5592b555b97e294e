use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

pub mod test_utils {
    use super::*;
    use crate::models::Article;
    use crate::schema::{articles, bookmarks};

    pub fn count_articles(conn: &mut SqliteConnection) -> i64 {
        articles::table
            .count()
            .get_result(conn)
            .expect("Failed to count articles")
    }

    pub fn count_bookmarks(conn: &mut SqliteConnection) -> i64 {
        bookmarks::table
            .count()
            .get_result(conn)
            .expect("Failed to count bookmarks")
    }

    pub fn get_article_by_id(conn: &mut SqliteConnection, id: &str) -> Option<Article> {
        articles::table
            .find(id)
            .select(Article::as_select())
            .first::<Article>(conn)
            .optional()
            .expect("Failed to query article by id")
    }
}
