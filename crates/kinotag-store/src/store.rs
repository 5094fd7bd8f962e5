//! The movie store.
//!
//! One table, `movies`, keyed by `(title, year)` with a database-level
//! unique constraint. Inserts are first-write-wins (`ON CONFLICT DO
//! NOTHING`): a key collision is a successful no-op, never an update and
//! never an error, which makes batch loads idempotent under retries and
//! concurrent loaders.
//!
//! Search pushes the ranking into Postgres: `bit_count(tag_mask & query)`
//! orders candidates by shared-tag count, rating breaks ties, and rows with
//! no shared tag are excluded entirely rather than ranked low.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use kinotag_core::{Error, Result, TagVocabulary};

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Number of tags shared with the query.
    pub overlap: i64,
}

/// Durable keyed movie storage with bitwise ranked retrieval.
///
/// The vocabulary injected at construction fixes the `BIT` column width;
/// [`MovieStore::verify_schema`] checks a pre-existing table against it so
/// a vocabulary change surfaces as a storage error instead of silently
/// incomparable masks.
#[derive(Clone)]
pub struct MovieStore {
    pool: PgPool,
    vocabulary: Arc<TagVocabulary>,
}

impl MovieStore {
    /// Connect to Postgres and wrap the pool.
    pub async fn connect(url: &str, vocabulary: Arc<TagVocabulary>) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| Error::storage_with_source("failed to connect to Postgres", e))?;
        Ok(Self::new(pool, vocabulary))
    }

    /// Wrap an existing pool.
    pub fn new(pool: PgPool, vocabulary: Arc<TagVocabulary>) -> Self {
        Self { pool, vocabulary }
    }

    /// The vocabulary this store encodes against.
    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    /// Create the `movies` table when it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS movies (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                year INTEGER NOT NULL,
                rating DECIMAL(4, 3) NOT NULL,
                tag_mask BIT({width}) NOT NULL,
                UNIQUE (title, year)
            )",
            width = self.vocabulary.len()
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage_with_source("failed to create movies table", e))?;
        info!(width = self.vocabulary.len(), "movies schema ready");
        Ok(())
    }

    /// Check that the persisted mask width matches the vocabulary.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Storage`] when the table is missing or its
    /// `tag_mask` width differs from the vocabulary size; in that state
    /// every stored mask would be incomparable with newly encoded ones.
    pub async fn verify_schema(&self) -> Result<()> {
        // character_maximum_length is a cardinal_number domain; cast to a
        // plain integer for decoding.
        let row = sqlx::query(
            "SELECT character_maximum_length::INT4 AS mask_width
             FROM information_schema.columns
             WHERE table_name = 'movies' AND column_name = 'tag_mask'",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage_with_source("failed to inspect movies schema", e))?;

        let Some(row) = row else {
            return Err(Error::storage(
                "movies table is missing; run the schema initialisation first",
            ));
        };
        let width: i32 = row
            .try_get("mask_width")
            .map_err(|e| Error::storage_with_source("failed to read tag_mask width", e))?;

        let expected = self.vocabulary.len();
        if width as usize != expected {
            return Err(Error::storage(format!(
                "tag_mask is BIT({width}) but the vocabulary has {expected} entries; \
                 persisted masks would be incomparable"
            )));
        }
        Ok(())
    }

    /// Insert a movie unless its `(title, year)` key already exists.
    ///
    /// Returns whether a row was actually inserted. A key collision is a
    /// successful no-op: the first write wins and the stored row is never
    /// updated.
    pub async fn upsert(
        &self,
        title: &str,
        year: i32,
        rating: Decimal,
        tags: &[String],
    ) -> Result<bool> {
        let mask = self.vocabulary.encode(tags);
        debug!(title, year, mask = %mask.to_bitstring(), "inserting movie");

        let sql = format!(
            "INSERT INTO movies (title, year, rating, tag_mask)
             VALUES ($1, $2, $3, $4::bit({width}))
             ON CONFLICT (title, year) DO NOTHING",
            width = self.vocabulary.len()
        );
        let result = sqlx::query(&sql)
            .bind(title)
            .bind(year)
            .bind(rating)
            .bind(mask.into_bits())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage_with_source("failed to insert movie", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Rank stored movies by tag overlap with the query.
    ///
    /// Rows sharing no tag with the query are excluded, ties in overlap are
    /// broken by rating descending, remaining ties fall back to storage
    /// order. A query that encodes to the zero mask (all tags outside the
    /// vocabulary) returns an empty result without touching the database.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `limit` is not positive;
    /// storage failures surface as [`Error::Storage`].
    pub async fn search(&self, query_tags: &[String], limit: i64) -> Result<Vec<SearchHit>> {
        if limit <= 0 {
            return Err(Error::invalid_argument(format!(
                "limit must be positive, got {limit}"
            )));
        }

        let mask = self.vocabulary.encode(query_tags);
        if mask.is_zero() {
            debug!("query encodes to the zero mask, nothing can overlap");
            return Ok(Vec::new());
        }
        debug!(mask = %mask.to_bitstring(), limit, "searching by tag overlap");

        let sql = format!(
            "SELECT title, year,
                    bit_count(tag_mask & $1::bit({width}))::BIGINT AS overlap
             FROM movies
             WHERE bit_count(tag_mask & $1::bit({width})) > 0
             ORDER BY overlap DESC, rating DESC, id ASC
             LIMIT $2",
            width = self.vocabulary.len()
        );
        let rows = sqlx::query(&sql)
            .bind(mask.as_bits())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::storage_with_source("search query failed", e))?;

        rows.into_iter()
            .map(|row| {
                Ok(SearchHit {
                    title: row
                        .try_get("title")
                        .map_err(|e| Error::storage_with_source("failed to decode title", e))?,
                    year: row
                        .try_get("year")
                        .map_err(|e| Error::storage_with_source("failed to decode year", e))?,
                    overlap: row
                        .try_get("overlap")
                        .map_err(|e| Error::storage_with_source("failed to decode overlap", e))?,
                })
            })
            .collect()
    }

    /// Number of stored movies.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage_with_source("count query failed", e))?;
        row.try_get("total")
            .map_err(|e| Error::storage_with_source("failed to decode count", e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A store over a pool that never connects. Fine for exercising the
    /// paths that short-circuit before any I/O.
    fn offline_store() -> MovieStore {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/kinotag_offline")
            .unwrap();
        MovieStore::new(pool, Arc::new(TagVocabulary::movie_descriptors()))
    }

    #[tokio::test]
    async fn test_search_rejects_zero_limit() {
        let store = offline_store();
        let result = store.search(&["tense".to_string()], 0).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_negative_limit() {
        let store = offline_store();
        let result = store.search(&["tense".to_string()], -5).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_search_zero_mask_returns_empty_without_io() {
        let store = offline_store();
        // No tag is in the vocabulary, so the query mask is all-zero and
        // the store answers without a database round trip.
        let hits = store
            .search(&["wuxia".to_string(), "neo-noir".to_string()], 5)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_empty() {
        let store = offline_store();
        let hits = store.search(&[], 5).await.unwrap();
        assert!(hits.is_empty());
    }
}
