//! Application wiring and command handlers.
//!
//! The handlers are thin: each one composes the provider, oracle, engine,
//! and store and calls the underlying operations. No domain logic lives
//! here.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use kinotag_core::TagVocabulary;
use kinotag_core::llm::{ClaudeProvider, RetryWrapper};
use kinotag_enrich::{EnrichmentEngine, LlmTagOracle, MovieSeed, parse_tag_line};
use kinotag_store::MovieStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::KinotagConfig;
use crate::loader;

/// The `kinotag` application.
pub struct App {
    config: KinotagConfig,
    vocabulary: Arc<TagVocabulary>,
}

impl App {
    /// Create the app from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = KinotagConfig::load(args.config.as_deref())?;
        Ok(Self {
            config,
            vocabulary: Arc::new(TagVocabulary::movie_descriptors()),
        })
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses the `RUST_LOG` env var if set, otherwise defaults based on the
    /// verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Dispatch a command.
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Init => self.handle_init().await,
            Command::Load {
                input,
                max_concurrency,
                limit,
            } => self.handle_load(&input, max_concurrency, limit).await,
            Command::Search { tags, query, limit } => {
                self.handle_search(tags, query, limit).await
            }
            Command::Vocab => self.handle_vocab(),
            Command::Health => self.handle_health().await,
        }
    }

    async fn open_store(&self) -> Result<MovieStore> {
        let url = self
            .config
            .database
            .url
            .clone()
            .context("no database URL configured; set database.url or KINOTAG_DATABASE_URL")?;
        Ok(MovieStore::connect(&url, self.vocabulary.clone()).await?)
    }

    fn build_engine(&self, max_concurrency: Option<u16>) -> Result<EnrichmentEngine> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY must be set for oracle calls")?;
        let provider = ClaudeProvider::new(api_key, self.config.oracle.model.as_str());
        let retry = RetryWrapper::new(Arc::new(provider));
        let oracle = LlmTagOracle::new(Arc::new(retry), &self.vocabulary);

        let cap = max_concurrency
            .map(usize::from)
            .unwrap_or(self.config.oracle.max_concurrency);
        Ok(
            EnrichmentEngine::new(Arc::new(oracle), self.vocabulary.clone())
                .with_max_concurrency(cap)
                .with_progress_every(self.config.oracle.progress_every),
        )
    }

    async fn handle_init(&self) -> Result<()> {
        let store = self.open_store().await?;
        store.ensure_schema().await?;
        store.verify_schema().await?;
        println!("movies schema ready (mask width {})", self.vocabulary.len());
        Ok(())
    }

    async fn handle_load(
        &self,
        input: &str,
        max_concurrency: Option<u16>,
        limit: Option<usize>,
    ) -> Result<()> {
        let rows = loader::read_movie_rows(input, limit)?;
        if rows.is_empty() {
            println!("nothing to load");
            return Ok(());
        }
        info!(rows = rows.len(), input, "starting load");

        let store = self.open_store().await?;
        store.ensure_schema().await?;
        store.verify_schema().await?;
        let engine = self.build_engine(max_concurrency)?;

        let seeds: Vec<MovieSeed> = rows
            .iter()
            .map(|row| MovieSeed::new(row.title.as_str(), row.year))
            .collect();
        let outcomes = engine.enrich(&seeds).await;

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;
        for (row, outcome) in rows.iter().zip(&outcomes) {
            match outcome.tags() {
                Some(tags) => {
                    if store.upsert(&row.title, row.year, row.rating, tags).await? {
                        inserted += 1;
                    } else {
                        skipped += 1;
                    }
                }
                None => failed += 1,
            }
        }

        println!(
            "loaded {inserted} movies ({skipped} already present, {failed} failed classification)"
        );
        Ok(())
    }

    async fn handle_search(
        &self,
        tags: Option<String>,
        query: Option<String>,
        limit: Option<i64>,
    ) -> Result<()> {
        let query_tags: Vec<String> = match (tags, query) {
            (Some(list), _) => parse_tag_line(&list),
            (None, Some(text)) => {
                let engine = self.build_engine(None)?;
                engine.interpret_query(&text).await?
            }
            (None, None) => bail!("provide --tags or --query"),
        };

        let limit = limit.unwrap_or(self.config.search.default_limit);
        let store = self.open_store().await?;
        let hits = store.search(&query_tags, limit).await?;

        println!("query tags: {}", query_tags.join(", "));
        if hits.is_empty() {
            println!("no matches");
            return Ok(());
        }
        for (rank, hit) in hits.iter().enumerate() {
            println!(
                "{:>2}. {} ({})  [{} shared]",
                rank + 1,
                hit.title,
                hit.year,
                hit.overlap
            );
        }
        Ok(())
    }

    fn handle_vocab(&self) -> Result<()> {
        for (position, tag) in self.vocabulary.tags().iter().enumerate() {
            println!("{position:>2}  {tag}");
        }
        Ok(())
    }

    async fn handle_health(&self) -> Result<()> {
        let store = self.open_store().await?;
        store.verify_schema().await?;
        let total = store.count().await?;
        println!(
            "database ok: {total} movies stored, mask width {}",
            self.vocabulary.len()
        );
        Ok(())
    }
}
