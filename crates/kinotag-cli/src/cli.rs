//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI arguments for the `kinotag` binary.
#[derive(Parser, Debug)]
#[command(name = "kinotag", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "KINOTAG_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the movies schema and verify its mask width.
    Init,

    /// Classify movies from a CSV file and load them into the store.
    Load {
        /// Input CSV path (title, year, rating columns; the aggregation
        /// pipeline's primaryTitle/startYear/weighted_rating headers are
        /// accepted as-is).
        #[arg(short, long)]
        input: String,

        /// Cap on concurrently in-flight oracle calls.
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        max_concurrency: Option<u16>,

        /// Only process the first N rows.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rank stored movies by tag overlap.
    Search {
        /// Explicit comma-separated tags.
        #[arg(short, long, conflicts_with = "query")]
        tags: Option<String>,

        /// Free-text preferences, interpreted through the oracle first.
        #[arg(short = 'Q', long)]
        query: Option<String>,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Print the active vocabulary with bit positions.
    Vocab,

    /// Check database connectivity and schema width.
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_defaults() {
        let args = CliArgs::parse_from(["kinotag", "vocab"]);
        assert!(args.config.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(matches!(args.command, Command::Vocab));
    }

    #[test]
    fn test_init_command() {
        let args = CliArgs::parse_from(["kinotag", "init"]);
        assert!(matches!(args.command, Command::Init));
    }

    #[test]
    fn test_health_command() {
        let args = CliArgs::parse_from(["kinotag", "--verbose", "health"]);
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Health));
    }

    #[test]
    fn test_load_command() {
        let args = CliArgs::parse_from(["kinotag", "load", "--input", "movies.csv"]);
        match args.command {
            Command::Load {
                input,
                max_concurrency,
                limit,
            } => {
                assert_eq!(input, "movies.csv");
                assert!(max_concurrency.is_none());
                assert!(limit.is_none());
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn test_load_command_with_bounds() {
        let args = CliArgs::parse_from([
            "kinotag",
            "load",
            "--input",
            "movies.csv",
            "--max-concurrency",
            "4",
            "--limit",
            "100",
        ]);
        match args.command {
            Command::Load {
                max_concurrency,
                limit,
                ..
            } => {
                assert_eq!(max_concurrency, Some(4));
                assert_eq!(limit, Some(100));
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn test_load_rejects_zero_concurrency() {
        let result = CliArgs::try_parse_from([
            "kinotag",
            "load",
            "--input",
            "movies.csv",
            "--max-concurrency",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_with_tags() {
        let args = CliArgs::parse_from(["kinotag", "search", "--tags", "tense,gritty"]);
        match args.command {
            Command::Search { tags, query, limit } => {
                assert_eq!(tags.as_deref(), Some("tense,gritty"));
                assert!(query.is_none());
                assert!(limit.is_none());
            }
            _ => panic!("expected Search command"),
        }
    }

    #[test]
    fn test_search_with_query_and_limit() {
        let args = CliArgs::parse_from([
            "kinotag",
            "search",
            "--query",
            "slow sad sci-fi",
            "--limit",
            "3",
        ]);
        match args.command {
            Command::Search { tags, query, limit } => {
                assert!(tags.is_none());
                assert_eq!(query.as_deref(), Some("slow sad sci-fi"));
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected Search command"),
        }
    }

    #[test]
    fn test_search_tags_and_query_conflict() {
        let result = CliArgs::try_parse_from([
            "kinotag",
            "search",
            "--tags",
            "tense",
            "--query",
            "something",
        ]);
        assert!(result.is_err());
    }
}
