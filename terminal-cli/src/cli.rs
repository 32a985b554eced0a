//! Command-line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use terminal_dedup::{DetectorConfig, NormalizationPolicy};
use terminal_embedding::{DistanceMetric, RetrievalConfig, DEFAULT_HASHING_DIMENSION};

#[derive(Parser, Debug)]
#[command(
    name = "terminal-cli",
    about = "Merge, deduplicate, and query prediction market listings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate listing arrays from several sources into one file
    Merge(MergeArgs),
    /// Flag listings whose key field repeats after normalization
    Dedup(DedupArgs),
    /// Answer one question from the deduplicated listings
    Ask(AskArgs),
    /// Interactive question loop over the deduplicated listings
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Where to write the combined array
    #[arg(long, short)]
    pub output: PathBuf,

    /// Source files, each a JSON array of listings
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Record field compared between listings
    #[arg(long, env = "TERMINAL_KEY_FIELD", default_value = "product")]
    pub key_field: String,

    /// Lower-case key values before comparing
    #[arg(long, default_value_t = false)]
    pub case_insensitive: bool,

    /// Compare key values without trimming surrounding whitespace
    #[arg(long, default_value_t = false)]
    pub keep_whitespace: bool,
}

impl PolicyArgs {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            key_field: self.key_field.clone(),
            policy: NormalizationPolicy {
                case_sensitive: !self.case_insensitive,
                strip_whitespace: !self.keep_whitespace,
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct DedupArgs {
    /// JSON array of raw listings
    #[arg(long, short)]
    pub input: PathBuf,

    /// Where to write the flagged listings
    #[arg(long, short)]
    pub output: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Offline feature hashing, no network access
    Hashing,
    /// OpenAI embeddings API
    Openai,
}

#[derive(Args, Debug, Clone)]
pub struct RetrievalArgs {
    /// JSON array of listings, usually the output of `dedup`
    #[arg(long, short)]
    pub input: PathBuf,

    /// Number of listings retrieved per question
    #[arg(short = 'k', long, env = "TERMINAL_TOP_K", default_value_t = 5)]
    pub top_k: usize,

    /// Distance metric for nearest-neighbor search (euclidean or cosine)
    #[arg(long, default_value_t = DistanceMetric::Euclidean)]
    pub metric: DistanceMetric,

    /// Embedding backend
    #[arg(long, value_enum, env = "TERMINAL_EMBEDDER", default_value_t = EmbedderKind::Hashing)]
    pub embedder: EmbedderKind,

    /// Vector width for the hashing embedder
    #[arg(long, default_value_t = DEFAULT_HASHING_DIMENSION)]
    pub hashing_dimension: usize,

    /// OpenAI API key (embeddings with `--embedder openai`, and answer synthesis)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI embedding model
    #[arg(long, env = "TERMINAL_EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    /// Output width of the OpenAI embedding model
    #[arg(long, default_value_t = 1536)]
    pub embedding_dimension: usize,

    /// OpenAI chat model used for synthesis
    #[arg(long, env = "TERMINAL_CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub chat_model: String,

    /// Run duplicate detection on the input before indexing
    #[arg(long, default_value_t = false)]
    pub detect: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Only print the retrieved listings (skip answer synthesis)
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl RetrievalArgs {
    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig {
            top_k: self.top_k,
            metric: self.metric,
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer from the listings
    #[arg(long, short)]
    pub query: String,

    #[command(flatten)]
    pub retrieval: RetrievalArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub retrieval: RetrievalArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dedup_defaults() {
        let cli = Cli::try_parse_from(["terminal-cli", "dedup", "-i", "raw.json", "-o", "out.json"])
            .unwrap();
        let Command::Dedup(args) = cli.command else {
            panic!("expected dedup");
        };
        let config = args.policy.detector_config();
        assert_eq!(config.policy, NormalizationPolicy::default());
    }

    #[test]
    fn test_dedup_policy_flags() {
        let cli = Cli::try_parse_from([
            "terminal-cli",
            "dedup",
            "-i",
            "raw.json",
            "-o",
            "out.json",
            "--key-field",
            "title",
            "--case-insensitive",
            "--keep-whitespace",
        ])
        .unwrap();
        let Command::Dedup(args) = cli.command else {
            panic!("expected dedup");
        };
        let config = args.policy.detector_config();
        assert_eq!(config.key_field, "title");
        assert!(!config.policy.case_sensitive);
        assert!(!config.policy.strip_whitespace);
    }

    #[test]
    fn test_ask_retrieval_options() {
        let cli = Cli::try_parse_from([
            "terminal-cli",
            "ask",
            "-i",
            "processed.json",
            "-q",
            "Who wins the Senate?",
            "-k",
            "3",
            "--metric",
            "cosine",
            "--dry-run",
        ])
        .unwrap();
        let Command::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.query, "Who wins the Senate?");
        let config = args.retrieval.retrieval_config();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.metric, DistanceMetric::Cosine);
        assert!(args.retrieval.dry_run);
    }

    #[test]
    fn test_merge_requires_inputs() {
        assert!(Cli::try_parse_from(["terminal-cli", "merge", "-o", "all.json"]).is_err());
    }
}
