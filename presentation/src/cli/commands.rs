//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use duet_application::DEFAULT_EXPORT_LIMIT;
use duet_domain::ProviderId;
use std::path::PathBuf;

/// Number of history entries listed when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Output format for answers and history
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One colored panel per provider
    Panels,
    /// JSON output
    Json,
}

/// CLI arguments for duet
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(author, version, about = "Ask two chat providers the same question side by side")]
#[command(long_about = r#"
duet sends one question to two chat-completion providers at the same time:
a general-purpose model and a web-search-augmented one. Both answers are
cleaned of markdown, shown next to each other, and saved to a local history.

API keys are read from (in priority order):
1. providers.<slot>.api_key in the config file
2. OPENAI_API_KEY / PERPLEXITY_API_KEY (or the variable named by api_key_env)
3. Keys saved with `duet set-key`

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./duet.toml         Project-level config
3. ~/.config/duet/config.toml   Global config

Example:
  duet ask "What changed in the latest Rust release?"
  echo "Explain ownership" | duet ask -
  duet set-key perplexity pplx-...
  duet history --limit 5
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "panels", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Keep conversations in memory only
    #[arg(long, global = true)]
    pub no_history: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a question to both providers
    Ask {
        /// The question (use `-` to read it from stdin)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List recent conversations
    History {
        /// Maximum number of conversations to list
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },

    /// Show one saved conversation
    Show {
        /// Conversation id (as listed by `history`)
        id: String,
    },

    /// Export recent conversations to a JSON file
    Export {
        /// Destination file
        path: PathBuf,

        /// Maximum number of conversations to export
        #[arg(short, long, default_value_t = DEFAULT_EXPORT_LIMIT)]
        limit: usize,
    },

    /// Save an API key for a provider
    SetKey {
        /// Provider: primary (openai) or search (perplexity)
        provider: ProviderId,

        /// The API key
        secret: String,
    },

    /// Show configuration file locations
    Config,
}

impl Command {
    /// Joined query text for `ask`, or `None` when it should come from stdin.
    pub fn query_text(&self) -> Option<String> {
        match self {
            Command::Ask { query } if query.len() == 1 && query[0] == "-" => None,
            Command::Ask { query } => Some(query.join(" ")),
            _ => None,
        }
    }
}
