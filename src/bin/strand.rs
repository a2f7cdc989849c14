//! Strand CLI: string analysis store with an MCP server.
//!
//! Usage:
//!   strand create <value> [--db path]
//!   strand list [--is-palindrome true] [--min-length N] ... [--db path]
//!   strand query "<natural language>" [--db path]
//!   strand mcp [--transport stdio] [--db path]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use strand::{open_store, AnalysisError, AnalysisService, FilterParams, StrandConfig};

#[derive(Parser)]
#[command(
    name = "strand",
    version,
    about = "String analysis store with structured and natural-language filtering"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file (`:memory:` for a throwaway store)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze and store a string
    Create {
        /// The string to analyze
        value: String,
    },
    /// Show a stored string
    Get {
        /// Exact value to look up
        #[arg(required_unless_present = "id")]
        value: Option<String>,
        /// Look up by id (SHA-256) instead of value
        #[arg(long, conflicts_with = "value")]
        id: Option<String>,
    },
    /// List stored strings, optionally filtered
    List {
        #[arg(long)]
        is_palindrome: Option<bool>,
        #[arg(long, allow_negative_numbers = true)]
        min_length: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        max_length: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        word_count: Option<i64>,
        #[arg(long)]
        contains_character: Option<String>,
    },
    /// List stored strings matching a natural-language query
    Query {
        /// e.g. "palindromes longer than 5 characters"
        text: String,
    },
    /// Delete a stored string
    Delete {
        /// Exact value to delete
        value: String,
    },
    /// Start the MCP (Model Context Protocol) server
    Mcp {
        /// Transport type (currently only stdio)
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn report(err: AnalysisError) -> i32 {
    eprintln!("Error ({}): {}", err.status_code(), err);
    1
}

fn finish<T: Serialize>(result: Result<T, AnalysisError>) -> i32 {
    match result {
        Ok(value) => print_json(&value),
        Err(e) => report(e),
    }
}

fn cmd_create(service: &AnalysisService, value: &str) -> i32 {
    if value.is_empty() {
        return report(AnalysisError::Validation("value must not be empty".into()));
    }
    finish(service.create(value))
}

fn cmd_get(service: &AnalysisService, value: Option<String>, id: Option<String>) -> i32 {
    match (value, id) {
        (_, Some(id)) => finish(service.get_by_id(&id)),
        (Some(value), None) => finish(service.get_by_value(&value)),
        (None, None) => report(AnalysisError::Validation("a value or --id is required".into())),
    }
}

fn cmd_list(service: &AnalysisService, params: FilterParams) -> i32 {
    finish(
        params
            .into_criteria()
            .map_err(AnalysisError::from)
            .and_then(|criteria| service.list_by_filter(criteria)),
    )
}

fn cmd_delete(service: &AnalysisService, value: &str) -> i32 {
    match service.delete_by_value(value) {
        Ok(()) => {
            println!("Deleted '{}'", value);
            0
        }
        Err(e) => report(e),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match StrandConfig::load(cli.config.as_deref()) {
        Ok(c) => c.with_database(cli.db),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    strand::logging::init(&config.log_filter);

    let service = match open_store(&config) {
        Ok(store) => AnalysisService::new(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Create { value } => cmd_create(&service, &value),
        Commands::Get { value, id } => cmd_get(&service, value, id),
        Commands::List {
            is_palindrome,
            min_length,
            max_length,
            word_count,
            contains_character,
        } => cmd_list(
            &service,
            FilterParams {
                is_palindrome,
                min_length,
                max_length,
                word_count,
                contains_character,
            },
        ),
        Commands::Query { text } => finish(service.list_by_natural_language(&text)),
        Commands::Delete { value } => cmd_delete(&service, &value),
        Commands::Mcp { transport } => {
            if transport != "stdio" {
                eprintln!("error: only 'stdio' transport is currently supported");
                std::process::exit(1);
            }
            strand::mcp::run_mcp_server(service)
        }
    };
    std::process::exit(code);
}
