//! Command-line interface for cce
//!
//! Five verbs mirroring the pipeline stages. Every verb takes a client
//! directory; all but `ingest` take a month token in `YYYY-MM` form.
//! Each verb fails fast with a descriptive message when its predecessor
//! artifact is missing.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cce_engine::{run_export, run_generate, run_ingest, run_plan, run_review};
use cce_kb::ChunkParams;
use cce_llm::mode_from_env;
use cce_utils::{EngineError, ExitCode};

/// cce - clinic content pipeline
#[derive(Parser)]
#[command(name = "cce")]
#[command(about = "Retrieval-grounded social content drafts with guardrail review")]
#[command(long_about = r#"
cce turns raw clinic source documents into compliance-checked social media
content for a given month.

EXAMPLES:
  # Build the retrieval corpus from sources/
  cce ingest --client clients/avalon

  # Plan, draft, review, and export a month
  cce plan --client clients/avalon --month 2025-06
  cce generate --client clients/avalon --month 2025-06
  cce review --client clients/avalon --month 2025-06
  cce export --client clients/avalon --month 2025-06

BACKEND:
  Generation uses a live backend when OPENAI_API_KEY is set and a
  deterministic offline stub otherwise. Review follows the same switch:
  violating drafts are rewritten by the live backend (status FIXED) or
  locally patched and flagged (status FAIL).
"#)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Ingest source documents into the chunk store
    ///
    /// Walks <client>/sources for .txt/.md files and writes
    /// kb/kb_chunks.jsonl with overlapping, deterministically-id'd chunks.
    Ingest {
        /// Path to the client directory, e.g. clients/avalon
        #[arg(long)]
        client: PathBuf,
    },

    /// Create the monthly content plan
    Plan {
        /// Path to the client directory
        #[arg(long)]
        client: PathBuf,

        /// Month in YYYY-MM format
        #[arg(long)]
        month: String,
    },

    /// Generate drafts for the monthly plan
    Generate {
        /// Path to the client directory
        #[arg(long)]
        client: PathBuf,

        /// Month in YYYY-MM format
        #[arg(long)]
        month: String,
    },

    /// Review and fix drafts against the guardrail profile
    Review {
        /// Path to the client directory
        #[arg(long)]
        client: PathBuf,

        /// Month in YYYY-MM format
        #[arg(long)]
        month: String,
    },

    /// Export deliverables and the audit log
    Export {
        /// Path to the client directory
        #[arg(long)]
        client: PathBuf,

        /// Month in YYYY-MM format
        #[arg(long)]
        month: String,
    },
}

/// Main CLI entry point.
///
/// Parses arguments, runs the requested stage, and prints the summary.
/// All error output happens here; the caller only maps the returned
/// exit code to a process exit.
///
/// # Errors
///
/// Returns the exit code for any failed stage.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    // A second init only happens in tests; ignore it.
    let _ = cce_utils::logging::init_tracing(cli.verbose);

    execute(cli.command).map_err(|err| {
        eprintln!("error: {err}");
        err.to_exit_code()
    })
}

fn execute(command: Commands) -> Result<(), EngineError> {
    match command {
        Commands::Ingest { client } => {
            let client_dir = validate_client_dir(&client)?;
            let summary = run_ingest(&client_dir, &ChunkParams::default())?;
            println!(
                "Ingest complete: {} source files -> {} chunks",
                summary.source_files, summary.chunks
            );
            println!("Wrote {}", summary.out_path.display());
        }
        Commands::Plan { client, month } => {
            let client_dir = validate_client_dir(&client)?;
            let summary = run_plan(&client_dir, &month)?;
            println!("Plan complete: {} posts for {}", summary.posts, summary.month);
            println!("Wrote {}", summary.out_path.display());
        }
        Commands::Generate { client, month } => {
            let client_dir = validate_client_dir(&client)?;
            cce_engine::parse_month(&month)?;
            let backend = cce_llm::backend_from_env()?;
            let summary =
                runtime()?.block_on(run_generate(&client_dir, &month, backend.as_ref()))?;
            println!(
                "Generate complete: {} drafts ({} mode)",
                summary.drafts, summary.mode
            );
            println!("Wrote {}", summary.out_path.display());
        }
        Commands::Review { client, month } => {
            let client_dir = validate_client_dir(&client)?;
            cce_engine::parse_month(&month)?;
            let backend = cce_llm::backend_from_env()?;
            let summary = runtime()?.block_on(run_review(&client_dir, &month, backend.as_ref()))?;
            println!(
                "Review complete: {}/{} compliant",
                summary.compliant, summary.total
            );
            println!("Wrote {}", summary.out_path.display());
        }
        Commands::Export { client, month } => {
            let client_dir = validate_client_dir(&client)?;
            cce_engine::parse_month(&month)?;
            let summary = run_export(&client_dir, &month, mode_from_env())?;
            println!("Export complete: {} posts exported", summary.posts);
            println!("Wrote {}", summary.posts_csv.display());
            println!("Wrote {}", summary.reels_txt.display());
            println!("Wrote {}", summary.audit_json.display());
        }
    }
    Ok(())
}

fn validate_client_dir(path: &Path) -> Result<PathBuf, EngineError> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(EngineError::Config(format!(
            "Client directory not found: {}",
            path.display()
        )))
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, EngineError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(EngineError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_client_dir_is_a_config_error() {
        let err = validate_client_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.to_exit_code(), ExitCode::ConfigError);
    }

    #[test]
    fn verbs_parse_with_client_and_month() {
        let cli = Cli::try_parse_from([
            "cce", "generate", "--client", "clients/avalon", "--month", "2025-06",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { client, month } => {
                assert_eq!(client, PathBuf::from("clients/avalon"));
                assert_eq!(month, "2025-06");
            }
            _ => panic!("expected generate"),
        }
    }
}
