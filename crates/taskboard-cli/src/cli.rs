use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard - reporting over projects, teams and tasks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema
    InitDb,

    /// Import a JSON graph snapshot
    Import {
        /// Snapshot file
        path: PathBuf,
    },

    /// Run one report, or all of them
    Report {
        /// Report number (1-13) or name
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum rows printed per report
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show row counts
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_arguments() {
        let cli = Cli::parse_from([
            "taskboard",
            "--database-url",
            "sqlite::memory:",
            "report",
            "--query",
            "top-bug-creator",
            "--limit",
            "5",
        ]);

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        match cli.command {
            Commands::Report { query, limit } => {
                assert_eq!(query.as_deref(), Some("top-bug-creator"));
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected report command"),
        }
    }
}
