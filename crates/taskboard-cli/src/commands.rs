use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::Commands;
use crate::config::Settings;
use taskboard_core::{EntityGraph, GraphSnapshot, GraphSource, ReportKind, ReportOutput, Reports};
use taskboard_db::Database;

pub async fn execute(command: Commands, db: &Database, settings: &Settings) -> Result<()> {
    match command {
        Commands::InitDb => {
            db.init_schema().await?;
            println!("✓ Database schema created");
        }

        Commands::Import { path } => {
            let graph = read_snapshot(&path)?;

            db.init_schema().await?;
            db.import_snapshot(&graph).await?;

            println!("✓ Imported {}", path.display());
            println!("  Projects: {}", graph.projects().len());
            println!("  Teams: {}", graph.teams().len());
            println!("  Users: {}", graph.users().len());
            println!("  Tasks: {}", graph.tasks().len());
            println!("  Tags: {}", graph.tags().len());
            println!("  Comments: {}", graph.comments().len());
        }

        Commands::Report { query, limit } => {
            let kinds = match query {
                Some(query) => vec![query.parse::<ReportKind>()?],
                None => ReportKind::ALL.to_vec(),
            };
            let limit = limit.or(settings.report.limit);

            let source: &dyn GraphSource = db;
            let graph = source.load_graph().await?;
            tracing::info!(
                "Loaded graph: {} projects, {} tasks, {} comments",
                graph.projects().len(),
                graph.tasks().len(),
                graph.comments().len()
            );
            let reports = Reports::new(&graph);

            for kind in kinds {
                print_report(reports.run(kind), limit)?;
            }
        }

        Commands::Stats => {
            let counts = db.get_table_counts().await?;

            println!("Taskboard Statistics:");
            println!("  Projects: {}", counts.projects);
            println!("  Teams: {}", counts.teams);
            println!("  Users: {}", counts.users);
            println!("  Tasks: {}", counts.tasks);
            println!("  Tags: {}", counts.tags);
            println!("  Comments: {}", counts.comments);
            println!("  Task tags: {}", counts.task_tags);
            println!("  Project members: {}", counts.project_members);
            println!("  Team members: {}", counts.team_members);
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<EntityGraph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = GraphSnapshot::from_json(&json)
        .with_context(|| format!("Invalid snapshot in {}", path.display()))?;

    Ok(EntityGraph::from_snapshot(snapshot)?)
}

fn print_report(output: ReportOutput, limit: Option<usize>) -> Result<()> {
    let kind = output.kind();
    let total = output.len();
    let output = match limit {
        Some(limit) => output.truncated(limit),
        None => output,
    };

    println!("{}", heading(kind, output.len(), total));
    println!("{}", render_rows(&output)?);
    println!();

    Ok(())
}

fn heading(kind: ReportKind, shown: usize, total: usize) -> String {
    if shown < total {
        format!(
            "--- {}. {} (showing {} of {}) ---",
            kind.number(),
            kind.title(),
            shown,
            total
        )
    } else {
        format!("--- {}. {} ---", kind.number(), kind.title())
    }
}

/// Pretty JSON of the rows alone; the heading already names the report.
fn render_rows(output: &ReportOutput) -> Result<String> {
    let mut value = serde_json::to_value(output)?;
    let rows = value
        .get_mut("rows")
        .map(serde_json::Value::take)
        .unwrap_or(serde_json::Value::Null);

    Ok(serde_json::to_string_pretty(&rows)?)
}
