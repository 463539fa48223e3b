//! Triaxis - Three-Axis Coordination Engine
//!
//! CLI entry point for running coordinations against the reference collaborators.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use triaxis::cli::{AxisKind, Cli, Command, OutputFormat};
use triaxis::config::Config;
use triaxis::domain::{
    CompositionRequest, CoordinationRecord, CoordinationRequest, CoordinationResponse, SequenceRequest, ThoughtRequest,
    generate_id,
};
use triaxis::{CoordinatorError, CoordinatorStats};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("triaxis")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("triaxis.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "Triaxis loaded config: max_concurrent={}, timeout_ms={}",
        config.coordinator.max_concurrent_coordinations, config.coordinator.coordination_timeout_ms
    );

    match cli.command {
        Some(Command::Run {
            sessions,
            entity,
            thought,
            timeout_ms,
            format,
        }) => cmd_run(config, sessions, &entity, &thought, timeout_ms, format).await,
        Some(Command::Axis {
            axis,
            entity,
            content,
            format,
        }) => cmd_axis(&config, axis, &entity, &content, format).await,
        Some(Command::Config) => cmd_config(&config),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Submit `sessions` coordinations at once and report the outcome
async fn cmd_run(
    mut config: Config,
    sessions: usize,
    entity: &str,
    thought: &str,
    timeout_ms: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(timeout_ms) = timeout_ms {
        config.coordinator.coordination_timeout_ms = timeout_ms;
    }
    config.validate()?;

    let coordinator = Arc::new(config.reference_builder().build()?);
    let root = CancellationToken::new();
    coordinator.start(root.clone())?;

    let requests: Vec<CoordinationRequest> = (0..sessions)
        .map(|i| CoordinationRequest::new(format!("{}-{}", entity, i)).with_thought(thought, 0))
        .collect();
    info!(count = requests.len(), "Submitting coordinations");

    let outcomes = futures::future::join_all(
        requests
            .into_iter()
            .map(|request| coordinator.coordinate_three_axis(request)),
    )
    .await;

    let stats = coordinator.stats();
    let history = coordinator.coordination_history(0);

    if let Err(e) = coordinator.stop().await {
        warn!("Failed to stop coordinator: {}", e);
    }
    root.cancel();

    match format {
        OutputFormat::Json => print_run_json(&outcomes, &stats, &history)?,
        OutputFormat::Text => print_run_text(&outcomes, &stats, &history),
    }
    Ok(())
}

fn print_run_json(
    outcomes: &[Result<CoordinationResponse, CoordinatorError>],
    stats: &CoordinatorStats,
    history: &[CoordinationRecord],
) -> Result<()> {
    let results: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match outcome {
            Ok(response) => serde_json::json!({
                "ok": true,
                "response": response,
                "quality": response.quality(),
            }),
            Err(e) => serde_json::json!({
                "ok": false,
                "error": e.to_string(),
                "retryable": e.is_retryable(),
            }),
        })
        .collect();

    let output = serde_json::json!({
        "results": results,
        "stats": stats,
        "history": history,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_run_text(
    outcomes: &[Result<CoordinationResponse, CoordinatorError>],
    stats: &CoordinatorStats,
    history: &[CoordinationRecord],
) {
    println!("{}", "Coordinations".bold());
    for outcome in outcomes {
        match outcome {
            Ok(response) => {
                let level = response.sequence.as_ref().map(|s| s.level.to_string());
                let layer = response.composition.as_ref().map(|c| c.layer.clone());
                let depth = response.thought.as_ref().map(|t| format!("{:.2}", t.depth));
                let quality = response
                    .quality()
                    .map(|q| format!("{:.3}", q))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {} {} S={} C={} T={} quality={} ({}ms)",
                    "✓".green(),
                    response.session_id,
                    level.as_deref().unwrap_or("-"),
                    layer.as_deref().unwrap_or("-"),
                    depth.as_deref().unwrap_or("-"),
                    quality,
                    response.process_time_ms
                );
            }
            Err(e) if e.is_retryable() => println!("  {} {}", "↻".yellow(), e),
            Err(e) => println!("  {} {}", "✗".red(), e),
        }
    }

    println!();
    println!("{}", "Stats".bold());
    println!(
        "  admitted={} completed={} failed={} timed_out={} rejected={} peak={}",
        stats.total_admitted,
        stats.total_completed,
        stats.total_failed,
        stats.total_timed_out,
        stats.total_rejected,
        stats.peak_concurrent
    );
    println!(
        "  active={} history={} max_concurrent={}",
        stats.active_coordinations, stats.history_records, stats.max_concurrent_coordinations
    );

    if !history.is_empty() {
        println!();
        println!("{}", "History".bold());
        for record in history {
            let outcome = record.results.first().map(String::as_str).unwrap_or("-");
            println!(
                "  {} {} {} {}",
                record.timestamp.format("%H:%M:%S%.3f").to_string().dimmed(),
                record.actor,
                record.target,
                outcome
            );
        }
    }
}

/// Call one axis processor through the coordinator
async fn cmd_axis(config: &Config, axis: AxisKind, entity: &str, content: &str, format: OutputFormat) -> Result<()> {
    config.validate()?;
    let coordinator = config.reference_builder().build()?;
    let request_id = generate_id("request", entity);

    let value = match axis {
        AxisKind::Sequence => {
            let request = SequenceRequest {
                request_id,
                entity_id: entity.to_string(),
                ..Default::default()
            };
            serde_json::to_value(coordinator.process_sequence_axis(request).await?)?
        }
        AxisKind::Composition => {
            let request = CompositionRequest {
                request_id,
                entity_id: entity.to_string(),
                ..Default::default()
            };
            serde_json::to_value(coordinator.process_composition_axis(request).await?)?
        }
        AxisKind::Thought => {
            let request = ThoughtRequest {
                request_id,
                entity_id: entity.to_string(),
                thought_content: content.to_string(),
                ..Default::default()
            };
            serde_json::to_value(coordinator.process_thought_axis(request).await?)?
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Text => {
            println!("{} {:?} axis for {}", "→".cyan(), axis, entity.bold());
            if let serde_json::Value::Object(fields) = &value {
                for (key, field) in fields {
                    println!("  {}: {}", key, field);
                }
            }
        }
    }
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{}", yaml);
    Ok(())
}
