mod dot;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use spaceline_core::{Config, SpaceTimeGraph};

#[derive(Parser)]
#[command(name = "spaceline")]
#[command(about = "Causality graphs from vector-clock traces", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "spaceline.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the causality graph and print it as JSON or DOT
    Render {
        /// Trace file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Hide a host; may be given multiple times
        #[arg(long = "hide", value_name = "HOST")]
        hide: Vec<String>,

        /// Override output format from config ("json" or "dot")
        #[arg(short, long)]
        format: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List hosts with their event counts
    Hosts {
        /// Trace file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show graph statistics
    Stats {
        /// Trace file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a trace and report whether it is well-formed
    Check {
        /// Trace file (reads stdin when omitted)
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct HostEntry {
    host: String,
    events: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };
    config.validate()?;

    init_tracing(&config);
    tracing::debug!(path = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Render {
            input,
            hide,
            format,
            pretty,
            output,
        } => {
            let lines = read_trace(input.as_deref())?;
            let graph = build_graph(&lines)?;
            let hidden = hidden_hosts(&config, &hide);
            let view = graph.view(&hidden)?;

            let format = format.unwrap_or_else(|| config.output.format.clone());
            let pretty = pretty || config.output.pretty;
            let rendered = match format.as_str() {
                "json" if pretty => serde_json::to_string_pretty(&view)?,
                "json" => serde_json::to_string(&view)?,
                "dot" => dot::render(&view),
                other => anyhow::bail!("Invalid output format: {}", other),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered + "\n")
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!(
                        "💾 Wrote {} nodes and {} edges to {:?}",
                        view.nodes.len(),
                        view.edges.len(),
                        path
                    );
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Hosts { input, json } => {
            let lines = read_trace(input.as_deref())?;
            let graph = build_graph(&lines)?;
            let view = graph.view(&HashSet::new())?;

            let entries: Vec<HostEntry> = view.hosts
                .iter()
                .map(|host| HostEntry {
                    host: host.clone(),
                    events: graph
                        .index()
                        .events_of(host)
                        .filter(|event| !event.is_start())
                        .count(),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("🖥  Hosts ({})", entries.len());
                println!("{:<24} {:>8}", "HOST", "EVENTS");
                for entry in entries {
                    println!("{:<24} {:>8}", entry.host, entry.events);
                }
            }
        }

        Commands::Stats { input, json } => {
            let lines = read_trace(input.as_deref())?;
            let graph = build_graph(&lines)?;
            let stats = graph.stats()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("📊 Graph statistics");
                println!("   Hosts:        {}", stats.hosts);
                println!("   Events:       {}", stats.events);
                println!("   Start events: {}", stats.start_events);
                println!(
                    "   Edges:        {} ({} process, {} message)",
                    stats.edges, stats.process_edges, stats.message_edges
                );
                println!(
                    "   Acyclic:      {}",
                    if stats.is_acyclic { "yes" } else { "NO" }
                );
            }
        }

        Commands::Check { input } => {
            let lines = read_trace(input.as_deref())?;
            let graph = build_graph(&lines)?;
            let stats = graph.stats()?;
            println!(
                "✅ Trace OK: {} hosts, {} events, {} edges",
                stats.hosts, stats.events, stats.edges
            );
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    // Logs go to stderr so piped JSON/DOT output stays clean.
    tracing_subscriber::fmt()
        .with_target(config.logging.include_modules)
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn read_trace(path: Option<&Path>) -> Result<Vec<String>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace from {:?}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read trace from stdin")?;
            buffer
        }
    };
    Ok(text.lines().map(str::to_string).collect())
}

fn build_graph(lines: &[String]) -> Result<SpaceTimeGraph> {
    let mut graph = SpaceTimeGraph::new();
    graph.parse_log(lines)?;
    graph.generate_edges()?;
    Ok(graph)
}

fn hidden_hosts(config: &Config, hide: &[String]) -> HashSet<String> {
    config
        .render
        .hidden_hosts
        .iter()
        .chain(hide.iter())
        .cloned()
        .collect()
}
