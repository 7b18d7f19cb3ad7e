//! Runs the code blocks of a markdown document and queries agent graphs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use ave_agents::config::AveConfig;
use ave_agents::executor::{NotebookExecutor, PythonSession};
use ave_agents::primitives::AgentId;
use ave_agents::social::{PeerFinder, SocialGraph};
use clap::{Parser, Subcommand};
use tracing::info;

/// Notebook runner for agent collaboration experiments.
#[derive(Parser)]
#[command(name = "notebook-runner", version)]
#[command(about = "Run markdown code blocks in a persistent Python session and query agent graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Execute every fenced code block of a markdown file, stopping at the first failure
    Run {
        /// Markdown file to execute
        markdown: PathBuf,
    },
    /// List agents within reach of AGENT with their hop distance
    Neighbors {
        /// Graph file (`.toml` or JSON)
        graph: PathBuf,
        /// Starting agent
        agent: String,
        /// Hop limit, overriding the configured neighbor depth
        #[arg(long)]
        depth: Option<usize>,
    },
    /// List agents near AGENT whose skills appear in TASK
    Peers {
        /// Graph file (`.toml` or JSON)
        graph: PathBuf,
        /// Requesting agent
        agent: String,
        /// Task description
        task: String,
        /// Hop limit, overriding the configured search depth
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Print a shortest path between two agents
    Path {
        /// Graph file (`.toml` or JSON)
        graph: PathBuf,
        /// Start agent
        from: String,
        /// End agent
        to: String,
    },
    /// Print the graph as nodes and links for visualisation
    Snapshot {
        /// Graph file (`.toml` or JSON)
        graph: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = ave_agents::config::load(cli.config.as_deref())?;
    ave_agents::telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Run { markdown } => run(&config, &markdown).await,
        Command::Neighbors {
            graph,
            agent,
            depth,
        } => {
            let graph = load_graph(&graph)?;
            for (id, hops) in neighbors(&config, &graph, &agent, depth)? {
                println!("{id}\t{hops}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Peers {
            graph,
            agent,
            task,
            depth,
        } => {
            let graph = load_graph(&graph)?;
            let finder = PeerFinder::new(&graph)
                .with_search_depth(depth.unwrap_or(config.social.search_depth));
            for peer in finder.find(&task, &agent)? {
                println!("{peer}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Path { graph, from, to } => {
            let graph = load_graph(&graph)?;
            match graph.get_path(&from, &to)? {
                Some(path) => {
                    let hops: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
                    println!("{}", hops.join(" -> "));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("no path from {from} to {to}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Snapshot { graph } => {
            let graph = load_graph(&graph)?;
            println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run(config: &AveConfig, markdown: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(markdown)
        .with_context(|| format!("failed to read {}", markdown.display()))?;

    let session = PythonSession::start(config.executor.session_config())
        .context("failed to start interpreter")?;
    info!(session = %session.id(), file = %markdown.display(), "executing notebook");

    let executor = NotebookExecutor::new(session);
    let result = executor.execute_markdown(&text).await;
    print!("{}", result.output);
    if !result.output.ends_with('\n') && !result.output.is_empty() {
        println!();
    }
    info!(exit_code = result.exit_code, "notebook finished");
    Ok(ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)))
}

fn neighbors(
    config: &AveConfig,
    graph: &SocialGraph,
    agent: &str,
    depth: Option<usize>,
) -> Result<Vec<(AgentId, usize)>> {
    let depth = depth.unwrap_or(config.social.neighbor_depth);
    Ok(graph.neighbor_distances(agent, depth)?)
}

fn load_graph(path: &Path) -> Result<SocialGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    let graph = if path.extension().is_some_and(|ext| ext == "toml") {
        SocialGraph::from_toml(&text)
    } else {
        SocialGraph::from_json(&text)
    }
    .with_context(|| format!("failed to load graph from {}", path.display()))?;
    info!(
        agents = graph.agent_count(),
        links = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const CHAIN: &str = r#"{
        "A": { "skills": ["python"], "links": ["B"] },
        "B": { "skills": ["rust"], "links": ["C"] },
        "C": { "skills": ["data analysis"] }
    }"#;

    fn hops(found: &[(AgentId, usize)]) -> Vec<(&str, usize)> {
        found.iter().map(|(id, hops)| (id.as_str(), *hops)).collect()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn neighbors_use_configured_depth() {
        let graph = SocialGraph::from_json(CHAIN).expect("graph");
        let mut config = AveConfig::default();

        let found = neighbors(&config, &graph, "A", None).expect("neighbors");
        assert_eq!(hops(&found), [("A", 0), ("B", 1)]);

        config.social.neighbor_depth = 2;
        let found = neighbors(&config, &graph, "A", None).expect("neighbors");
        assert_eq!(hops(&found), [("A", 0), ("B", 1), ("C", 2)]);
    }

    #[test]
    fn explicit_depth_overrides_config() {
        let graph = SocialGraph::from_json(CHAIN).expect("graph");
        let config = AveConfig::default();
        let found = neighbors(&config, &graph, "A", Some(0)).expect("neighbors");
        assert_eq!(hops(&found), [("A", 0)]);
        assert!(neighbors(&config, &graph, "Z", None).is_err());
    }

    #[test]
    fn parses_neighbors_subcommand() {
        let cli = Cli::try_parse_from(["notebook-runner", "neighbors", "team.json", "A"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Neighbors { depth: None, ref agent, .. } if agent == "A"
        ));
    }
}
