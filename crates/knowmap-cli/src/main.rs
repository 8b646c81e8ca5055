//! KnowMap CLI - Command-line interface
//!
//! Usage:
//!   knowmap extract --text <file|-> [--tokens <file>] [--output <file>] [--plot]
//!   knowmap build --relations <file> [--domain <d>] [--plot] [--no-browser]
//!   knowmap demo [--domain <d>]
//!   knowmap render --graph <graph.json> [--domain <d>] [--plot]

mod demo;
mod present;

use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use knowmap_core::{KnowMapConfig, LoggingConfig};
use knowmap_extractor::{load_token_file, CommandParser, Pipeline};
use knowmap_graph::{KnowledgeGraph, ALL_DOMAINS};

use crate::present::Outputs;

#[derive(Parser)]
#[command(name = "knowmap")]
#[command(about = "Cross-domain knowledge graph builder")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract triples from text
    Extract {
        /// Text file to analyze ("-" reads stdin)
        #[arg(long, required_unless_present = "tokens", conflicts_with = "tokens")]
        text: Option<String>,
        /// Pre-parsed token stream (.json or .conllu)
        #[arg(long)]
        tokens: Option<PathBuf>,
        /// Write extracted relation records to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Draw the static plot of the extracted relations
        #[arg(long)]
        plot: bool,
        /// Do not open the plot viewer
        #[arg(long)]
        no_browser: bool,
    },
    /// Build a graph from relation records
    Build {
        /// JSON array of {subject, relation, object} records
        #[arg(long)]
        relations: PathBuf,
        /// Domain to keep ("all" keeps everything)
        #[arg(long, default_value = ALL_DOMAINS)]
        domain: String,
        /// Also draw the static plot
        #[arg(long)]
        plot: bool,
        /// Do not open the browser or viewer
        #[arg(long)]
        no_browser: bool,
    },
    /// Run the built-in cross-domain demo
    Demo {
        /// Domain to keep; prompted for when omitted
        #[arg(long)]
        domain: Option<String>,
        /// Also draw the static plot
        #[arg(long)]
        plot: bool,
        /// Do not open the browser or viewer
        #[arg(long)]
        no_browser: bool,
    },
    /// Re-render an exported node-link graph
    Render {
        /// Node-link JSON file
        #[arg(long)]
        graph: PathBuf,
        /// Domain to keep ("all" keeps everything)
        #[arg(long, default_value = ALL_DOMAINS)]
        domain: String,
        /// Also draw the static plot
        #[arg(long)]
        plot: bool,
        /// Do not open the browser or viewer
        #[arg(long)]
        no_browser: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract {
            text,
            tokens,
            output,
            plot,
            no_browser,
        } => run_extract(
            &config,
            text.as_deref(),
            tokens.as_deref(),
            output.as_deref(),
            Outputs {
                plot,
                open: config.output.open_browser && !no_browser,
                ..Outputs::default()
            },
        ),
        Commands::Build {
            relations,
            domain,
            plot,
            no_browser,
        } => {
            let triples = knowmap_core::load_relation_records(&relations)
                .with_context(|| format!("loading relations from {}", relations.display()))?;
            let graph = knowmap_graph::build(&triples, &config.domains);
            show_and_write(&graph, &domain, &config, graph_outputs(&config, plot, no_browser))
        }
        Commands::Demo {
            domain,
            plot,
            no_browser,
        } => run_demo(&config, domain, graph_outputs(&config, plot, no_browser)),
        Commands::Render {
            graph,
            domain,
            plot,
            no_browser,
        } => {
            let loaded = KnowledgeGraph::import_json(&graph)
                .with_context(|| format!("loading graph from {}", graph.display()))?;
            let outputs = Outputs {
                json: false,
                ..graph_outputs(&config, plot, no_browser)
            };
            show_and_write(&loaded, &domain, &config, outputs)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<KnowMapConfig> {
    let config = match path {
        Some(path) => KnowMapConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => KnowMapConfig::default(),
    };
    Ok(config.with_env_override()?)
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("knowmap={}", config.level).into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn graph_outputs(config: &KnowMapConfig, plot: bool, no_browser: bool) -> Outputs {
    Outputs {
        html: true,
        json: true,
        plot,
        open: config.output.open_browser && !no_browser,
    }
}

fn read_text(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
}

fn run_extract(
    config: &KnowMapConfig,
    text: Option<&str>,
    tokens: Option<&Path>,
    output: Option<&Path>,
    outputs: Outputs,
) -> anyhow::Result<()> {
    println!("=== NLP Pipeline for Cross-Domain Knowledge Mapping ===\n");

    let pipeline = Pipeline::new();
    let result = match (tokens, text) {
        (Some(path), _) => {
            let document = load_token_file(path)
                .with_context(|| format!("loading tokens from {}", path.display()))?;
            pipeline.analyze(&document)
        }
        (None, Some(source)) => {
            let parser = CommandParser::from_command(&config.parser.command).context(
                "no dependency parser configured: set [parser] command or KNOWMAP_PARSER_CMD, or pass --tokens",
            )?;
            pipeline.run(&parser, &read_text(source)?)?
        }
        (None, None) => anyhow::bail!("either --text or --tokens is required"),
    };

    print!("{}", present::pipeline_report(&result));

    if let Some(path) = output {
        knowmap_core::save_relation_records(path, &result.relations)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nRelations written to {}", path.display());
    }

    if !result.has_relations() {
        println!("\n{}", present::NO_RELATIONS);
        return Ok(());
    }

    if outputs.plot {
        let graph = knowmap_graph::build(&result.relations, &config.domains);
        present::write_outputs(&graph, config, outputs)?;
    }
    Ok(())
}

fn run_demo(
    config: &KnowMapConfig,
    domain: Option<String>,
    outputs: Outputs,
) -> anyhow::Result<()> {
    println!("=== Cross-Domain Knowledge Graph Demo ===\n");

    let mut domains = demo::demo_domains();
    domains.extend(config.domains.clone());
    let graph = knowmap_graph::build(&demo::demo_triples(), &domains);

    let domain = match domain {
        Some(domain) => domain,
        None => {
            print!("{}", present::graph_listing(&graph));
            println!(
                "\nAvailable Domains: {}",
                present::available_domains(&graph).join(", ")
            );
            prompt_domain(&mut std::io::stdin().lock())?
        }
    };

    show_and_write(&graph, &domain, config, outputs)
}

/// Ask for a domain on stdout and read one line; blank input means "All"
fn prompt_domain(input: &mut impl BufRead) -> anyhow::Result<String> {
    print!("Enter domain to filter (type All for full graph): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("reading domain choice")?;
    let choice = line.trim();
    Ok(if choice.is_empty() {
        ALL_DOMAINS.to_string()
    } else {
        choice.to_string()
    })
}

fn show_and_write(
    graph: &KnowledgeGraph,
    domain: &str,
    config: &KnowMapConfig,
    outputs: Outputs,
) -> anyhow::Result<()> {
    let filtered = graph.filter_by_domain(domain);
    print!("\n{}", present::graph_listing(&filtered));

    if filtered.is_empty() {
        tracing::warn!(domain = %domain, "no nodes match the selected domain");
        println!("\nNo nodes in domain \"{domain}\"; writing an empty graph.");
    }

    present::write_outputs(&filtered, config, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "knowmap",
            "build",
            "--relations",
            "relations.json",
            "--domain",
            "Medical",
            "--no-browser",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                relations,
                domain,
                plot,
                no_browser,
            } => {
                assert_eq!(relations, PathBuf::from("relations.json"));
                assert_eq!(domain, "Medical");
                assert!(!plot);
                assert!(no_browser);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_build_domain_defaults_to_all() {
        let cli = Cli::try_parse_from(["knowmap", "build", "--relations", "r.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { domain, .. } if domain == ALL_DOMAINS));
    }

    #[test]
    fn test_extract_needs_input() {
        assert!(Cli::try_parse_from(["knowmap", "extract"]).is_err());
        assert!(Cli::try_parse_from(["knowmap", "extract", "--text", "-"]).is_ok());
        assert!(Cli::try_parse_from(["knowmap", "extract", "--tokens", "t.json"]).is_ok());
        assert!(Cli::try_parse_from([
            "knowmap", "extract", "--text", "-", "--tokens", "t.json"
        ])
        .is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["knowmap", "demo", "--config", "knowmap.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("knowmap.toml")));
    }

    #[test]
    fn test_prompt_domain() {
        let mut input = Cursor::new("Technology\n");
        assert_eq!(prompt_domain(&mut input).unwrap(), "Technology");

        let mut blank = Cursor::new("\n");
        assert_eq!(prompt_domain(&mut blank).unwrap(), ALL_DOMAINS);

        let mut eof = Cursor::new("");
        assert_eq!(prompt_domain(&mut eof).unwrap(), ALL_DOMAINS);
    }

    #[test]
    fn test_extract_from_tokens_writes_records() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = dir.path().join("tokens.json");
        let output = dir.path().join("relations.json");
        std::fs::write(
            &tokens,
            r#"{"sentences": [{"tokens": [
                {"text": "AI", "pos": "PROPN", "dep": "nsubj"},
                {"text": "improves", "pos": "VERB", "dep": "ROOT"},
                {"text": "healthcare", "pos": "NOUN", "dep": "dobj"}
            ]}]}"#,
        )
        .unwrap();

        run_extract(
            &KnowMapConfig::default(),
            None,
            Some(&tokens),
            Some(&output),
            Outputs::default(),
        )
        .unwrap();

        let records = knowmap_core::load_relation_records(&output).unwrap();
        assert_eq!(
            records,
            vec![knowmap_core::Triple::new("AI", "improves", "healthcare")]
        );
    }

    #[test]
    fn test_extract_text_without_parser_fails() {
        let err = run_extract(
            &KnowMapConfig::default(),
            Some("-"),
            None,
            None,
            Outputs::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no dependency parser configured"));
    }

    #[test]
    fn test_demo_writes_filtered_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = KnowMapConfig::default();
        config.output.html_path = dir.path().join("graph.html");
        config.output.json_path = dir.path().join("graph.json");

        run_demo(
            &config,
            Some("medical".to_string()),
            Outputs {
                html: true,
                json: true,
                ..Outputs::default()
            },
        )
        .unwrap();

        let exported = KnowledgeGraph::import_json(&config.output.json_path).unwrap();
        assert_eq!(exported.node_count(), 3);
        assert!(exported.nodes().all(|n| n.domain == "Medical"));
        assert!(config.output.html_path.exists());
    }
}
