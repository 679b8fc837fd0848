mod render;
mod script;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use bayes_net::{format_evidence, load_network, parse_evidence, Enumeration, Network};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::script::{parse_script, ScriptItem};

/// Directory tried first when resolving a script name.
const SCRIPT_DIR: &str = "tests";

#[derive(Parser)]
#[command(name = "bayes")]
#[command(about = "Exact inference over discrete Bayesian networks", long_about = None)]
#[command(version)]
struct Cli {
    /// Edge list: one `Parent Child` pair per line
    #[arg(long, global = true, default_value = "data/edges.txt")]
    edges: PathBuf,

    /// CPT blocks
    #[arg(long, global = true, default_value = "data/cpts.txt")]
    cpts: PathBuf,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the network structure and its probability tables
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compute P(VARIABLE | evidence)
    Query {
        /// Query variable
        variable: String,
        /// Observed values, e.g. "Rain=light,Maintenance=no"
        #[arg(short, long, default_value = "")]
        evidence: String,
        /// Refuse networks with more variables than this
        #[arg(long)]
        max_depth: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run every query of a script (looked up under tests/ first)
    Run {
        /// Script name or path
        script: String,
    },
    /// Fail if any probability table does not sum to one
    Check,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(edges: &Path, cpts: &Path) -> Result<Network> {
    let net = load_network(edges, cpts).with_context(|| {
        format!(
            "failed to load network from {} and {}",
            edges.display(),
            cpts.display()
        )
    })?;
    info!(variables = net.len(), "Network loaded");
    Ok(net)
}

/// Look for `dir/<name>` first, then `name` as given.
fn read_script(dir: &Path, name: &str) -> Result<(PathBuf, String)> {
    let candidates = [dir.join(name), PathBuf::from(name)];
    for path in &candidates {
        match fs::read_to_string(path) {
            Ok(text) => return Ok((path.clone(), text)),
            Err(e) => debug!(path = %path.display(), error = %e, "Script not readable"),
        }
    }
    bail!(
        "script not found: tried {}",
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Outcome of one script run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScriptReport {
    cases: usize,
    failures: usize,
}

impl ScriptReport {
    fn exit_code(&self) -> ExitCode {
        if self.failures > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Run every case of a script. A failing case is reported and the run goes on.
fn run_script(net: &Network, dir: &Path, name: &str) -> Result<ScriptReport> {
    let (path, text) = read_script(dir, name)?;
    println!("Reading queries from {}", path.display());

    let engine = Enumeration::new(net);
    let mut report = ScriptReport::default();
    for item in parse_script(&text) {
        match item {
            ScriptItem::Diagnostic { line, message } => {
                println!("Line {}: {}", line, message);
            }
            ScriptItem::Case {
                line,
                query,
                evidence,
            } => {
                report.cases += 1;
                println!();
                println!("Case (line {}): P({} | {})", line, query, format_evidence(&evidence));
                match engine.ask(&query, &evidence) {
                    Ok(dist) => print!("{}", render::posterior(&query, &evidence, &dist)),
                    Err(e) => {
                        report.failures += 1;
                        println!("Error: {}", e);
                    }
                }
            }
        }
    }

    if report.failures > 0 {
        eprintln!("{} of {} case(s) failed", report.failures, report.cases);
    }
    Ok(report)
}

/// Fail when any CPT row set does not sum to one; otherwise the table count.
fn check(net: &Network) -> Result<usize> {
    let issues = net.cpt_issues();
    for issue in &issues {
        eprintln!("{}", issue);
    }
    if !issues.is_empty() {
        bail!("{} probability table row set(s) do not sum to one", issues.len());
    }
    Ok(net.len())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let net = load(&cli.edges, &cli.cpts)?;

    match cli.command {
        Commands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&net)?);
            } else {
                print!("{}", render::network(&net));
            }
        }
        Commands::Query {
            variable,
            evidence,
            max_depth,
            json,
        } => {
            let evidence = parse_evidence(&evidence).context("invalid --evidence")?;
            let mut engine = Enumeration::new(&net);
            if let Some(depth) = max_depth {
                engine = engine.with_max_depth(depth);
            }
            let dist = engine
                .ask(&variable, &evidence)
                .with_context(|| format!("query for '{}' failed", variable))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dist)?);
            } else {
                print!("{}", render::posterior(&variable, &evidence, &dist));
            }
        }
        Commands::Run { script } => {
            return Ok(run_script(&net, Path::new(SCRIPT_DIR), &script)?.exit_code());
        }
        Commands::Check => {
            let tables = check(&net)?;
            println!("All {} probability tables are normalized", tables);
        }
    }

    Ok(ExitCode::SUCCESS)
}
