//! named-param — rewrite and run named-parameter SQL
//!
//! # Usage
//!
//! ```bash
//! # Show the positional SQL and ordered values
//! named-param "SELECT * FROM users WHERE id = :id" id 42 --dry-run
//!
//! # Execute against a database
//! named-param "SELECT * FROM users WHERE name LIKE :name" name '%Smith%' \
//!     --database-url sqlite://app.db
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use named_param::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "named-param")]
#[command(version)]
#[command(about = "Rewrite :named SQL parameters to positional markers", long_about = None)]
#[command(after_help = "EXAMPLES:
    named-param 'SELECT * FROM t WHERE a = :a' a 1 --dry-run
    named-param 'UPDATE t SET b = :b WHERE a = :a' a 1 b text --placeholder numbered
    named-param explain \"SELECT * FROM t WHERE a = :a AND b = ':a'\"")]
struct Cli {
    /// The query to run
    query: Option<String>,

    /// Flat argument list: name value [name value ...]
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,

    /// Don't execute, just show the rewritten SQL and values
    #[arg(short, long)]
    dry_run: bool,

    /// Marker style: question (?) or numbered ($1)
    #[arg(short, long)]
    placeholder: Option<PlaceholderStyle>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Database connection URL
    #[arg(long, env = "NAMED_PARAM_DATABASE_URL")]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a query is rewritten
    Explain {
        /// The query to explain
        query: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain { query }) => {
            load_config(&cli).map(|config| explain_query(query, &config))
        }
        None => match &cli.query {
            Some(query) => run_query(query, &cli).await,
            None => {
                println!(
                    "{}",
                    "named-param — :named parameters for positional drivers"
                        .cyan()
                        .bold()
                );
                println!();
                println!("Usage: named-param <QUERY> [NAME VALUE]... [OPTIONS]");
                println!();
                println!("Try: named-param --help");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "named_param=debug" } else { "named_param=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// File config, then environment, then flags.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut builder = ConfigBuilder::from_config(Config::load()?);
    if let Some(url) = &cli.database_url {
        builder = builder.database(url);
    }
    if let Some(style) = cli.placeholder {
        builder = builder.placeholder(style);
    }
    Ok(builder.build())
}

fn cli_arguments(args: &[String]) -> Arguments {
    Arguments::List(args.iter().map(|a| ParamValue::infer(a)).collect())
}

async fn run_query(query: &str, cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    if cli.verbose {
        println!("{} {}", "Input:".dimmed(), query.yellow());
    }

    // Argument errors surface before any connection is made.
    let bound = named_param::engine::bind(query, cli_arguments(&cli.args), config.placeholder)?;

    if cli.dry_run || config.database_url.is_none() {
        println!("{}", "Rewritten SQL:".green().bold());
        println!("{}", bound.sql.white());

        if !bound.values.is_empty() {
            println!();
            println!("{}", "Values:".cyan());
            for (i, value) in bound.values.iter().enumerate() {
                println!("  {} = {}", i + 1, value.to_string().yellow());
            }
        }

        if config.database_url.is_none() && !cli.dry_run {
            println!();
            println!(
                "{}",
                "⚠ No database URL. Use --database-url or set NAMED_PARAM_DATABASE_URL".yellow()
            );
        }
        return Ok(());
    }

    if cli.verbose {
        if let Some(url) = &config.database_url {
            println!("{} {}", "Connecting to:".dimmed(), url);
        }
    }

    let db = NamedDb::connect_with(&config).await?;
    let args = cli_arguments(&cli.args);

    if returns_rows(query) {
        let results = db.fetch_all(query, args).await?;
        format_output(&results, &cli.format);
    } else {
        let affected = db.execute(query, args).await?;
        println!("{} {} rows affected", "✓".green(), affected);
    }

    Ok(())
}

fn returns_rows(query: &str) -> bool {
    let head = query.trim_start().to_ascii_uppercase();
    ["SELECT", "WITH", "VALUES", "PRAGMA", "SHOW", "EXPLAIN"]
        .iter()
        .any(|kw| head.starts_with(kw))
        || head.contains(" RETURNING ")
}

fn format_output(results: &[Row], format: &OutputFormat) {
    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results).unwrap_or_default());
        }
        OutputFormat::Table => {
            let mut columns: Vec<&String> = results[0].keys().collect();
            columns.sort();

            let widths: Vec<usize> = columns
                .iter()
                .map(|c| {
                    results
                        .iter()
                        .filter_map(|row| row.get(*c))
                        .map(|v| val_to_string(v).chars().count())
                        .fold(c.chars().count(), usize::max)
                })
                .collect();

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in results {
                let cells: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| {
                        let val = row.get(*c).map(val_to_string).unwrap_or_default();
                        format!("{:width$}", val, width = *w)
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", results.len().to_string().cyan());
        }
    }
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn explain_query(query: &str, config: &Config) {
    println!("{}", "Named Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), query.yellow());
    println!();

    let parsed = parse_with(query, config.placeholder);

    println!("{}", "Rewritten SQL:".green().bold());
    println!("  {}", parsed.sql().white());
    println!();

    if parsed.has_params() {
        println!("{}", "Occurrences:".green().bold());
        for (i, name) in parsed.occurrences().iter().enumerate() {
            println!("  {:>3}  :{}", (i + 1).to_string().dimmed(), name.cyan());
        }
        println!();
        println!(
            "{} {}",
            "Distinct names:".dimmed(),
            parsed.names().join(", ").white()
        );
    } else {
        println!("{}", "(no named parameters)".dimmed());
    }
}
