use anyhow::{Context, Result};
use astpath::config::{load_from_path, run_plan, RunError};
use astpath::ts::lang::path_matches_language;
use astpath::{
    language_for_path, language_from_name, Document, ExtractOptions, ParseOptions, QueryKind,
    SourceInput, SupportLang, DEFAULT_LANGUAGE,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "astpath")]
#[command(about = "Query syntax trees by path and extract source ranges", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generic tree of a source file
    Tree {
        file: PathBuf,

        /// Language name (inferred from the extension otherwise)
        #[arg(short, long)]
        lang: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Xml)]
        format: Format,

        /// Convert sources with syntax errors instead of rejecting them
        #[arg(long)]
        lenient: bool,
    },

    /// Extract source ranges matching a query
    Extract {
        /// File, or directory to search recursively
        path: PathBuf,

        /// Primary query
        query: String,

        /// Boundary query; each range stops before the line it starts on
        #[arg(short, long)]
        until: Option<String>,

        /// Treat queries as ast-grep patterns instead of path queries
        #[arg(short, long)]
        pattern: bool,

        /// Keep original indentation
        #[arg(long)]
        no_dedent: bool,

        #[arg(short, long)]
        lang: Option<String>,

        #[arg(long)]
        lenient: bool,
    },

    /// Run a TOML extraction plan
    Run {
        plan: PathBuf,

        /// Print extracted text for successful targets
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Tree {
            file,
            lang,
            format,
            lenient,
        } => cmd_tree(&file, lang.as_deref(), format, parse_options(lenient)),

        Commands::Extract {
            path,
            query,
            until,
            pattern,
            no_dedent,
            lang,
            lenient,
        } => {
            let kind = if pattern {
                QueryKind::Pattern
            } else {
                QueryKind::Path
            };
            let options = ExtractOptions { dedent: !no_dedent };
            cmd_extract(
                &path,
                &query,
                until.as_deref(),
                kind,
                options,
                lang.as_deref(),
                parse_options(lenient),
            )
        }

        Commands::Run { plan, show } => cmd_run(&plan, show),
    }
}

fn parse_options(lenient: bool) -> ParseOptions {
    if lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    }
}

fn resolve_language(lang: Option<&str>, path: &Path) -> Result<SupportLang> {
    match lang {
        Some(name) => Ok(language_from_name(name)?),
        None => Ok(language_for_path(path).unwrap_or(DEFAULT_LANGUAGE)),
    }
}

fn cmd_tree(file: &Path, lang: Option<&str>, format: Format, options: ParseOptions) -> Result<()> {
    let language = resolve_language(lang, file)?;
    let doc = Document::from_input(&SourceInput::path(file), Some(language), options)
        .with_context(|| format!("failed to convert {}", file.display()))?;

    match format {
        Format::Xml => print!("{}", doc.tree().to_xml()),
        Format::Json => println!("{}", serde_json::to_string_pretty(doc.tree())?),
    }
    Ok(())
}

/// Source files under `path` in `language`, or `path` itself for a file.
fn collect_files(path: &Path, language: SupportLang) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() && path_matches_language(entry.path(), language) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();

    if files.is_empty() {
        anyhow::bail!(
            "No {:?} source files found under {}",
            language,
            path.display()
        );
    }
    Ok(files)
}

#[allow(clippy::too_many_arguments)]
fn cmd_extract(
    path: &Path,
    query: &str,
    until: Option<&str>,
    kind: QueryKind,
    options: ExtractOptions,
    lang: Option<&str>,
    parse_options: ParseOptions,
) -> Result<()> {
    let language = resolve_language(lang, path)?;
    let files = collect_files(path, language)?;
    let mut total = 0;

    for file in &files {
        let doc = match Document::from_input(&SourceInput::path(file), Some(language), parse_options)
        {
            Ok(doc) => doc,
            Err(e) if files.len() > 1 => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to convert {}", file.display()))
            }
        };

        let extractions = doc
            .extract_with(kind, query, until, options)
            .with_context(|| format!("extraction failed in {}", file.display()))?;

        for extraction in extractions {
            println!(
                "{}",
                format!(
                    "{}:{}-{}",
                    file.display(),
                    extraction.start_line,
                    extraction.end_line
                )
                .dimmed()
            );
            println!("{}", extraction.text);
            println!();
            total += 1;
        }
    }

    if total == 0 {
        eprintln!("{}", "No matches".yellow());
    }
    Ok(())
}

fn cmd_run(plan: &Path, show: bool) -> Result<()> {
    let plan = load_from_path(plan)?;
    println!("{} {}", "Running plan:".bold(), plan.display_name());

    let results = run_plan(&plan);
    let mut failed = 0;

    for (id, result) in &results {
        match result {
            Ok(found) => {
                println!("{} {}: {}", "✓".green(), id, found);
                if show {
                    for extraction in &found.extractions {
                        println!("{}", extraction.text);
                        println!();
                    }
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), id, e);
                if let RunError::Extract { .. } | RunError::Parse { .. } = e {
                    eprintln!("  {}", "Check the query against `astpath tree`".dimmed());
                }
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {} succeeded",
        format!("{}", results.len() - failed).green()
    );
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        anyhow::bail!("{failed} target(s) failed");
    }
    Ok(())
}
