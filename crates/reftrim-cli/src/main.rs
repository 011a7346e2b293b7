//! CLI entry point for reftrim.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `reftrim-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use reftrim_app::{
    AnalyzeInput, ExplainOutput, parse_report_json, render_annotations, render_markdown,
    run_analyze, run_explain, serialize_report, to_renderable, without_timing,
};
use reftrim_repo::{AnalysisCache, MetadataNameResolver, TargetSelector, WriteOutcome, write_if_changed};
use reftrim_settings::Overrides;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "reftrim",
    version,
    about = "Find build references a .NET project declares but never uses"
)]
struct Cli {
    /// Log output format on stderr. Filter with RUST_LOG (default: warn).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify one project's references and write the JSON report.
    Analyze(AnalyzeArgs),

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/reftrim/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/reftrim/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "refs.package_reference") or code (e.g., "package_reference_removable").
        identifier: String,
    },
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Project file the findings are reported against.
    #[arg(long)]
    project: String,

    /// Declared reference store written by the build.
    #[arg(long)]
    declared: Utf8PathBuf,

    /// Used-module report written by the compiler.
    #[arg(long)]
    used: Utf8PathBuf,

    /// NuGet lock manifest (project.assets.json). Required when package references exist.
    #[arg(long)]
    assets: Option<Utf8PathBuf>,

    /// Target framework to read from the lock manifest (e.g. net8.0).
    #[arg(long)]
    target: Option<String>,

    /// Runtime identifier qualifying the target (e.g. linux-x64).
    #[arg(long, requires = "target")]
    runtime: Option<String>,

    /// Whether the project generates its documentation file.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    doc_generation: bool,

    /// Path to reftrim config TOML. A missing file means defaults.
    #[arg(long, default_value = "reftrim.toml")]
    config: Utf8PathBuf,

    /// Override profile (default|quiet).
    #[arg(long)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long)]
    max_findings: Option<u32>,

    /// Reference labels to suppress for this run (glob, repeatable).
    #[arg(long)]
    ignore: Vec<String>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/reftrim/report.json")]
    report_out: Utf8PathBuf,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/reftrim/comment.md")]
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.cmd {
        Commands::Analyze(args) => cmd_analyze(args),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

/// Logs go to stderr so stdout stays clean for rendered output.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().with_ansi(false).init(),
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    // Missing config file is allowed (defaults apply).
    let config_text = match std::fs::read_to_string(&args.config) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("read config: {}", args.config)),
    };

    let target = args
        .target
        .map(|framework| TargetSelector::new(framework, args.runtime));
    let cache = AnalysisCache::new();

    let output = run_analyze(AnalyzeInput {
        project: &args.project,
        declared: &args.declared,
        used: &args.used,
        lock_manifest: args.assets.as_deref(),
        target,
        doc_generation_enabled: args.doc_generation,
        config_text: &config_text,
        overrides: Overrides {
            profile: args.profile,
            max_findings: args.max_findings,
        },
        ignore: &args.ignore,
        cache: &cache,
        resolver: &MetadataNameResolver,
    })?;

    // Timing goes to the log only; the file must be stable across identical runs.
    info!(
        project = %args.project,
        duration_ms = output.report.run.duration_ms.unwrap_or_default(),
        "analyze finished"
    );
    let data = serialize_report(&without_timing(&output.report))?;
    write_file(&args.report_out, &data).context("write report json")?;

    if args.write_markdown {
        let md = render_markdown(&to_renderable(&output.report));
        write_file(&args.markdown_out, md.as_bytes()).context("write markdown")?;
    }

    // Pass, warn and skip all exit 0: removable references never fail a build.
    Ok(())
}

fn write_file(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    let outcome = write_if_changed(path, bytes).with_context(|| format!("write {path}"))?;
    if outcome == WriteOutcome::Unchanged {
        debug!(path = %path, "output unchanged");
    }
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_file(&out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(topic) => {
            print!("{}", reftrim_app::format_explanation(&topic));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            suggestions,
        } => {
            eprint!("{}", reftrim_app::format_not_found(&identifier, &suggestions));
            std::process::exit(1);
        }
    }
}
