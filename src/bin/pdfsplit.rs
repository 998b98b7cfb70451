//! CLI binary for pdfsplit.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SplitConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use pdfsplit::pipeline::plan::plan_ranges;
use pdfsplit::{inspect, split, SelectionMode, SplitConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Split a book into top-level chapters
  pdfsplit book.pdf --ops split --level 0

  # Split including one level of sub-sections, custom output directory
  pdfsplit book.pdf --ops split --level 1 -o chapters/

  # Split only sections whose title mentions a keyword
  pdfsplit manual.pdf --ops split --keywords Installation Configuration

  # Case-sensitive keyword match
  pdfsplit paper.pdf --ops split --keywords RFC --case-sensitive

  # Split a remote PDF and convert each fragment to markdown
  pdfsplit https://example.com/spec.pdf --ops split --level 0 --post tomd

  # Discard the downloaded copy when done
  pdfsplit https://example.com/spec.pdf --ops split --level 0 --cleanup

  # Show the outline without splitting (helps pick a level)
  pdfsplit book.pdf --inspect-only

  # Preview the plan without writing any files
  pdfsplit book.pdf --ops split --level 0 --dry-run

ENVIRONMENT VARIABLES:
  PDFSPLIT_OUTPUT_DIR    Default output directory for fragments
  PDFSPLIT_PASSWORD      PDF user password for encrypted documents
  PDFIUM_LIB_PATH        Path to an existing libpdfium shared library
  RUST_LOG               Overrides --log-level with a tracing filter
"#;

/// Split a PDF into smaller PDFs along its bookmark structure.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsplit",
    version,
    about = "Split a PDF into smaller PDFs along its bookmark structure",
    long_about = "Split a PDF document (local file or URL) into one PDF per bookmark, \
selecting split points either by outline nesting level or by title keywords. \
Fragments can optionally be converted to markdown after splitting.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(ArgGroup::new("selection").args(["level", "keywords"]))
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    source: String,

    /// Operation to perform. Only "split" is supported.
    #[arg(long)]
    ops: Option<String>,

    /// Post-processing step: "tomd" converts each fragment to markdown.
    #[arg(long)]
    post: Option<String>,

    /// Directory for the split PDF fragments.
    #[arg(short, long, env = "PDFSPLIT_OUTPUT_DIR", default_value = "./split_pdfs")]
    output_dir: PathBuf,

    /// Split at bookmarks up to this nesting level (0 = top-level only).
    #[arg(short, long)]
    level: Option<usize>,

    /// Split at bookmarks whose title contains any of these keywords.
    #[arg(short, long, num_args = 1..)]
    keywords: Option<Vec<String>>,

    /// Match keywords case-sensitively.
    #[arg(long, requires = "keywords")]
    case_sensitive: bool,

    /// Directory for markdown files when --post tomd is given.
    #[arg(long, default_value = "./markdown")]
    markdown_dir: PathBuf,

    /// Delete the downloaded temp copy when the run finishes.
    #[arg(long)]
    cleanup: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSPLIT_PASSWORD")]
    password: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Print the outline and exit without splitting.
    #[arg(long)]
    inspect_only: bool,

    /// Compute and print the split plan without writing any files.
    #[arg(long)]
    dry_run: bool,

    /// Output the run result as JSON instead of a human summary.
    #[arg(long)]
    json: bool,

    /// Log verbosity.
    #[arg(long, value_enum, default_value = "info", ignore_case = true)]
    log_level: LogLevel,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let report = inspect(&cli.source, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("File:       {}", cli.source);
            println!("Pages:      {}", report.page_count);
            println!("Bookmarks:  {}", report.bookmarks.len());
            if let Some(max) = report.max_level() {
                println!("Max level:  {max}");
            }
            for b in &report.bookmarks {
                println!(
                    "  {}{}  {}",
                    "  ".repeat(b.level),
                    b.title,
                    dim(&format!("(page {})", b.page_index + 1))
                );
            }
        }
        return Ok(());
    }

    // ── Validate the operation ───────────────────────────────────────────
    match cli.ops.as_deref() {
        Some(op) if op.eq_ignore_ascii_case("split") => {}
        Some(op) => bail!("Unknown operation '{op}'. Only 'split' is supported."),
        None => bail!("Missing --ops. Use: --ops split"),
    }

    let mode = match (cli.level, &cli.keywords) {
        (Some(level), None) => SelectionMode::Level(level),
        (None, Some(keywords)) => SelectionMode::Keywords {
            keywords: keywords.clone(),
            case_sensitive: cli.case_sensitive,
        },
        // clap's arg group enforces mutual exclusion; only absence is left.
        _ => bail!("Choose split points with either --level or --keywords."),
    };

    let post_to_markdown = match cli.post.as_deref() {
        None => false,
        Some(p) if p.eq_ignore_ascii_case("tomd") => true,
        Some(p) => bail!("Unknown post-processing step '{p}'. Only 'tomd' is supported."),
    };

    // ── Dry run: plan only, write nothing ────────────────────────────────
    if cli.dry_run {
        let report = inspect(&cli.source, cli.password.as_deref())
            .await
            .context("Failed to read PDF outline")?;
        let ranges = plan_ranges(&report.bookmarks, &mode, report.page_count);

        if ranges.is_empty() {
            eprintln!("{} no matching bookmarks", red("✘"));
            std::process::exit(1);
        }

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&ranges)?);
        } else {
            println!(
                "{} {} fragment(s) would be written to {}:",
                cyan("◆"),
                ranges.len(),
                bold(&cli.output_dir.display().to_string())
            );
            for r in &ranges {
                let pages = r.page_count();
                println!(
                    "  {}.pdf  {}",
                    r.output_name,
                    dim(&format!(
                        "pages {}-{} ({} page{})",
                        r.start_page + 1,
                        r.end_page.max(r.start_page + 1),
                        pages,
                        if pages == 1 { "" } else { "s" }
                    ))
                );
            }
        }
        return Ok(());
    }

    // ── Build config and run ─────────────────────────────────────────────
    let mut builder = SplitConfig::builder()
        .mode(mode)
        .output_dir(&cli.output_dir)
        .post_to_markdown(post_to_markdown)
        .markdown_dir(&cli.markdown_dir)
        .cleanup(cli.cleanup)
        .download_timeout_secs(cli.download_timeout);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    let config = builder.build().context("Invalid configuration")?;

    let outcome = split(&cli.source, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    if outcome.ranges.is_empty() {
        eprintln!("{} no matching bookmarks", red("✘"));
        std::process::exit(1);
    }

    if !cli.json {
        let stats = &outcome.stats;

        for r in &outcome.ranges {
            match (&r.output_path, &r.error) {
                (Some(path), _) => println!(
                    "  {} {}  {}",
                    green("✓"),
                    path.display(),
                    dim(&format!(
                        "{} page{}",
                        r.pages_written,
                        if r.pages_written == 1 { "" } else { "s" }
                    ))
                ),
                (None, Some(e)) => println!("  {} {}", red("✗"), red(&e.to_string())),
                (None, None) => println!(
                    "  {} {}  {}",
                    cyan("⚠"),
                    r.range.title,
                    dim("empty range, skipped")
                ),
            }
        }

        for c in &outcome.conversions {
            match (&c.markdown_path, &c.error) {
                (Some(path), _) => println!("  {} {}", green("✓"), path.display()),
                (None, Some(e)) => println!("  {} {}", red("✗"), red(&e.to_string())),
                (None, None) => {}
            }
        }

        let ok = stats.failed_ranges == 0 && stats.markdown_failed == 0;
        eprintln!(
            "{}  {}/{} fragments written  {}ms",
            if ok { green("✔") } else { cyan("⚠") },
            stats.files_written,
            stats.ranges_planned,
            stats.total_duration_ms,
        );
        if stats.empty_ranges > 0 {
            eprintln!(
                "   {}",
                dim(&format!("{} empty range(s) skipped", stats.empty_ranges))
            );
        }
        if stats.failed_ranges > 0 {
            eprintln!("   {}", red(&format!("{} range(s) failed", stats.failed_ranges)));
        }
        if config.post_to_markdown {
            eprintln!(
                "   {} markdown file(s) written{}",
                stats.markdown_written,
                if stats.markdown_failed > 0 {
                    red(&format!("  ({} failed)", stats.markdown_failed))
                } else {
                    String::new()
                }
            );
        }
    }

    Ok(())
}
