//! CLI binary for edgequake-layout2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_layout2md::{
    convert, convert_from_bytes, inspect, markdown_file_name, ConversionConfig,
    ConversionOutput, ConversionProgressCallback, HeadingRule, LayoutConfig, PageSelection,
    PageSeparator, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Length is set by `on_conversion_start` once pages are selected.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Reconstructing");
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page_complete(&self, page_num: usize, total: usize, markdown_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{markdown_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, lines_emitted: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages reconstructed, {} lines",
            green("✔"),
            bold(&total_pages.to_string()),
            lines_emitted
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  layout2md report.pdf.json

  # Convert to file
  layout2md report.pdf.json -o report.md

  # Write <title>.md into a directory
  layout2md report.pdf.json -o out/

  # Read the fragment dump from stdin
  extract-fragments report.pdf | layout2md -

  # Specific pages, page-number comments instead of rules
  layout2md --pages 2-5 --separator comment report.pdf.json

  # Re-tune the heuristics for a small-print document
  layout2md --gap-threshold 6 --heading-thresholds 14,12,11 tiny.json

  # JSON output with per-page stats
  layout2md --json report.pdf.json > report.json

  # Inspect the dump only (page and fragment counts)
  layout2md --inspect-only report.pdf.json

INPUT FORMAT:
  A JSON array of pages, or {"title": "...", "pages": [...]}. Each page is
  {"index": 0, "items": [...]}; each item is either
    {"text": "Hello", "x": 72, "y": 700, "width": 24, "height": 11, "font": "F1"}
  or a raw pdf.js text item
    {"str": "Hello", "transform": [11, 0, 0, 11, 72, 700], "width": 24, "height": 11}
"#;

/// Reconstruct Markdown from positioned PDF text fragments.
#[derive(Parser, Debug)]
#[command(
    name = "layout2md",
    version,
    about = "Reconstruct Markdown from positioned PDF text fragments",
    long_about = "Rebuild reading order, word spacing and heading levels from a JSON dump of \
positioned PDF text fragments, and print the result as Markdown.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Fragment dump (JSON), or `-` for stdin.
    input: String,

    /// Write Markdown to this file (or into this directory as <title>.md).
    #[arg(short, long, env = "LAYOUT2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "LAYOUT2MD_PAGES", default_value = "all")]
    pages: String,

    /// Page separator: hr, none, comment, or custom string.
    #[arg(long, env = "LAYOUT2MD_SEPARATOR", default_value = "hr")]
    separator: String,

    /// Vertical bucket size used to merge fragments into lines.
    #[arg(long, env = "LAYOUT2MD_BUCKET_SIZE", default_value_t = 5.0)]
    bucket_size: f64,

    /// Horizontal gap that must be exceeded to insert a space.
    #[arg(long, env = "LAYOUT2MD_GAP_THRESHOLD", default_value_t = 10.0,
          allow_negative_numbers = true)]
    gap_threshold: f64,

    /// Heading height thresholds for H1, H2, … (comma-separated), or `none`.
    #[arg(long, env = "LAYOUT2MD_HEADING_THRESHOLDS", default_value = "20,16,14")]
    heading_thresholds: String,

    /// Prepend YAML front-matter with document metadata.
    #[arg(long, env = "LAYOUT2MD_METADATA")]
    metadata: bool,

    /// Output structured JSON (ConversionOutput) instead of Markdown.
    #[arg(long, env = "LAYOUT2MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LAYOUT2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Print dump metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LAYOUT2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LAYOUT2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        if cli.input == "-" {
            anyhow::bail!("--inspect-only needs a file path, not stdin");
        }
        let meta = inspect(&cli.input)
            .await
            .context("Failed to inspect fragment dump")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            println!("Title:        {}", meta.title);
            println!("Pages:        {}", meta.page_count);
            println!("Fragments:    {}", meta.total_fragments);
            for (i, n) in meta.fragments_per_page.iter().enumerate() {
                println!("  page {:>4}:  {}", i + 1, n);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = run(&cli, &config).await.context("Conversion failed")?;

    if let Some(ref requested) = cli.output {
        let path = output_path(requested, &output.metadata.title);
        edgequake_layout2md::convert::write_markdown(&path, &output.markdown)
            .await
            .context("Failed to write Markdown")?;

        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {} lines  {}ms  →  {}",
                green("✔"),
                output.stats.processed_pages,
                output.stats.total_pages,
                output.stats.total_lines,
                output.stats.total_duration_ms,
                bold(&path.display().to_string()),
            );
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Load from a path or stdin and convert.
async fn run(cli: &Cli, config: &ConversionConfig) -> Result<ConversionOutput> {
    if cli.input == "-" {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("Failed to read stdin")?;
        Ok(convert_from_bytes(&bytes, "document", config).await?)
    } else {
        Ok(convert(&cli.input, config).await?)
    }
}

/// A directory target receives `<title>.md`; anything else is used as-is.
fn output_path(requested: &Path, title: &str) -> PathBuf {
    if requested.is_dir() {
        requested.join(markdown_file_name(title))
    } else {
        requested.to_path_buf()
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let separator = parse_separator(&cli.separator);
    let heading_rules = parse_heading_thresholds(&cli.heading_thresholds)?;

    let layout = LayoutConfig {
        bucket_size: cli.bucket_size,
        gap_threshold: cli.gap_threshold,
        heading_rules,
        page_separator: separator,
    };

    let mut builder = ConversionConfig::builder()
        .layout(layout)
        .pages(pages)
        .include_metadata(cli.metadata);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "hr" | "---" => PageSeparator::HorizontalRule,
        "none" => PageSeparator::None,
        "comment" => PageSeparator::Comment,
        _ => PageSeparator::Custom(s.to_string()),
    }
}

/// Parse `--heading-thresholds` ("20,16,14") into a cascade; the n-th value
/// becomes heading level n.
fn parse_heading_thresholds(s: &str) -> Result<Vec<HeadingRule>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("none") || s.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<f64> = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .context(format!("Invalid heading threshold: '{}'", v.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() > 6 {
        anyhow::bail!("At most 6 heading thresholds are supported (got {})", values.len());
    }

    Ok(values
        .into_iter()
        .zip(1u8..)
        .map(|(min_height, level)| HeadingRule::new(min_height, level))
        .collect())
}
