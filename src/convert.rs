//! Eager (full-document) conversion entry points.
//!
//! This module provides the simpler API: load the fragment dump, reconstruct
//! every selected page, then return. Use [`crate::stream::convert_stream`]
//! instead when you want pages one at a time.

use crate::config::ConversionConfig;
use crate::document::{FragmentDocument, Page};
use crate::error::Layout2MdError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
use crate::pipeline::input::{self, LoadedDocument};
use crate::reconstruct::{page_separator, reconstruct_page};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a JSON fragment dump on disk to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local path to a fragment dump (see [`crate::document`])
/// * `config`    — Conversion configuration
///
/// # Errors
/// Returns `Err(Layout2MdError)` only for input problems: file not found,
/// permission denied, not JSON, malformed fragment data, or a page selection
/// that matches no page. Reconstruction itself cannot fail.
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Layout2MdError> {
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);
    let loaded = input::resolve_input(input_str).await?;
    convert_loaded(loaded, config)
}

/// Convert a JSON fragment dump held in memory.
///
/// `title` labels the document in errors, metadata and front matter when the
/// dump does not embed a title of its own.
pub async fn convert_from_bytes(
    bytes: &[u8],
    title: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Layout2MdError> {
    let loaded = input::load_bytes(bytes, title)?;
    convert_loaded(loaded, config)
}

/// Convert a fragment dump and write output directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Layout2MdError> {
    let output = convert(input_str, config).await?;
    write_markdown(output_path.as_ref(), &output.markdown).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Layout2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Layout2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, config))
}

/// Describe a fragment dump without reconstructing it.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, Layout2MdError> {
    let loaded = input::resolve_input(input_str.as_ref()).await?;
    Ok(describe(&loaded))
}

/// Write Markdown to `path` atomically, creating parent directories.
pub async fn write_markdown(path: &Path, markdown: &str) -> Result<(), Layout2MdError> {
    let write_err = |source: std::io::Error| Layout2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {} bytes to {}", markdown.len(), path.display());
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

pub(crate) fn describe(loaded: &LoadedDocument) -> DocumentMetadata {
    let fragments_per_page: Vec<usize> = loaded
        .document
        .pages
        .iter()
        .map(|p| p.items.len())
        .collect();
    DocumentMetadata {
        title: loaded.title.clone(),
        page_count: fragments_per_page.len(),
        total_fragments: fragments_per_page.iter().sum(),
        fragments_per_page,
    }
}

/// Apply the page selection. An empty document is not an error (it simply
/// converts to an empty string); a selection that matches nothing in a
/// non-empty document is.
pub(crate) fn select_pages<'a>(
    document: &'a FragmentDocument,
    config: &ConversionConfig,
) -> Result<Vec<&'a Page>, Layout2MdError> {
    let total = document.pages.len();
    let indices = config.pages.to_indices(total);
    if indices.is_empty() && total > 0 {
        return Err(Layout2MdError::PageOutOfRange {
            page: config.pages.first_requested(),
            total,
        });
    }
    Ok(indices.into_iter().map(|i| &document.pages[i]).collect())
}

fn convert_loaded(
    loaded: LoadedDocument,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Layout2MdError> {
    let total_start = Instant::now();
    let metadata = describe(&loaded);
    info!(
        "Loaded '{}' from {}: {} pages, {} fragments",
        metadata.title, loaded.origin, metadata.page_count, metadata.total_fragments
    );

    let selected = select_pages(&loaded.document, config)?;
    debug!("Selected {} pages for conversion", selected.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(selected.len());
    }

    let mut pages: Vec<PageResult> = Vec::with_capacity(selected.len());
    let mut markdown = String::new();

    if config.include_metadata {
        markdown.push_str(&format_yaml_front_matter(&metadata));
    }

    for page in &selected {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page.index.saturating_add(1), selected.len());
        }

        let result = reconstruct_page(page, &config.layout);
        debug!(
            "Page {}: {} fragments → {} lines ({} headings, {} blank)",
            result.page_num,
            result.fragment_count,
            result.line_count,
            result.heading_count,
            result.skipped_lines
        );

        markdown.push_str(&result.markdown);
        markdown.push_str(&page_separator(page, &config.layout));

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(result.page_num, selected.len(), result.markdown.len());
        }
        pages.push(result);
    }

    let stats = ConversionStats {
        total_pages: metadata.page_count,
        processed_pages: pages.len(),
        skipped_pages: metadata.page_count.saturating_sub(pages.len()),
        total_fragments: pages.iter().map(|p| p.fragment_count).sum(),
        total_lines: pages.iter().map(|p| p.line_count).sum(),
        heading_lines: pages.iter().map(|p| p.heading_count).sum(),
        blank_lines_skipped: pages.iter().map(|p| p.skipped_lines).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} pages, {} lines, {}ms total",
        stats.processed_pages, stats.total_pages, stats.total_lines, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(selected.len(), stats.total_lines);
    }

    Ok(ConversionOutput {
        markdown,
        pages,
        metadata,
        stats,
    })
}

/// Format document metadata as YAML front matter.
fn format_yaml_front_matter(meta: &DocumentMetadata) -> String {
    let mut yaml = String::from("---\n");
    yaml.push_str(&format!("title: \"{}\"\n", meta.title.replace('"', "\\\"")));
    yaml.push_str(&format!("pages: {}\n", meta.page_count));
    yaml.push_str(&format!("fragments: {}\n", meta.total_fragments));
    yaml.push_str("---\n\n");
    yaml
}
