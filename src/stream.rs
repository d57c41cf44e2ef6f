//! Streaming conversion API: emit pages one at a time.
//!
//! Unlike the eager [`crate::convert::convert`], which assembles the whole
//! document before returning, [`convert_stream`] loads the dump once and then
//! yields a [`PageResult`] per selected page, in page order, as the consumer
//! polls. Useful for writing very long documents incrementally or forwarding
//! pages to a UI as they are ready.
//!
//! Page Markdown in the stream excludes the page separator; append
//! [`crate::config::PageSeparator::render`] yourself if you reassemble.

use crate::config::ConversionConfig;
use crate::convert::select_pages;
use crate::document::Page;
use crate::error::Layout2MdError;
use crate::output::PageResult;
use crate::pipeline::input;
use crate::reconstruct::reconstruct_page;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of reconstructed pages.
pub type PageStream = Pin<Box<dyn Stream<Item = PageResult> + Send>>;

/// Convert a fragment dump, streaming pages in page order.
///
/// # Returns
/// - `Ok(PageStream)` — one `PageResult` per selected page
/// - `Err(Layout2MdError)` — fatal input error (file not found, not JSON, etc.)
pub async fn convert_stream(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<PageStream, Layout2MdError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming conversion: {}", input_str);

    let loaded = input::resolve_input(input_str).await?;
    let selected: Vec<Page> = select_pages(&loaded.document, config)?
        .into_iter()
        .cloned()
        .collect();

    Ok(page_stream(selected, config))
}

/// Stream reconstruction over pages already in memory.
pub fn page_stream(pages: Vec<Page>, config: &ConversionConfig) -> PageStream {
    let total = pages.len();
    let layout = config.layout.clone();
    let callback = config.progress_callback.clone();

    if let Some(ref cb) = callback {
        cb.on_conversion_start(total);
    }

    let s = stream::iter(pages).map(move |page| {
        if let Some(ref cb) = callback {
            cb.on_page_start(page.index.saturating_add(1), total);
        }
        let result = reconstruct_page(&page, &layout);
        if let Some(ref cb) = callback {
            cb.on_page_complete(result.page_num, total, result.markdown.len());
        }
        result
    });

    Box::pin(s)
}
