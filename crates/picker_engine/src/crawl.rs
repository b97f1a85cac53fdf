use futures_util::future::join_all;
use picker_core::CrawledLink;
use url::Url;

use crate::decode::decode_page;
use crate::links::extract_links;
use crate::{EventSink, Fetcher, PickerEvent};

/// Fetches every source page concurrently and concatenates their links in
/// the order of `urls`, so equal-priority candidates keep source order.
///
/// A page that cannot be fetched contributes no links.
pub async fn crawl(fetcher: &dyn Fetcher, urls: &[Url], sink: &dyn EventSink) -> Vec<CrawledLink> {
    let pages = join_all(urls.iter().map(|url| crawl_page(fetcher, url, sink))).await;
    pages.into_iter().flatten().collect()
}

async fn crawl_page(fetcher: &dyn Fetcher, url: &Url, sink: &dyn EventSink) -> Vec<CrawledLink> {
    let output = match fetcher.fetch(url).await {
        Ok(output) => output,
        Err(error) => {
            sink.emit(PickerEvent::PageFetchFailed {
                url: url.to_string(),
                error,
            });
            return Vec::new();
        }
    };

    let page = decode_page(&output.bytes, output.metadata.content_type.as_deref());
    if page.lossy {
        picker_logging::picker_warn!(
            "{url} is not valid {}; malformed bytes were replaced",
            page.encoding
        );
    }

    let base = Url::parse(&output.metadata.final_url).unwrap_or_else(|_| url.clone());
    let extraction = extract_links(&page.html, &base);
    for unresolved in extraction.unresolved {
        sink.emit(PickerEvent::LinkUnresolved {
            page: base.to_string(),
            href: unresolved.href,
            reason: unresolved.reason,
        });
    }
    sink.emit(PickerEvent::PageCrawled {
        url: base.to_string(),
        links: extraction.links.len(),
    });
    extraction.links
}
