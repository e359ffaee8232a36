//! Story page fetching for snapstory-dl
//!
//! Issues the HTTP GET for a user's public story page with a browser-like
//! header fingerprint. The upstream server varies response shape and
//! availability by client fingerprint, so every request carries the full
//! impersonation header set.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};

use crate::core::error::Result;

/// Hard deadline for the story page fetch
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Hard deadline for a single media stream
pub const MEDIA_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Fixed browser-impersonation header set attached to every request.
///
/// Accept-Encoding is deliberately absent: reqwest negotiates gzip/brotli
/// itself and setting the header manually disables its transparent
/// decompression.
pub fn impersonation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Accept",
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
    headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
    headers
}

/// Global HTTP client shared by the page fetcher and the media downloader
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .default_headers(impersonation_headers())
        .user_agent(USER_AGENT)
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(8)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
});

pub(crate) fn http_client() -> &'static Client {
    &GLOBAL_CLIENT
}

/// Build the public story page URL for a username
pub fn story_page_url(base_url: &str, username: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(username)
    )
}

/// Fetch the raw HTML of a user's story page.
///
/// Non-2xx statuses are not an error here: some not-found/private states are
/// signaled through a 200 response with a special payload and others through
/// error pages that still embed the data island, so the body is always
/// handed to the extractor.
pub async fn fetch_story_page(base_url: &str, username: &str) -> Result<String> {
    let url = story_page_url(base_url, username);
    log::debug!("fetching story page: {url}");

    let response = http_client().get(&url).timeout(PAGE_TIMEOUT).send().await?;

    let status = response.status();
    let body = response.text().await?;
    log::debug!("story page responded {} with {} bytes", status, body.len());

    Ok(body)
}
