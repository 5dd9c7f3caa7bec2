use std::io::{BufReader, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::{build_request, decode_data_url, is_fresh, is_storable, parse, request_headers, resolve_redirect};
use crate::data::{FetchOptions, FetchResult, HttpResponse, HttpTarget, Target, UrlDescriptor};
use crate::effects::cache::CacheStore;
use crate::effects::reader::read_response;
use crate::effects::transport::{Connector, TcpConnector};
use crate::error::{FetchError, Result};

/// Fetches `http`, `https`, `file` and `data` URLs.
///
/// Every network attempt opens a fresh connection through the connector and
/// drops it before the next hop. Redirects are followed until the
/// descriptor's budget runs out.
///
/// # Examples
///
/// ```
/// use pagefetch::{Fetcher, TcpConnector};
///
/// let fetcher = Fetcher::new(TcpConnector);
/// let page = fetcher.fetch("data:text/html,Hello%20world!").unwrap();
/// assert_eq!(page.body, b"Hello world!");
/// ```
pub struct Fetcher<C: Connector = TcpConnector> {
    connector: C,
    cache:     Option<CacheStore>,
    options:   FetchOptions,
}

impl<C: Connector> Fetcher<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            cache: None,
            options: FetchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn connector(&self) -> &C { &self.connector }

    pub fn options(&self) -> &FetchOptions { &self.options }

    pub fn cache(&self) -> Option<&CacheStore> { self.cache.as_ref() }

    /// Fetch `url` with the configured redirect budget.
    pub fn fetch(&self, url: &str) -> Result<FetchResult> { self.fetch_with(url, false, self.options.redirect_budget) }

    /// Fetch `url`, forcing source view when `view_source` is set and
    /// following at most `redirect_budget` hops.
    pub fn fetch_with(&self, url: &str, view_source: bool, redirect_budget: u32) -> Result<FetchResult> {
        let descriptor = parse(url)?;
        let view_source = view_source || descriptor.view_source;
        let descriptor = descriptor
            .with_view_source(view_source)
            .with_redirect_budget(redirect_budget);
        self.fetch_descriptor(&descriptor)
    }

    /// Fetch an already parsed descriptor, using its own redirect budget.
    pub fn fetch_descriptor(&self, descriptor: &UrlDescriptor) -> Result<FetchResult> {
        match &descriptor.target {
            Target::File { path } => {
                let path = local_path(path);
                debug!(path = %path.display(), "reading local file");
                let body = std::fs::read(&path).map_err(|source| FetchError::File { path, source })?;
                Ok(finish(descriptor, body))
            }
            Target::Data(data) => Ok(finish(descriptor, decode_data_url(data)?)),
            Target::Http(_) => self.fetch_http(descriptor.clone()),
        }
    }

    fn fetch_http(&self, descriptor: UrlDescriptor) -> Result<FetchResult> {
        let mut current = descriptor;
        loop {
            let Some(target) = current.as_http() else {
                return Err(FetchError::UnsupportedScheme(current.scheme().to_string()));
            };

            if let Some(body) = self.cached_body(target) {
                return Ok(finish(&current, body));
            }

            let response = self.exchange(target)?;
            if !response.is_redirect() {
                self.remember(target, &response);
                return Ok(finish(&current, response.body));
            }

            let remaining = target.redirect_budget.saturating_sub(1);
            if remaining == 0 {
                return Err(FetchError::TooManyRedirects);
            }
            let location = response
                .headers
                .get("location")
                .ok_or(FetchError::MissingLocation {
                    status: response.status,
                })?;
            let next = resolve_redirect(&current, location)?.with_redirect_budget(remaining);
            info!(status = response.status, from = %current, to = %next, remaining, "following redirect");
            current = next;
        }
    }

    /// One request/response exchange on a fresh connection.
    fn exchange(&self, target: &HttpTarget) -> Result<HttpResponse> {
        let headers = request_headers(target, &self.options);
        let request = build_request(&target.path, &headers)?;

        let mut stream = self.connector.connect(target, &self.options)?;
        debug!(host = %target.host, port = target.port, path = %target.path, "sending request");
        stream.write_all(&request)?;
        stream.flush()?;

        let response = read_response(BufReader::new(&mut stream))?;
        debug!(
            status = response.status,
            bytes = response.body.len(),
            keep_alive = response.keep_alive(),
            "response received, closing connection"
        );
        Ok(response)
    }

    fn cached_body(&self, target: &HttpTarget) -> Option<Vec<u8>> {
        let cache = self.cache.as_ref()?;
        let entry = cache.lookup(target.scheme(), &target.host, &target.path)?;
        if !is_fresh(&entry, self.options.now()) {
            debug!(host = %target.host, path = %target.path, "cache entry stale");
            return None;
        }
        info!(host = %target.host, path = %target.path, "cache hit");
        Some(entry.body)
    }

    fn remember(&self, target: &HttpTarget, response: &HttpResponse) {
        let Some(cache) = &self.cache else { return };
        if !is_storable(response.status, &response.headers) {
            return;
        }
        match cache.store(
            target.scheme(),
            &target.host,
            &target.path,
            &response.headers,
            &response.body,
            self.options.now(),
        ) {
            Ok(()) => info!(host = %target.host, path = %target.path, "response cached"),
            Err(e) => warn!(error = %e, host = %target.host, path = %target.path, "failed to cache response"),
        }
    }
}

impl<C: Connector + std::fmt::Debug> std::fmt::Debug for Fetcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("connector", &self.connector)
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish()
    }
}

fn finish(descriptor: &UrlDescriptor, body: Vec<u8>) -> FetchResult {
    FetchResult {
        body,
        effective_url: descriptor.to_string(),
        view_source: descriptor.view_source,
    }
}

/// Filesystem path for a `file:` URL path.
fn local_path(path: &str) -> PathBuf {
    // `/C:/dir` names a drive on Windows.
    #[cfg(windows)]
    {
        let bytes = path.as_bytes();
        if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
            return PathBuf::from(&path[1..]);
        }
    }
    PathBuf::from(path)
}
