//! Response and result types.

use super::headers::Headers;

/// One HTTP message as read off the wire, body already de-framed and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status:  u16,
    /// Reason phrase, possibly empty.
    pub reason:  String,
    pub headers: Headers,
    pub body:    Vec<u8>,
}

impl HttpResponse {
    /// Any `3xx` status.
    pub fn is_redirect(&self) -> bool { crate::core::is_redirect(self.status) }

    /// Whether the server asked to keep the connection open.
    pub fn keep_alive(&self) -> bool { self.headers.value_is("connection", "keep-alive") }
}

/// What a completed fetch hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub body:          Vec<u8>,
    /// Canonical URL of the descriptor that produced `body`, i.e. the last
    /// hop of a redirect chain.
    pub effective_url: String,
    pub view_source:   bool,
}

impl FetchResult {
    pub fn text(&self) -> std::borrow::Cow<'_, str> { String::from_utf8_lossy(&self.body) }
}
