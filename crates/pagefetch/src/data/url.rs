use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// Number of redirect hops a network fetch may follow by default.
pub const DEFAULT_REDIRECT_BUDGET: u32 = 5;

/// A parsed URL: the scheme-specific target plus the `view-source:` flag.
///
/// Built in one pass by [`crate::parse`]; every field is final once parsed.
/// Use [`UrlDescriptor::with_view_source`] and
/// [`UrlDescriptor::with_redirect_budget`] to derive modified copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlDescriptor {
    pub view_source: bool,
    pub target:      Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A local file. `path` always begins with `/`.
    File { path: String },
    /// An `http` or `https` resource.
    Http(HttpTarget),
    /// An inline `data:` payload.
    Data(DataUrl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTarget {
    pub host:            String,
    pub port:            u16,
    /// Request target, always beginning with `/`.
    pub path:            String,
    /// `true` for `https`.
    pub secure:          bool,
    /// Remaining redirect hops this fetch may follow.
    pub redirect_budget: u32,
}

/// How a `data:` payload is encoded before percent-decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataEncoding {
    #[default]
    Identity,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Top-level media type, e.g. `text`. Empty when the URL declares none.
    pub media_type: String,
    pub subtype:    Option<String>,
    pub encoding:   DataEncoding,
    /// Raw payload, still percent-encoded.
    pub payload:    String,
}

impl HttpTarget {
    pub fn default_port(secure: bool) -> u16 {
        if secure { 443 } else { 80 }
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    pub fn has_default_port(&self) -> bool { self.port == Self::default_port(self.secure) }

    /// `host` or `host:port` when the port differs from the scheme default.
    pub fn authority(&self) -> String {
        if self.has_default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl DataUrl {
    /// `media/subtype`, `media`, or an empty string for untyped payloads.
    pub fn content_type(&self) -> String {
        match &self.subtype {
            Some(subtype) => format!("{}/{}", self.media_type, subtype),
            None => self.media_type.clone(),
        }
    }
}

impl UrlDescriptor {
    pub fn new(target: Target) -> Self {
        Self {
            view_source: false,
            target,
        }
    }

    pub fn with_view_source(mut self, view_source: bool) -> Self {
        self.view_source = view_source;
        self
    }

    /// Replace the redirect budget. No effect on `file:` and `data:` targets.
    pub fn with_redirect_budget(mut self, budget: u32) -> Self {
        if let Target::Http(http) = &mut self.target {
            http.redirect_budget = budget;
        }
        self
    }

    pub fn scheme(&self) -> &'static str {
        match &self.target {
            Target::File { .. } => "file",
            Target::Http(http) => http.scheme(),
            Target::Data(_) => "data",
        }
    }

    pub fn as_http(&self) -> Option<&HttpTarget> {
        match &self.target {
            Target::Http(http) => Some(http),
            _ => None,
        }
    }

    pub fn redirect_budget(&self) -> Option<u32> { self.as_http().map(|http| http.redirect_budget) }
}

/// Canonical URL form. Parsing the output of a non-`data` descriptor yields
/// the same descriptor back.
impl fmt::Display for UrlDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.view_source {
            f.write_str("view-source:")?;
        }
        match &self.target {
            Target::File { path } => write!(f, "file://{}", path),
            Target::Http(http) => write!(f, "{}://{}{}", http.scheme(), http.authority(), http.path),
            Target::Data(data) => {
                write!(f, "data:{}", data.content_type())?;
                if data.encoding == DataEncoding::Base64 {
                    f.write_str(";base64")?;
                }
                write!(f, ",{}", data.payload)
            }
        }
    }
}

impl FromStr for UrlDescriptor {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { crate::core::parse(s) }
}
