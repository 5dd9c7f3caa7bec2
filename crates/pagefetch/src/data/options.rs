use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::url::DEFAULT_REDIRECT_BUDGET;

/// Value of the `Connection` request header.
///
/// Every fetch attempt opens its own connection and closes it afterwards, so
/// `KeepAlive` only changes what is sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    #[default]
    Close,
    KeepAlive,
}

impl ConnectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionMode::Close => "close",
            ConnectionMode::KeepAlive => "keep-alive",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Configuration for page fetching.
///
/// # Examples
///
/// ```
/// use pagefetch::{ConnectionMode, FetchOptions};
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .user_agent("my-browser/0.1")
///     .connection(ConnectionMode::KeepAlive)
///     .timeout(Some(Duration::from_secs(5)))
///     .redirect_budget(3);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// `User-Agent` request header.
    ///
    /// Default: `pagefetch/<crate version>`
    pub user_agent: String,

    /// `Connection` request header.
    ///
    /// Default: [`ConnectionMode::Close`]
    pub connection: ConnectionMode,

    /// Advertised in a `Keep-Alive: timeout=N` header when `connection` is
    /// [`ConnectionMode::KeepAlive`].
    ///
    /// Default: 20s
    pub keep_alive: Duration,

    /// Connect, read and write timeout applied to every socket.
    ///
    /// `None` blocks indefinitely.
    ///
    /// Default: 20s
    pub timeout: Option<Duration>,

    /// Redirect hops a fetch may follow before failing with
    /// [`crate::FetchError::TooManyRedirects`].
    ///
    /// Default: 5
    pub redirect_budget: u32,

    /// Extra request headers, sent after the built-in ones on every hop.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Source of the current unix time in seconds, used for cache freshness
    /// and cache timestamps.
    ///
    /// Default: wall clock
    pub clock: Arc<dyn Fn() -> i64 + Send + Sync>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("user_agent", &self.user_agent)
            .field("connection", &self.connection)
            .field("keep_alive", &self.keep_alive)
            .field("timeout", &self.timeout)
            .field("redirect_budget", &self.redirect_budget)
            .field("headers", &self.headers)
            .field("clock", &"{ ... }")
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent:      concat!("pagefetch/", env!("CARGO_PKG_VERSION")).to_string(),
            connection:      ConnectionMode::default(),
            keep_alive:      Duration::from_secs(20),
            timeout:         Some(Duration::from_secs(20)),
            redirect_budget: DEFAULT_REDIRECT_BUDGET,
            headers:         Arc::new([]),
            clock:           Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn connection(mut self, connection: ConnectionMode) -> Self {
        self.connection = connection;
        self
    }

    #[must_use]
    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn redirect_budget(mut self, redirect_budget: u32) -> Self {
        self.redirect_budget = redirect_budget;
        self
    }

    /// Add a single extra request header.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagefetch::FetchOptions;
    ///
    /// let options = FetchOptions::default()
    ///     .header("Accept", "text/html")
    ///     .header("Accept-Language", "en");
    /// assert_eq!(options.headers.len(), 2);
    /// ```
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace the clock.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagefetch::FetchOptions;
    /// use std::sync::Arc;
    ///
    /// let options = FetchOptions::default().clock(Arc::new(|| 1_700_000_000));
    /// assert_eq!(options.now(), 1_700_000_000);
    /// ```
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Fn() -> i64 + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> i64 { (self.clock)() }
}
