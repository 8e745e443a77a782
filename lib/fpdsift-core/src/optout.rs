//! Sources of the redaction flag.
//!
//! The flag is read once at the start of each run and then travels with the
//! traversal, see [`FpdValidator::process`](crate::FpdValidator::process).
//! Anything implementing [`RedactionSource`] can provide it:
//!
//! - `bool`, when the caller already knows
//! - any `Fn() -> bool`, evaluated once per run
//! - [`OptOutSignal`], the `_pubcid_optout` marker in cookies or local storage

use indexmap::IndexMap;

/// Name of the cookie / local storage item signalling an opt-out.
pub const PUBCID_OPTOUT_KEY: &str = "_pubcid_optout";

/// Provides the redaction flag for one run.
pub trait RedactionSource {
    /// Whether fields marked `redactOnOptOut` must be dropped.
    fn is_opted_out(&self) -> bool;
}

impl RedactionSource for bool {
    fn is_opted_out(&self) -> bool {
        *self
    }
}

impl<F> RedactionSource for F
where
    F: Fn() -> bool,
{
    fn is_opted_out(&self) -> bool {
        self()
    }
}

/// Opt-out detection from browser-like storage.
///
/// The visitor opted out when the marker is set to a non-empty value in the
/// cookies (if cookies are enabled) or in local storage (if available).
///
/// # Example
///
/// ```rust
/// use fpdsift_core::{OptOutSignal, RedactionSource};
///
/// let signal = OptOutSignal::from_cookie_header("sid=abc; _pubcid_optout=1");
/// assert!(signal.is_opted_out());
///
/// let disabled = signal.with_cookies_enabled(false);
/// assert!(!disabled.is_opted_out());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptOutSignal {
    key: String,
    cookies_enabled: bool,
    cookies: IndexMap<String, String>,
    local_storage_enabled: bool,
    local_storage: IndexMap<String, String>,
}

impl Default for OptOutSignal {
    fn default() -> Self {
        Self {
            key: PUBCID_OPTOUT_KEY.to_string(),
            cookies_enabled: true,
            cookies: IndexMap::new(),
            local_storage_enabled: true,
            local_storage: IndexMap::new(),
        }
    }
}

impl OptOutSignal {
    /// An empty signal: no cookie, no storage item, both stores enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a signal from a `Cookie` header value (`name=value; other=value`).
    ///
    /// Malformed pairs are ignored.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .fold(Self::new(), |signal, (name, value)| {
                signal.with_cookie(name.trim(), value.trim())
            })
    }

    /// Uses another marker name than [`PUBCID_OPTOUT_KEY`].
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Adds a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Adds a local storage item.
    #[must_use]
    pub fn with_local_storage_item(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.local_storage.insert(name.into(), value.into());
        self
    }

    /// Enables or disables cookie access.
    #[must_use]
    pub fn with_cookies_enabled(mut self, enabled: bool) -> Self {
        self.cookies_enabled = enabled;
        self
    }

    /// Enables or disables local storage access.
    #[must_use]
    pub fn with_local_storage_enabled(mut self, enabled: bool) -> Self {
        self.local_storage_enabled = enabled;
        self
    }

    fn is_marked(store: &IndexMap<String, String>, key: &str) -> bool {
        store.get(key).is_some_and(|value| !value.is_empty())
    }
}

impl RedactionSource for OptOutSignal {
    fn is_opted_out(&self) -> bool {
        (self.cookies_enabled && Self::is_marked(&self.cookies, &self.key))
            || (self.local_storage_enabled && Self::is_marked(&self.local_storage, &self.key))
    }
}
