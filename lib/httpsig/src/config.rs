//!
//! Verifier configuration
//!
//! ```toml
//! realm = "example"
//! headers = ["request-line", "date"]
//! algorithms = ["rsa-sha256", "ecdsa-sha256"]
//! skew-secs = 300
//! ```
//!

use crate::{Algorithm, Challenge, DATE, DEFAULT_SKEW};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_realm() -> String {
    "httpsig".into()
}

fn default_headers() -> Vec<String> {
    vec![DATE.into()]
}

fn default_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

fn default_skew_secs() -> i64 {
    i64::try_from(DEFAULT_SKEW.as_secs()).unwrap_or(i64::MAX)
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    /// Realm announced in the challenge
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Headers a client has to sign
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,

    /// Accepted algorithms, in order of preference
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,

    /// Accepted difference between the `Date` header and the current time
    ///
    /// A negative value disables the check
    #[serde(default = "default_skew_secs")]
    pub skew_secs: i64,
}

impl Configuration {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Challenge to send to clients that didn't authenticate yet
    #[must_use]
    pub fn challenge(&self) -> Challenge {
        Challenge::new(
            self.realm.as_str(),
            self.headers.iter().map(String::as_str),
            self.algorithms.iter().copied(),
        )
    }

    #[must_use]
    pub fn skew(&self) -> Option<Duration> {
        u64::try_from(self.skew_secs).ok().map(Duration::from_secs)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            headers: default_headers(),
            algorithms: default_algorithms(),
            skew_secs: default_skew_secs(),
        }
    }
}
