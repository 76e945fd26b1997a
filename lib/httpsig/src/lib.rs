//!
//! Challenge-driven HTTP Signature authentication
//!
//! The server answers unauthenticated requests with a [`Challenge`] naming the headers that have to be signed
//! and the algorithms it accepts. The client answers with an [`Authorization`] carrying its key ID,
//! the headers it signed and the signature itself. The [`Verifier`] reconciles both and either accepts the request
//! or hands back a (possibly narrowed) challenge to re-issue.
//!
//! Only asymmetric schemes are supported (RSA, DSA, ECDSA, Ed25519 and their OpenSSH encodings).
//!

#[macro_use]
extern crate tracing;

pub use self::algorithm::Algorithm;
pub use self::authorization::Authorization;
pub use self::challenge::Challenge;
pub use self::clock::{Clock, MockHandle};
pub use self::config::Configuration;
pub use self::error::{KeyError, MissingHeaderError, ParseError, SignError};
pub use self::key::{EcdsaCurve, Key, KeyFormat};
pub use self::keychain::Keychain;
pub use self::request::SignableRequest;
pub use self::signer::{PrivateKey, Signer};
pub use self::signing_key::SigningKey;
pub use self::verifier::{Verdict, Verifier};

mod algorithm;
mod authorization;
mod challenge;
mod clock;
mod error;
mod header;
mod key;
mod keychain;
mod request;
mod signer;
mod signing_key;
mod verifier;

pub mod config;
pub mod signing_string;

/// Authentication scheme token used by both the `Authorization` and the `WWW-Authenticate` header
pub const SCHEME: &str = "Signature";

/// Pseudo-header standing in for the HTTP request line (`GET /path HTTP/1.1`)
pub const REQUEST_LINE: &str = "request-line";

/// Pseudo-header demanding that every header of the request is signed
pub const ALL_HEADERS: &str = ":all";

/// Name of the `Date` header
pub const DATE: &str = "date";

/// Prefix reserved for pseudo-headers that never name a real header
pub const PSEUDO_HEADER_PREFIX: char = ':';

/// Default accepted clock skew (5 minutes)
pub const DEFAULT_SKEW: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Case-insensitive membership check for header name lists
#[inline]
pub(crate) fn contains_header<S>(headers: &[S], name: &str) -> bool
where
    S: AsRef<str>,
{
    headers
        .iter()
        .any(|header| header.as_ref().eq_ignore_ascii_case(name))
}
