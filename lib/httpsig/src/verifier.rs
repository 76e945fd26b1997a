use crate::{
    error::MissingHeaderError, Authorization, Challenge, Clock, Configuration, Keychain,
    SignableRequest, DATE, DEFAULT_SKEW, PSEUDO_HEADER_PREFIX,
};
use http::header::AUTHORIZATION;
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Outcome of a verification
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    /// The request is authenticated
    Accepted,

    /// The request isn't authenticated, re-issue the contained challenge
    Rejected(Challenge),
}

impl Verdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Challenge to re-issue, if the request was rejected
    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        match self {
            Self::Accepted => None,
            Self::Rejected(challenge) => Some(challenge),
        }
    }

    #[must_use]
    pub fn into_challenge(self) -> Option<Challenge> {
        match self {
            Self::Accepted => None,
            Self::Rejected(challenge) => Some(challenge),
        }
    }
}

#[derive(Debug, Error)]
enum Rejection {
    #[error("request or authorization is missing")]
    Incomplete,

    #[error("header `{0}` is present but not signed")]
    UnsignedRequestHeader(String),

    #[error("required header `{0}` is not signed")]
    UnsignedRequiredHeader(String),

    #[error(transparent)]
    MissingHeader(#[from] MissingHeaderError),

    #[error("date header is malformed")]
    InvalidDate,

    #[error("date is outside of the accepted skew")]
    StaleDate,

    #[error("key is unknown")]
    UnknownKey,

    #[error("key doesn't support the algorithm")]
    UnsupportedAlgorithm,

    #[error("signature mismatch")]
    BadSignature,
}

impl Rejection {
    /// Whether the key itself is at fault and shouldn't be presented again
    fn discards_key(&self) -> bool {
        matches!(
            self,
            Self::UnknownKey | Self::UnsupportedAlgorithm | Self::BadSignature
        )
    }
}

#[inline]
fn within_skew(now: SystemTime, date: SystemTime, skew: Duration) -> bool {
    let difference = now
        .duration_since(date)
        .unwrap_or_else(|err| err.duration());

    difference <= skew
}

/// Reconciles a challenge with the authorization a client presented
///
/// Holds no per-request state and can be shared between threads
#[derive(Clone, Debug, TypedBuilder)]
pub struct Verifier {
    /// Keys signatures are checked against
    #[builder(setter(into))]
    keychain: Arc<Keychain>,

    /// Accepted difference between the `Date` header and the current time
    ///
    /// `None` disables the check. Defaults to 5 minutes
    #[builder(default = Some(DEFAULT_SKEW))]
    skew: Option<Duration>,

    /// Time source of the skew check
    #[builder(default)]
    clock: Clock,
}

impl Verifier {
    /// Construct a verifier from its configuration
    pub fn from_config(keychain: impl Into<Arc<Keychain>>, config: &Configuration) -> Self {
        Self::builder()
            .keychain(keychain)
            .skew(config.skew())
            .build()
    }

    #[must_use]
    pub fn keychain(&self) -> &Arc<Keychain> {
        &self.keychain
    }

    #[must_use]
    pub fn skew(&self) -> Option<Duration> {
        self.skew
    }

    fn check<R>(
        &self,
        challenge: &Challenge,
        request: Option<&R>,
        authorization: Option<&Authorization>,
    ) -> Result<(), Rejection>
    where
        R: SignableRequest,
    {
        let (Some(request), Some(authorization)) = (request, authorization) else {
            return Err(Rejection::Incomplete);
        };

        if challenge.requires_all_headers() {
            let unsigned = request
                .header_names()
                .filter(|name| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()))
                .find(|name| !authorization.covers(name));

            if let Some(name) = unsigned {
                return Err(Rejection::UnsignedRequestHeader(name.to_string()));
            }
        }

        let unsigned = challenge
            .headers()
            .iter()
            .filter(|name| !name.starts_with(PSEUDO_HEADER_PREFIX))
            .find(|name| !authorization.covers(name));

        if let Some(name) = unsigned {
            return Err(Rejection::UnsignedRequiredHeader(name.clone()));
        }

        let missing = authorization
            .headers()
            .iter()
            .find(|name| !request.has_header(name));

        if let Some(name) = missing {
            return Err(MissingHeaderError::new(name).into());
        }

        if let Some(skew) = self.skew {
            if authorization.covers(DATE) {
                let date = request.date().ok_or(Rejection::InvalidDate)?;
                if !within_skew(self.clock.now(), date, skew) {
                    return Err(Rejection::StaleDate);
                }
            }
        }

        let key = self
            .keychain
            .find(authorization.key_id())
            .ok_or(Rejection::UnknownKey)?;

        if !key.supports(authorization.algorithm()) {
            return Err(Rejection::UnsupportedAlgorithm);
        }

        let content = request.signable_content(authorization.headers())?;
        if !key.verify(authorization.algorithm(), &content, authorization.signature()) {
            return Err(Rejection::BadSignature);
        }

        Ok(())
    }

    /// Verify the authorization a client presented for the request
    ///
    /// Rejections caused by the key (unknown key, unsupported algorithm, signature mismatch) hand back
    /// the challenge with the key ID discarded. Every other rejection hands back the challenge unchanged.
    #[instrument(skip_all, fields(realm = challenge.realm(), key_id = authorization.map(Authorization::key_id)))]
    pub fn verify<R>(
        &self,
        challenge: &Challenge,
        request: Option<&R>,
        authorization: Option<&Authorization>,
    ) -> Verdict
    where
        R: SignableRequest,
    {
        let rejection = match self.check(challenge, request, authorization) {
            Ok(()) => {
                debug!("accepted request");
                return Verdict::Accepted;
            }
            Err(rejection) => rejection,
        };

        debug!(reason = %rejection, "rejected request");

        match authorization {
            Some(authorization) if rejection.discards_key() => {
                Verdict::Rejected(challenge.discard_key_id(authorization.key_id()))
            }
            _ => Verdict::Rejected(challenge.clone()),
        }
    }

    /// Verify a request carrying its authorization in the `Authorization` header
    ///
    /// A missing or malformed header counts as no authorization
    pub fn verify_request<R>(&self, challenge: &Challenge, request: &R) -> Verdict
    where
        R: SignableRequest,
    {
        let authorization = request
            .header_values(AUTHORIZATION.as_str())
            .filter_map(|value| std::str::from_utf8(value).ok())
            .find_map(|value| match value.parse::<Authorization>() {
                Ok(authorization) => Some(authorization),
                Err(error) => {
                    debug!(?error, "ignoring malformed authorization header");
                    None
                }
            });

        self.verify(challenge, Some(request), authorization.as_ref())
    }
}
