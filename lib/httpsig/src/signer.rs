use crate::{
    error::SignError, Algorithm, Authorization, Challenge, SignableRequest, SigningKey,
    ALL_HEADERS, PSEUDO_HEADER_PREFIX,
};
use http::header::AUTHORIZATION;
use tracing::{field, Span};

/// Signing key together with the ID the server knows it by
#[derive(Debug)]
pub struct PrivateKey {
    key_id: String,
    key: SigningKey,
}

impl PrivateKey {
    pub fn new(key_id: impl Into<String>, key: SigningKey) -> Self {
        Self {
            key_id: key_id.into(),
            key,
        }
    }

    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    #[must_use]
    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}

/// Client side of the challenge/response exchange
///
/// When the server rejects a key it re-issues the challenge with the key ID discarded.
/// Signing the narrowed challenge again picks the next usable key.
#[derive(Debug, Default)]
pub struct Signer {
    keys: Vec<PrivateKey>,
}

impl Signer {
    /// Construct a signer from keys in order of preference
    #[must_use]
    pub fn new(keys: Vec<PrivateKey>) -> Self {
        Self { keys }
    }

    pub fn add(&mut self, key: PrivateKey) {
        self.keys.push(key);
    }

    /// Pick the first key that isn't discarded and supports one of the challenge's algorithms
    ///
    /// Algorithms are tried in the order the challenge prefers them
    #[must_use]
    pub fn select(&self, challenge: &Challenge) -> Option<(&PrivateKey, Algorithm)> {
        self.keys
            .iter()
            .filter(|key| !challenge.is_key_id_discarded(key.key_id()))
            .find_map(|key| {
                challenge
                    .algorithms()
                    .iter()
                    .copied()
                    .find(|algorithm| key.key().can_sign(*algorithm))
                    .map(|algorithm| (key, algorithm))
            })
    }

    /// Header list to sign for the challenge
    ///
    /// `:all` is replaced by every request header not listed otherwise, in request order
    pub fn signed_headers<R>(challenge: &Challenge, request: &R) -> Vec<String>
    where
        R: SignableRequest,
    {
        let mut headers: Vec<String> = Vec::with_capacity(challenge.headers().len());

        for name in challenge.headers() {
            if name.eq_ignore_ascii_case(ALL_HEADERS) {
                let remaining = request
                    .header_names()
                    .filter(|name| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()))
                    .filter(|name| !crate::contains_header(challenge.headers(), name))
                    .filter(|name| !crate::contains_header(&headers, name))
                    .map(str::to_string)
                    .collect::<Vec<_>>();

                headers.extend(remaining);
            } else if !name.starts_with(PSEUDO_HEADER_PREFIX)
                && !crate::contains_header(&headers, name)
            {
                headers.push(name.clone());
            }
        }

        headers
    }

    /// Answer the challenge for the request
    #[instrument(skip_all, fields(realm = challenge.realm(), key_id = field::Empty, algorithm = field::Empty))]
    pub fn sign<R>(&self, challenge: &Challenge, request: &R) -> Result<Authorization, SignError>
    where
        R: SignableRequest,
    {
        let (key, algorithm) = self.select(challenge).ok_or(SignError::NoUsableKey)?;

        let span = Span::current();
        span.record("key_id", key.key_id());
        span.record("algorithm", algorithm.as_str());

        let headers = Self::signed_headers(challenge, request);
        let signing_string = request.signable_content(&headers)?;
        let signature = key.key().sign(algorithm, &signing_string)?;

        debug!(headers = headers.len(), "signed request");

        Ok(Authorization::new(
            key.key_id(),
            algorithm,
            headers,
            signature,
        ))
    }
}

impl FromIterator<PrivateKey> for Signer {
    fn from_iter<T: IntoIterator<Item = PrivateKey>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
