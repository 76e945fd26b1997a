use crate::{error::ParseError, header, Algorithm, ALL_HEADERS};
use indexmap::IndexSet;
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Server demand carried in the `WWW-Authenticate` header
///
/// Values are immutable. Operations that narrow the challenge return a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    realm: String,
    headers: Vec<String>,
    algorithms: IndexSet<Algorithm>,
    discarded_key_ids: IndexSet<String>,
}

impl Challenge {
    /// Construct a new challenge without any discarded key IDs
    ///
    /// Empty header names are skipped
    pub fn new<R, H, S, A>(realm: R, headers: H, algorithms: A) -> Self
    where
        R: Into<String>,
        H: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = Algorithm>,
    {
        Self {
            realm: realm.into(),
            headers: headers
                .into_iter()
                .map(Into::into)
                .filter(|header: &String| !header.is_empty())
                .collect(),
            algorithms: algorithms.into_iter().collect(),
            discarded_key_ids: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Header names (and pseudo-headers) a client has to sign
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Algorithms the server accepts, in order of preference
    #[must_use]
    pub fn algorithms(&self) -> &IndexSet<Algorithm> {
        &self.algorithms
    }

    /// Key IDs that failed earlier and shouldn't be presented again
    #[must_use]
    pub fn discarded_key_ids(&self) -> &IndexSet<String> {
        &self.discarded_key_ids
    }

    #[must_use]
    pub fn is_key_id_discarded(&self, key_id: &str) -> bool {
        self.discarded_key_ids.contains(key_id)
    }

    /// Whether the challenge contains the `:all` pseudo-header
    #[must_use]
    pub fn requires_all_headers(&self) -> bool {
        crate::contains_header(&self.headers, ALL_HEADERS)
    }

    /// Derive a narrowed challenge telling the client not to use `key_id` again
    ///
    /// Discarding an already discarded ID returns an equal challenge.
    /// The empty ID can't be carried by the `discardKeyIds` list and is never discarded.
    #[must_use]
    pub fn discard_key_id(&self, key_id: &str) -> Self {
        let mut narrowed = self.clone();
        if !key_id.is_empty() {
            narrowed.discarded_key_ids.insert(key_id.to_string());
        }
        narrowed
    }
}

impl FromStr for Challenge {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut realm = None;
        let mut headers = None;
        let mut algorithms = None;
        let mut discarded_key_ids = None;

        for param in header::parse(s)? {
            let param = param?;

            match param.name {
                "realm" => header::assign(&mut realm, &param)?,
                "headers" => header::assign(&mut headers, &param)?,
                "algorithms" => header::assign(&mut algorithms, &param)?,
                "discardKeyIds" => header::assign(&mut discarded_key_ids, &param)?,
                _ => return Err(header::unknown(&param)),
            }
        }

        let realm = realm.ok_or(ParseError::MissingParameter("realm"))?;
        let headers = headers.ok_or(ParseError::MissingParameter("headers"))?;
        let algorithms = algorithms
            .ok_or(ParseError::MissingParameter("algorithms"))?
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()?;
        let discarded_key_ids = discarded_key_ids
            .map(|ids| header::split(&ids))
            .unwrap_or_default();

        Ok(Self {
            realm: realm.into_owned(),
            headers: header::split(&headers),
            algorithms,
            discarded_key_ids: discarded_key_ids.into_iter().collect(),
        })
    }
}

impl Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = header::join(self.headers.iter().map(String::as_str));
        let algorithms = header::join(self.algorithms.iter().map(|algorithm| algorithm.as_str()));

        if self.discarded_key_ids.is_empty() {
            header::write_params(
                f,
                &[
                    ("realm", &self.realm),
                    ("headers", &headers),
                    ("algorithms", &algorithms),
                ],
            )
        } else {
            let discarded = header::join(self.discarded_key_ids.iter().map(String::as_str));

            header::write_params(
                f,
                &[
                    ("realm", &self.realm),
                    ("headers", &headers),
                    ("algorithms", &algorithms),
                    ("discardKeyIds", &discarded),
                ],
            )
        }
    }
}
