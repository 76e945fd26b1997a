use crate::{error::ParseError, header, Algorithm, DATE};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Client assertion carried in the `Authorization` header
///
/// ```text
/// Signature keyId="k1",algorithm="rsa-sha256",headers="request-line date",signature="..."
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    key_id: String,
    algorithm: Algorithm,
    headers: Vec<String>,
    signature: Vec<u8>,
}

impl Authorization {
    /// Construct a new authorization
    ///
    /// `headers` are the header names in the order they were signed in. Empty names are skipped.
    pub fn new<K, H, S>(key_id: K, algorithm: Algorithm, headers: H, signature: Vec<u8>) -> Self
    where
        K: Into<String>,
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_id: key_id.into(),
            algorithm,
            headers: headers
                .into_iter()
                .map(Into::into)
                .filter(|header: &String| !header.is_empty())
                .collect(),
            signature,
        }
    }

    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Header names the client claims to have signed, in signing order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw signature bytes (already decoded from Base64)
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Check whether the header (or pseudo-header) is part of the signed header list
    #[must_use]
    pub fn covers(&self, name: &str) -> bool {
        crate::contains_header(&self.headers, name)
    }
}

impl FromStr for Authorization {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut key_id = None;
        let mut algorithm = None;
        let mut headers = None;
        let mut signature = None;

        for param in header::parse(s)? {
            let param = param?;

            match param.name {
                "keyId" => header::assign(&mut key_id, &param)?,
                "algorithm" => header::assign(&mut algorithm, &param)?,
                "headers" => header::assign(&mut headers, &param)?,
                "signature" => header::assign(&mut signature, &param)?,
                _ => return Err(header::unknown(&param)),
            }
        }

        let key_id = key_id.ok_or(ParseError::MissingParameter("keyId"))?;
        let algorithm = algorithm
            .ok_or(ParseError::MissingParameter("algorithm"))?
            .parse()?;
        let signature = signature.ok_or(ParseError::MissingParameter("signature"))?;
        let signature = base64_simd::STANDARD.decode_to_vec(signature.as_bytes())?;

        // The scheme falls back to signing only the `Date` header if the list is omitted
        let headers = headers.map_or_else(
            || vec![DATE.to_string()],
            |headers| header::split(&headers),
        );

        Ok(Self {
            key_id: key_id.into_owned(),
            algorithm,
            headers,
            signature,
        })
    }
}

impl Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = header::join(self.headers.iter().map(String::as_str));
        let signature = base64_simd::STANDARD.encode_to_string(&self.signature);

        header::write_params(
            f,
            &[
                ("keyId", &self.key_id),
                ("algorithm", &self.algorithm),
                ("headers", &headers),
                ("signature", &signature),
            ],
        )
    }
}
