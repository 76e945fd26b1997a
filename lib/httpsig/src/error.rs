use crate::Algorithm;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A header named in the signed header list has no value on the request
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
#[error("Missing header `{name}`")]
pub struct MissingHeaderError {
    /// Name of the header as it appeared in the header list
    pub name: String,
}

impl MissingHeaderError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Malformed `Authorization` or `WWW-Authenticate` header value
#[derive(Debug, Diagnostic, Error)]
pub enum ParseError {
    /// Signature was not valid Base64
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// Parameter was supplied twice
    #[error("Duplicate parameter `{name}`")]
    DuplicateParameter {
        /// Name of the parameter
        name: String,

        /// Location of the second occurrence
        #[label("already supplied earlier")]
        span: SourceSpan,
    },

    /// Value didn't start with the `Signature` scheme token
    #[error("Missing `Signature` authentication scheme")]
    #[diagnostic(help("the header value has to start with `Signature `"))]
    MissingScheme,

    /// Required parameter is absent
    #[error("Missing parameter `{0}`")]
    MissingParameter(&'static str),

    /// Input ended in the middle of a parameter
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Token that doesn't fit the `name="value"` grammar
    #[error("Unexpected token")]
    #[diagnostic(help("parameters have the form name=\"value\" and are separated by commas"))]
    UnexpectedToken {
        /// Location of the token
        #[label("unexpected token")]
        span: SourceSpan,
    },

    /// Algorithm name isn't known
    #[error("Unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// Parameter isn't part of the scheme
    #[error("Unknown parameter `{name}`")]
    UnknownParameter {
        /// Name of the parameter
        name: String,

        /// Location of the parameter
        #[label("unknown parameter")]
        span: SourceSpan,
    },
}

/// Key decoding error
#[derive(Debug, Diagnostic, Error)]
pub enum KeyError {
    /// Malformed Base64 in an OpenSSH public key line
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// DSA domain parameters or key are out of range
    #[error("Invalid DSA key")]
    InvalidDsaKey,

    /// Key rejected by the cryptographic backend
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Malformed PKCS#8 document
    #[error(transparent)]
    Pkcs8(#[from] pkcs8::Error),

    /// Malformed SubjectPublicKeyInfo document
    #[error(transparent)]
    Spki(#[from] pkcs8::spki::Error),

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,

    /// Elliptic curve is not supported
    #[error("Unsupported elliptic curve")]
    UnsupportedCurve,
}

/// Client-side signing error
#[derive(Debug, Diagnostic, Error)]
pub enum SignError {
    /// Signing string couldn't be constructed
    #[error(transparent)]
    MissingHeader(#[from] MissingHeaderError),

    /// None of the keys is both allowed by the challenge and able to use one of its algorithms
    #[error("No usable key for the challenge")]
    NoUsableKey,

    /// The cryptographic primitive failed
    #[error("Signing failed")]
    Primitive,

    /// Key can't produce signatures with this algorithm
    #[error("Algorithm `{0}` is not supported by this key")]
    UnsupportedAlgorithm(Algorithm),
}
