use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Signature algorithm identifiers as they appear on the wire
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-1
    RsaSha1,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    RsaSha256,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    RsaSha512,

    /// DSA with SHA-1
    DsaSha1,

    /// DSA with SHA-256
    DsaSha256,

    /// ECDSA over P-256 with SHA-256
    EcdsaSha256,

    /// ECDSA over P-384 with SHA-384
    EcdsaSha384,

    /// Ed25519
    Ed25519,

    /// OpenSSH `ssh-rsa` (RSASSA-PKCS1-v1_5 with SHA-1)
    SshRsa,

    /// OpenSSH `ssh-dss` (DSA with SHA-1)
    SshDss,
}

impl Algorithm {
    /// Every algorithm known to this crate, in order of preference
    pub const ALL: &'static [Self] = &[
        Self::RsaSha256,
        Self::RsaSha512,
        Self::EcdsaSha256,
        Self::EcdsaSha384,
        Self::Ed25519,
        Self::DsaSha256,
        Self::RsaSha1,
        Self::DsaSha1,
        Self::SshRsa,
        Self::SshDss,
    ];

    /// Wire name of the algorithm
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RsaSha1 => "rsa-sha1",
            Self::RsaSha256 => "rsa-sha256",
            Self::RsaSha512 => "rsa-sha512",
            Self::DsaSha1 => "dsa-sha1",
            Self::DsaSha256 => "dsa-sha256",
            Self::EcdsaSha256 => "ecdsa-sha256",
            Self::EcdsaSha384 => "ecdsa-sha384",
            Self::Ed25519 => "ed25519",
            Self::SshRsa => "ssh-rsa",
            Self::SshDss => "ssh-dss",
        }
    }
}

impl Display for Algorithm {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownAlgorithm(s.to_string()))
    }
}
