//! Negotiated protocol version, ordered the way the wire numbers it.

use std::fmt;

/// TLS/SSL protocol version. `Ord` follows the wire ordering
/// (`Ssl3 < Tls1_0 < Tls1_1 < Tls1_2`) so version-conditional logic (the key
/// schedule, the MAC construction) can use plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolVersion {
    Ssl3,
    Tls1_0,
    Tls1_1,
    Tls1_2,
}

impl ProtocolVersion {
    /// The on-wire `(major, minor)` pair, per RFC 2246/4346/5246.
    pub const fn wire(self) -> (u8, u8) {
        match self {
            Self::Ssl3 => (3, 0),
            Self::Tls1_0 => (3, 1),
            Self::Tls1_1 => (3, 2),
            Self::Tls1_2 => (3, 3),
        }
    }

    /// Whether this version uses the SSLv3-specific MAC and key-derivation
    /// constructions rather than HMAC/the TLS PRF.
    pub const fn is_ssl3(self) -> bool {
        matches!(self, Self::Ssl3)
    }

    /// Whether this version's PRF is the TLS 1.2 single-hash (SHA-256 by
    /// default) construction rather than the MD5⊕SHA-1 split PRF.
    pub const fn uses_tls12_prf(self) -> bool {
        matches!(self, Self::Tls1_2)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ssl3 => "SSL3.0",
            Self::Tls1_0 => "TLS1.0",
            Self::Tls1_1 => "TLS1.1",
            Self::Tls1_2 => "TLS1.2",
        };
        f.write_str(s)
    }
}
