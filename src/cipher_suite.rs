//! The cipher-suite descriptor this crate consumes but does not choose or
//! implement: key/IV/digest sizes and the hash bound to the record MAC and
//! the TLS 1.2 PRF. A real dispatcher negotiates a suite and hands a
//! [`CipherSuite`] value to [`crate::ConnectionState::set_cipher`]; the
//! `const`s here exist so this crate's own tests have something concrete to
//! derive key material for.

/// Hash algorithm bound to a cipher suite's MAC (and, for TLS 1.2, its PRF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacHash {
    Md5,
    Sha1,
    Sha256,
}

impl MacHash {
    /// Digest output size in bytes.
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// HMAC block size in bytes (RFC 2104), needed by the generic HMAC
    /// construction the record MAC uses for TLS 1.0+.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Md5 | Self::Sha1 | Self::Sha256 => 64,
        }
    }
}

/// Sizes and MAC hash for a negotiated cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuite {
    pub name: &'static str,
    pub key_size: usize,
    pub iv_size: usize,
    pub mac_hash: MacHash,
}

impl CipherSuite {
    /// Digest size of this suite's MAC hash.
    pub const fn digest_size(&self) -> usize {
        self.mac_hash.digest_size()
    }

    /// Total key-block length: two MAC secrets, two write keys, two write
    /// IVs (client, then server, for each).
    pub const fn key_block_size(&self) -> usize {
        2 * self.digest_size() + 2 * self.key_size + 2 * self.iv_size
    }
}

/// `TLS_RSA_WITH_AES_128_CBC_SHA` (RFC 3268).
pub const TLS_RSA_WITH_AES_128_CBC_SHA: CipherSuite = CipherSuite {
    name: "TLS_RSA_WITH_AES_128_CBC_SHA",
    key_size: 16,
    iv_size: 16,
    mac_hash: MacHash::Sha1,
};

/// `TLS_RSA_WITH_AES_256_CBC_SHA256` (RFC 5246).
pub const TLS_RSA_WITH_AES_256_CBC_SHA256: CipherSuite = CipherSuite {
    name: "TLS_RSA_WITH_AES_256_CBC_SHA256",
    key_size: 32,
    iv_size: 16,
    mac_hash: MacHash::Sha256,
};

/// `TLS_RSA_WITH_3DES_EDE_CBC_SHA` (RFC 2246).
pub const TLS_RSA_WITH_3DES_EDE_CBC_SHA: CipherSuite = CipherSuite {
    name: "TLS_RSA_WITH_3DES_EDE_CBC_SHA",
    key_size: 24,
    iv_size: 8,
    mac_hash: MacHash::Sha1,
};
