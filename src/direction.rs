//! Per-direction record state: the keys/IV/MAC secret installed by the key
//! schedule, and the 64-bit sequence counter fed into every record MAC.
//!
//! One [`DirectionState`] exists for `tx` and one for `rx`; [`crate::ConnectionState`]
//! owns both and never lets them diverge from the epoch installed by
//! `set_key_block`.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Which way a record is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Tx,
    Rx,
}

/// Symmetric key material for one direction, installed once per epoch.
/// Immutable by construction -- an epoch change replaces the whole value
/// rather than mutating fields in place.
#[derive(Clone, PartialEq, Eq)]
pub struct CryptState {
    pub key: Bytes,
    pub iv: Bytes,
    pub mac_secret: Bytes,
}

impl std::fmt::Debug for CryptState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptState")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .field("mac_secret", &"<redacted>")
            .finish()
    }
}

/// The record sequence counter for one direction. Never decreases; checked
/// rather than wrapped at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacState {
    sequence: u64,
}

impl MacState {
    pub const fn new() -> Self {
        Self { sequence: 0 }
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Advance by one. Fails rather than wrapping if already at `u64::MAX` --
    /// a connection that reaches this point must be torn down, not handed a
    /// sequence number that silently repeats.
    pub fn advance(&mut self) -> Result<()> {
        if self.sequence == u64::MAX {
            return Err(Error::internal("MacState::advance", "sequence exhausted"));
        }
        self.sequence += 1;
        Ok(())
    }
}

/// One direction's full record state: whether encryption is engaged yet, the
/// installed key material (if any), and the sequence counter.
#[derive(Debug, Clone, Default)]
pub struct DirectionState {
    encrypted: bool,
    crypt: Option<CryptState>,
    mac: MacState,
}

impl DirectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn crypt(&self) -> Option<&CryptState> {
        self.crypt.as_ref()
    }

    pub const fn mac(&self) -> &MacState {
        &self.mac
    }

    /// Install a fresh epoch's key material and reset the sequence counter
    /// to zero. Does not itself engage encryption -- that is a separate,
    /// one-way switch (see [`Self::engage_encryption`]).
    pub fn install_keys(&mut self, crypt: CryptState) {
        self.crypt = Some(crypt);
        self.mac = MacState::new();
    }

    /// Engage encryption for this direction. There is no corresponding
    /// disengage -- flipping it back off mid-connection is not a supported
    /// operation.
    pub fn engage_encryption(&mut self) {
        self.encrypted = true;
    }

    /// Advance the sequence counter after a successful `make_digest` call.
    pub fn advance_sequence(&mut self) -> Result<()> {
        self.mac.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_direction_is_not_encrypted_and_has_no_keys() {
        let d = DirectionState::new();
        assert!(!d.is_encrypted());
        assert!(d.crypt().is_none());
        assert_eq!(d.mac().sequence(), 0);
    }

    #[test]
    fn installing_keys_resets_sequence() {
        let mut d = DirectionState::new();
        d.advance_sequence().unwrap();
        d.advance_sequence().unwrap();
        assert_eq!(d.mac().sequence(), 2);
        d.install_keys(CryptState {
            key: Bytes::from_static(&[1; 16]),
            iv: Bytes::from_static(&[2; 16]),
            mac_secret: Bytes::from_static(&[3; 20]),
        });
        assert_eq!(d.mac().sequence(), 0);
        assert!(d.crypt().is_some());
    }

    #[test]
    fn sequence_refuses_to_wrap() {
        let mut m = MacState {
            sequence: u64::MAX,
        };
        assert!(m.advance().is_err());
        assert_eq!(m.sequence(), u64::MAX);
    }

    #[test]
    fn engage_encryption_has_no_disengage() {
        let mut d = DirectionState::new();
        d.engage_encryption();
        assert!(d.is_encrypted());
        // No method exists to turn it back off; re-engaging is a no-op.
        d.engage_encryption();
        assert!(d.is_encrypted());
    }
}
