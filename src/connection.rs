//! The connection-state aggregate: binds role, negotiated version, overall
//! status, the in-flight handshake (if any), per-direction record state, the
//! negotiated cipher suite, and the PRNG into one owner, manipulated
//! exclusively through its inherent methods.

use bytes::Bytes;

use crate::cipher_suite::CipherSuite;
use crate::direction::{CryptState, Direction, DirectionState};
use crate::error::{Error, Result};
use crate::handshake_state::{HandshakeSecrets, HandshakeState};
use crate::prf;
use crate::prng::RandomSource;
use crate::role::Role;
use crate::status::{self, HandshakeMessageType, Status};
use crate::version::ProtocolVersion;
use crate::wire::RecordHeader;

/// The full mutable state of one TLS connection.
#[derive(Debug)]
pub struct ConnectionState {
    role: Role,
    version: ProtocolVersion,
    status: Status,
    handshake: Option<HandshakeState>,
    tx: DirectionState,
    rx: DirectionState,
    cipher: Option<CipherSuite>,
    prng: RandomSource,
}

impl AsRef<Status> for ConnectionState {
    fn as_ref(&self) -> &Status {
        &self.status
    }
}

impl ConnectionState {
    /// A fresh connection in `Status::Init`, with no cipher negotiated yet
    /// and a PRNG seeded from OS entropy.
    pub fn new(role: Role, version: ProtocolVersion) -> Self {
        Self {
            role,
            version,
            status: Status::Init,
            handshake: None,
            tx: DirectionState::new(),
            rx: DirectionState::new(),
            cipher: None,
            prng: RandomSource::from_entropy(),
        }
    }

    /// As [`Self::new`], but with a caller-supplied seed -- for tests that
    /// must replay a handshake deterministically.
    pub fn new_with_seed(role: Role, version: ProtocolVersion, seed: [u8; 32]) -> Self {
        Self {
            prng: RandomSource::from_seed(seed),
            ..Self::new(role, version)
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn cipher(&self) -> Option<&CipherSuite> {
        self.cipher.as_ref()
    }

    pub const fn handshake(&self) -> Option<&HandshakeState> {
        self.handshake.as_ref()
    }

    pub const fn direction(&self, dir: Direction) -> &DirectionState {
        match dir {
            Direction::Tx => &self.tx,
            Direction::Rx => &self.rx,
        }
    }

    // -- handshake lifecycle -------------------------------------------------

    /// Begin a handshake as the client, recording the offered version and
    /// client random. Fails if a handshake is already in progress -- a
    /// dispatcher calling this twice is a bug this core surfaces rather than
    /// silently absorbs.
    pub fn start_handshake_client(
        &mut self,
        client_version: ProtocolVersion,
        client_random: [u8; 32],
    ) -> Result<()> {
        if self.handshake.is_some() {
            return Err(Error::internal(
                "start_handshake_client",
                "handshake already in progress",
            ));
        }
        tracing::debug!(?client_version, "starting client handshake");
        self.handshake = Some(HandshakeState::new(client_version, client_random));
        Ok(())
    }

    /// Clear all ephemeral handshake state. The negotiated cipher, version,
    /// per-direction keys, MAC sequence counters, and encryption-engaged
    /// flags all persist past this call.
    pub fn end_handshake(&mut self) {
        tracing::debug!("ending handshake");
        self.handshake = None;
    }

    fn handshake_mut(&mut self, site: &'static str) -> Result<&mut HandshakeState> {
        self.handshake
            .as_mut()
            .ok_or_else(|| Error::internal(site, "no handshake in progress"))
    }

    // -- transcript -------------------------------------------------------------

    /// Append `bytes` verbatim to the running transcript digests. Requires a
    /// handshake in progress.
    pub fn update_handshake_digest(&mut self, bytes: &[u8]) -> Result<()> {
        self.handshake_mut("update_handshake_digest")?
            .transcript
            .update(bytes);
        Ok(())
    }

    /// Append `encode_handshake_header(ty, body.len()) || body` to the
    /// running transcript digests. Byte-for-byte equivalent to calling
    /// [`Self::update_handshake_digest`] with the pre-encoded bytes, for
    /// callers (the receive path) that only hold the parsed body. Requires a
    /// handshake in progress.
    pub fn update_handshake_digest_splitted(&mut self, ty: u8, body: &[u8]) -> Result<()> {
        self.handshake_mut("update_handshake_digest_splitted")?
            .transcript
            .update_splitted(ty, body);
        Ok(())
    }

    // -- status machine -------------------------------------------------------

    /// Advance `self.status` on an incoming handshake message. Leaves
    /// `self.status` untouched on rejection.
    pub fn update_status_hs(&mut self, ty: HandshakeMessageType) -> Result<Status> {
        let prior = self.status;
        let next = status::status_after_message(prior, ty)?;
        tracing::debug!(?prior, ?next, ?ty, "handshake status advanced");
        self.status = next;
        Ok(self.status)
    }

    /// Advance `self.status` on a ChangeCipherSpec. `sending` is true if this
    /// side is sending the CCS, false if receiving it.
    pub fn update_status_cc(&mut self, sending: bool) -> Result<Status> {
        let prior = self.status;
        let next = status::status_after_change_cipher_spec(prior, self.role.is_client(), sending)?;
        tracing::debug!(?prior, ?next, sending, "change_cipher_spec status advanced");
        self.status = next;
        Ok(self.status)
    }

    // -- key schedule ---------------------------------------------------------

    /// Record the server random once it arrives. Requires a handshake with
    /// no server random recorded yet.
    pub fn set_server_random(&mut self, server_random: [u8; 32]) -> Result<()> {
        let hs = self.handshake_mut("set_server_random")?;
        match hs.secrets {
            HandshakeSecrets::Started => {
                hs.secrets = HandshakeSecrets::WithServerRandom { server_random };
                Ok(())
            }
            _ => Err(Error::internal(
                "set_server_random",
                "server random already recorded",
            )),
        }
    }

    /// Derive the master secret from `pre_master`, the negotiated version's
    /// PRF, and both randoms. Requires a handshake with a server random
    /// already recorded and no master secret yet.
    pub fn set_master_secret(&mut self, pre_master: &[u8]) -> Result<()> {
        let version = self.version;
        let client_random = self
            .handshake
            .as_ref()
            .ok_or_else(|| Error::internal("set_master_secret", "no handshake in progress"))?
            .client_random;
        let hs = self.handshake_mut("set_master_secret")?;
        let server_random = match hs.secrets {
            HandshakeSecrets::WithServerRandom { server_random } => server_random,
            _ => {
                return Err(Error::internal(
                    "set_master_secret",
                    "server random not yet recorded, or master secret already derived",
                ))
            }
        };
        let master_secret = prf::master_secret(version, pre_master, &client_random, &server_random);
        tracing::trace!("master secret derived");
        hs.secrets = HandshakeSecrets::WithMasterSecret {
            server_random,
            master_secret,
        };
        Ok(())
    }

    /// Derive the key block and partition it into six contiguous pieces --
    /// client MAC secret, server MAC secret, client write key, server write
    /// key, client write IV, server write IV -- installing the client half
    /// into whichever of `tx`/`rx` this role sends/receives on. Requires a
    /// master secret and a negotiated cipher suite.
    pub fn set_key_block(&mut self) -> Result<()> {
        let version = self.version;
        let cipher = self
            .cipher
            .ok_or_else(|| Error::internal("set_key_block", "no cipher suite negotiated"))?;
        let client_random = self
            .handshake
            .as_ref()
            .ok_or_else(|| Error::internal("set_key_block", "no handshake in progress"))?
            .client_random;
        let (server_random, master_secret) = {
            let hs = self.handshake_mut("set_key_block")?;
            match hs.secrets {
                HandshakeSecrets::WithMasterSecret {
                    server_random,
                    master_secret,
                } => (server_random, master_secret),
                _ => {
                    return Err(Error::internal(
                        "set_key_block",
                        "master secret not yet derived",
                    ))
                }
            }
        };

        let size = cipher.key_block_size();
        let block = prf::key_block(version, &client_random, &server_random, &master_secret, size);
        if block.len() < size {
            return Err(Error::internal("set_key_block", "derived key block too short"));
        }

        let digest_size = cipher.digest_size();
        let key_size = cipher.key_size;
        let iv_size = cipher.iv_size;

        let mut offset = 0usize;
        let mut take = |len: usize| {
            let piece = Bytes::copy_from_slice(&block[offset..offset + len]);
            offset += len;
            piece
        };

        let client_mac_secret = take(digest_size);
        let server_mac_secret = take(digest_size);
        let client_write_key = take(key_size);
        let server_write_key = take(key_size);
        let client_write_iv = take(iv_size);
        let server_write_iv = take(iv_size);

        let client_side = CryptState {
            key: client_write_key,
            iv: client_write_iv,
            mac_secret: client_mac_secret,
        };
        let server_side = CryptState {
            key: server_write_key,
            iv: server_write_iv,
            mac_secret: server_mac_secret,
        };

        let (tx_side, rx_side) = if self.role.is_client() {
            (client_side, server_side)
        } else {
            (server_side, client_side)
        };
        self.tx.install_keys(tx_side);
        self.rx.install_keys(rx_side);
        tracing::trace!("key block installed");
        Ok(())
    }

    /// Record the peer's RSA public key. Requires a handshake in progress.
    pub fn set_public_key(&mut self, public_key: Bytes) -> Result<()> {
        self.handshake_mut("set_public_key")?.rsa_public_key = Some(public_key);
        Ok(())
    }

    /// Record the local RSA private key. Requires a handshake in progress.
    pub fn set_private_key(&mut self, private_key: Bytes) -> Result<()> {
        self.handshake_mut("set_private_key")?.rsa_private_key = Some(private_key);
        Ok(())
    }

    /// Set the negotiated cipher suite. Never cleared once set.
    pub fn set_cipher(&mut self, cipher: CipherSuite) {
        self.cipher = Some(cipher);
    }

    /// Set the negotiated protocol version.
    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    // -- direction engagement --------------------------------------------------

    /// Engage encryption on the send side. One-way; no disengage method
    /// exists.
    pub fn switch_tx_encryption(&mut self) {
        self.tx.engage_encryption();
    }

    /// Engage encryption on the receive side. One-way; no disengage method
    /// exists.
    pub fn switch_rx_encryption(&mut self) {
        self.rx.engage_encryption();
    }

    // -- record MAC -------------------------------------------------------------

    /// Compute the record MAC for `content` under `header`, using `direction`'s
    /// installed key material and sequence counter, then advance that
    /// counter. Never advances on failure.
    pub fn make_digest(
        &mut self,
        direction: Direction,
        header: &RecordHeader,
        content: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = self
            .cipher
            .ok_or_else(|| Error::internal("make_digest", "no cipher suite negotiated"))?;
        let version = self.version;
        let dir_state = match direction {
            Direction::Tx => &mut self.tx,
            Direction::Rx => &mut self.rx,
        };
        let crypt = dir_state
            .crypt()
            .ok_or_else(|| Error::internal("make_digest", "no key material installed for direction"))?
            .clone();
        let sequence = dir_state.mac().sequence();

        let mut msg = Vec::with_capacity(8 + 5 + content.len());
        msg.extend_from_slice(&crate::wire::encode_word64(sequence));
        if version.is_ssl3() {
            msg.extend_from_slice(&header.encode_no_version());
        } else {
            msg.extend_from_slice(&header.encode());
        }
        msg.extend_from_slice(content);

        let digest = if version.is_ssl3() {
            crate::mac::ssl_mac(cipher.mac_hash, &crypt.mac_secret, &msg)
        } else {
            crate::mac::hmac(cipher.mac_hash, &crypt.mac_secret, &msg)?
        };

        dir_state.advance_sequence()?;
        Ok(digest)
    }

    // -- Finished verify_data -----------------------------------------------

    /// Compute this handshake's Finished `verify_data` for the client or
    /// server side, without consuming the running transcript. Requires a
    /// handshake with a master secret already derived.
    pub fn get_handshake_digest(&self, for_client: bool) -> Result<Vec<u8>> {
        let hs = self
            .handshake
            .as_ref()
            .ok_or_else(|| Error::internal("get_handshake_digest", "no handshake in progress"))?;
        let master_secret = hs
            .secrets
            .master_secret()
            .ok_or_else(|| Error::internal("get_handshake_digest", "master secret not yet derived"))?;
        let digest = if for_client {
            prf::client_finished(self.version, master_secret, &hs.transcript)
        } else {
            prf::server_finished(self.version, master_secret, &hs.transcript)
        };
        Ok(digest)
    }

    // -- PRNG transaction -------------------------------------------------------

    /// The sole path that reads or writes `self.prng`: `f` is handed the
    /// current generator by value and must return a replacement alongside
    /// its result, which this method installs back.
    pub fn with_prng<T>(&mut self, f: impl FnOnce(RandomSource) -> (T, RandomSource)) -> T {
        let placeholder = RandomSource::from_seed([0u8; 32]);
        let current = std::mem::replace(&mut self.prng, placeholder);
        let (value, next) = f(current);
        self.prng = next;
        value
    }
}
