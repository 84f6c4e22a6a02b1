//! Ephemeral per-handshake state: negotiated client version, the client and
//! server randoms, the secrets derived from them, and the running
//! transcript. Exists only between a handshake start and
//! [`crate::ConnectionState::end_handshake`].
//!
//! [`HandshakeSecrets`] makes illegal states unrepresentable instead of
//! carrying `server_random: Option<_>, master_secret: Option<_>` side by
//! side -- a master secret can only exist once a server random does, so the
//! type says so.

use bytes::Bytes;
use zeroize::Zeroize;

use crate::hash::TranscriptDigest;
use crate::version::ProtocolVersion;

/// The secrets a handshake accumulates, in the only order they can exist.
#[derive(Debug, Clone)]
pub enum HandshakeSecrets {
    /// Only the client random is known yet.
    Started,
    /// The server random has arrived; no master secret yet.
    WithServerRandom { server_random: [u8; 32] },
    /// The master secret has been derived.
    WithMasterSecret {
        server_random: [u8; 32],
        master_secret: [u8; 48],
    },
}

impl HandshakeSecrets {
    pub const fn server_random(&self) -> Option<&[u8; 32]> {
        match self {
            Self::Started => None,
            Self::WithServerRandom { server_random }
            | Self::WithMasterSecret { server_random, .. } => Some(server_random),
        }
    }

    pub const fn master_secret(&self) -> Option<&[u8; 48]> {
        match self {
            Self::Started | Self::WithServerRandom { .. } => None,
            Self::WithMasterSecret { master_secret, .. } => Some(master_secret),
        }
    }
}

/// State that exists only while a handshake is in progress.
#[derive(Debug, Clone)]
pub struct HandshakeState {
    pub client_version: ProtocolVersion,
    pub client_random: [u8; 32],
    pub secrets: HandshakeSecrets,
    pub rsa_public_key: Option<Bytes>,
    pub rsa_private_key: Option<Bytes>,
    pub transcript: TranscriptDigest,
}

impl HandshakeState {
    /// Begin a handshake with the client's offered version and random.
    /// Neither the server random nor any secret is known yet.
    pub fn new(client_version: ProtocolVersion, client_random: [u8; 32]) -> Self {
        Self {
            client_version,
            client_random,
            secrets: HandshakeSecrets::Started,
            rsa_public_key: None,
            rsa_private_key: None,
            transcript: TranscriptDigest::new(),
        }
    }
}

impl Drop for HandshakeState {
    fn drop(&mut self) {
        self.client_random.zeroize();
        match &mut self.secrets {
            HandshakeSecrets::Started => {}
            HandshakeSecrets::WithServerRandom { server_random } => server_random.zeroize(),
            HandshakeSecrets::WithMasterSecret {
                server_random,
                master_secret,
            } => {
                server_random.zeroize();
                master_secret.zeroize();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_randoms_or_secrets() {
        let hs = HandshakeState::new(ProtocolVersion::Tls1_2, [1u8; 32]);
        assert!(hs.secrets.server_random().is_none());
        assert!(hs.secrets.master_secret().is_none());
    }

    #[test]
    fn master_secret_requires_server_random_tag() {
        let secrets = HandshakeSecrets::WithServerRandom {
            server_random: [2u8; 32],
        };
        assert!(secrets.server_random().is_some());
        assert!(secrets.master_secret().is_none());

        let secrets = HandshakeSecrets::WithMasterSecret {
            server_random: [2u8; 32],
            master_secret: [3u8; 48],
        };
        assert!(secrets.server_random().is_some());
        assert!(secrets.master_secret().is_some());
    }
}
