//! The running handshake transcript: parallel MD5 and SHA-1 contexts fed by
//! every handshake message (excluding record-layer framing and
//! `HelloRequest`), plus a SHA-256 context carried alongside them so the
//! TLS 1.2 Finished computation (single-hash) and TLS 1.0/1.1 (MD5+SHA-1)
//! can share one running transcript (see DESIGN.md).

use md5::Md5;
use sha1::Sha1;
use sha2::digest::Digest;
use sha2::Sha256;

use crate::status::HandshakeMessageType;
use crate::wire::encode_handshake_header;

/// 16-byte MD5 transcript digest.
pub type Md5Digest = [u8; 16];
/// 20-byte SHA-1 transcript digest.
pub type Sha1Digest = [u8; 20];
/// 32-byte SHA-256 transcript digest.
pub type Sha256Digest = [u8; 32];

/// `true` for handshake message types that belong in the transcript, `false`
/// for `HelloRequest` and `CertificateVerify`.
pub fn finish_handshake_type_material(ty: HandshakeMessageType) -> bool {
    use HandshakeMessageType::*;
    matches!(
        ty,
        ClientHello
            | ServerHello
            | Certificate
            | ServerHelloDone
            | ClientKeyExchange
            | ServerKeyExchange
            | CertificateRequest
            | Finished
    )
}

/// Running MD5/SHA-1/SHA-256 transcript, created lazily on first update.
#[derive(Clone, Default)]
pub struct TranscriptDigest {
    md5: Option<Md5>,
    sha1: Option<Sha1>,
    sha256: Option<Sha256>,
}

impl std::fmt::Debug for TranscriptDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptDigest")
            .field("md5_started", &self.md5.is_some())
            .field("sha1_started", &self.sha1.is_some())
            .field("sha256_started", &self.sha256.is_some())
            .finish()
    }
}

impl TranscriptDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` verbatim to every running context.
    pub fn update(&mut self, bytes: &[u8]) {
        self.md5.get_or_insert_with(Md5::new).update(bytes);
        self.sha1.get_or_insert_with(Sha1::new).update(bytes);
        self.sha256.get_or_insert_with(Sha256::new).update(bytes);
    }

    /// Append `encode_handshake_header(ty, body.len()) || body`. Byte-for-byte
    /// equivalent to calling [`Self::update`] with the pre-encoded bytes
    /// directly.
    pub fn update_splitted(&mut self, ty: u8, body: &[u8]) {
        let header = encode_handshake_header(ty, body.len() as u32);
        let md5 = self.md5.get_or_insert_with(Md5::new);
        md5.update(header);
        md5.update(body);
        let sha1 = self.sha1.get_or_insert_with(Sha1::new);
        sha1.update(header);
        sha1.update(body);
        let sha256 = self.sha256.get_or_insert_with(Sha256::new);
        sha256.update(header);
        sha256.update(body);
    }

    /// Snapshot the current digests without mutating the running contexts --
    /// a later message (e.g. the peer's own Finished) must still be
    /// foldable into the same transcript after this call.
    pub fn snapshot(&self) -> (Md5Digest, Sha1Digest) {
        let md5 = self
            .md5
            .clone()
            .unwrap_or_else(Md5::new)
            .finalize()
            .into();
        let sha1 = self
            .sha1
            .clone()
            .unwrap_or_else(Sha1::new)
            .finalize()
            .into();
        (md5, sha1)
    }

    /// Snapshot the SHA-256 context alongside MD5/SHA-1, for cipher suites
    /// that bind a different hash to the transcript.
    pub fn snapshot_sha256(&self) -> Sha256Digest {
        self.sha256
            .clone()
            .unwrap_or_else(Sha256::new)
            .finalize()
            .into()
    }

    /// `MD5(handshake_messages || extra)`, without mutating the running
    /// context. Used by the SSL3 Finished construction, which folds a
    /// sender tag and the master secret into the transcript hash before
    /// the outer pad-based hash is applied.
    pub fn md5_with_extra(&self, extra: &[u8]) -> Md5Digest {
        let mut ctx = self.md5.clone().unwrap_or_else(Md5::new);
        ctx.update(extra);
        ctx.finalize().into()
    }

    /// `SHA1(handshake_messages || extra)`, without mutating the running
    /// context. See [`Self::md5_with_extra`].
    pub fn sha1_with_extra(&self, extra: &[u8]) -> Sha1Digest {
        let mut ctx = self.sha1.clone().unwrap_or_else(Sha1::new);
        ctx.update(extra);
        ctx.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitted_update_matches_manual_header_concat() {
        let body = b"client-hello-body-bytes";
        let mut a = TranscriptDigest::new();
        a.update_splitted(1, body);

        let mut manual = encode_handshake_header(1, body.len() as u32).to_vec();
        manual.extend_from_slice(body);
        let mut b = TranscriptDigest::new();
        b.update(&manual);

        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn snapshot_does_not_mutate_running_state() {
        let mut t = TranscriptDigest::new();
        t.update(b"one");
        let first = t.snapshot();
        let second = t.snapshot();
        assert_eq!(first, second);
        t.update(b"two");
        let third = t.snapshot();
        assert_ne!(first, third);
    }

    #[test]
    fn finish_handshake_type_material_matches_table() {
        use HandshakeMessageType::*;
        assert!(!finish_handshake_type_material(HelloRequest));
        assert!(!finish_handshake_type_material(CertificateVerify));
        assert!(finish_handshake_type_material(ClientHello));
        assert!(finish_handshake_type_material(Finished));
    }
}
