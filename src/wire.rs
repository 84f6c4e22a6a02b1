//! Minimal header encoding, standing in for the wire-codec collaborator that
//! lives outside this crate. Record framing, fragmentation, and parsing are
//! external; these three functions exist only because the transcript feed
//! and the record MAC need to assemble header bytes to hash/authenticate.

use crate::version::ProtocolVersion;

/// TLS record content type (RFC 2246 §6.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
}

impl ContentType {
    const fn wire(self) -> u8 {
        match self {
            Self::ChangeCipherSpec => 20,
            Self::Alert => 21,
            Self::Handshake => 22,
            Self::ApplicationData => 23,
        }
    }
}

/// A record header: content type, negotiated version, and plaintext length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub length: u16,
}

impl RecordHeader {
    /// `type(1) || version(2) || length(2)`, the bytes hashed into the TLS
    /// 1.0+ record MAC.
    pub fn encode(&self) -> [u8; 5] {
        let (major, minor) = self.version.wire();
        let len = self.length.to_be_bytes();
        [self.content_type.wire(), major, minor, len[0], len[1]]
    }

    /// `type(1) || length(2)`, the bytes hashed into the SSLv3 record MAC
    /// (SSLv3 predates the `version` field being bound into the MAC input).
    pub fn encode_no_version(&self) -> [u8; 3] {
        let len = self.length.to_be_bytes();
        [self.content_type.wire(), len[0], len[1]]
    }
}

/// Big-endian encoding of a `u64`, used to embed the record sequence number
/// into the MAC input.
pub fn encode_word64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// `type(1) || length(3, big-endian)`, the 4-byte handshake message header
/// that precedes every handshake message body in the transcript and on the
/// wire.
pub fn encode_handshake_header(ty: u8, length: u32) -> [u8; 4] {
    let len = length.to_be_bytes();
    // `length` is a 24-bit field; the top byte of the u32 encoding must be
    // zero for any length this crate is asked to encode.
    debug_assert_eq!(len[0], 0, "handshake body too long to fit a 24-bit length");
    [ty, len[1], len[2], len[3]]
}
