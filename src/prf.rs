//! Master secret, key block, and Finished verify_data derivation: the SSL3
//! native construction, the TLS 1.0/1.1 MD5⊕SHA-1 split PRF, and the
//! TLS 1.2 single-hash PRF (RFC 2246 §5, RFC 4346 §5, RFC 5246 §5).

use hmac::{Hmac, Mac as HmacTrait};
use md5::Md5;
use sha1::Sha1;
use sha2::digest::Digest;
use sha2::Sha256;

use crate::hash::TranscriptDigest;
use crate::version::ProtocolVersion;

const MASTER_SECRET_LEN: usize = 48;
const MASTER_SECRET_LABEL: &[u8] = b"master secret";
const KEY_EXPANSION_LABEL: &[u8] = b"key expansion";
const CLIENT_FINISHED_LABEL: &[u8] = b"client finished";
const SERVER_FINISHED_LABEL: &[u8] = b"server finished";
const FINISHED_VERIFY_DATA_LEN: usize = 12;

const SSL3_SENDER_CLIENT: [u8; 4] = [0x43, 0x4c, 0x4e, 0x54]; // "CLNT"
const SSL3_SENDER_SERVER: [u8; 4] = [0x53, 0x52, 0x56, 0x52]; // "SRVR"

/// `P_hash` from RFC 2246 §5: `HMAC(secret, A(1)+seed) || HMAC(secret, A(2)+seed) || ...`
/// truncated to `out_len`.
fn p_hash_md5(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    p_hash::<Md5>(secret, seed, out_len)
}
fn p_hash_sha1(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    p_hash::<Sha1>(secret, seed, out_len)
}
fn p_hash_sha256(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    p_hash::<Sha256>(secret, seed, out_len)
}

fn p_hash<D>(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8>
where
    D: Digest + Clone,
    Hmac<D>: HmacTrait,
{
    let mut out = Vec::with_capacity(out_len + 32);
    let mut a = hmac_raw::<D>(secret, seed);
    while out.len() < out_len {
        let mut input = a.clone();
        input.extend_from_slice(seed);
        out.extend_from_slice(&hmac_raw::<D>(secret, &input));
        a = hmac_raw::<D>(secret, &a);
    }
    out.truncate(out_len);
    out
}

fn hmac_raw<D>(key: &[u8], msg: &[u8]) -> Vec<u8>
where
    D: Digest + Clone,
    Hmac<D>: HmacTrait,
{
    // `new_from_slice` only fails for a zero-length key on some MAC impls;
    // TLS secrets are never empty, so this is an internal invariant, not a
    // caller-facing error.
    #[allow(clippy::expect_used)]
    let mut mac = <Hmac<D> as HmacTrait>::new_from_slice(key).expect("non-empty HMAC key");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

/// The TLS 1.0/1.1 PRF: split the secret in half (overlapping the middle
/// byte if the length is odd), XOR the MD5 and SHA-1 `P_hash` outputs.
pub fn tls10_prf(secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let half = secret.len().div_ceil(2);
    let s1 = &secret[..half];
    let s2 = &secret[secret.len() - half..];

    let mut labeled_seed = Vec::with_capacity(label.len() + seed.len());
    labeled_seed.extend_from_slice(label);
    labeled_seed.extend_from_slice(seed);

    let a = p_hash_md5(s1, &labeled_seed, out_len);
    let b = p_hash_sha1(s2, &labeled_seed, out_len);
    a.into_iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// The TLS 1.2 PRF: `P_SHA256(secret, label + seed)` truncated to `out_len`.
pub fn tls12_prf(secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut labeled_seed = Vec::with_capacity(label.len() + seed.len());
    labeled_seed.extend_from_slice(label);
    labeled_seed.extend_from_slice(seed);
    p_hash_sha256(secret, &labeled_seed, out_len)
}

/// The SSLv3 key-material expansion (RFC 6101 §6.2.2 and §5.6.8): iterate
/// `MD5(secret || SHA1(letters(i) || secret || seed))` for increasing
/// `letters(i) = "A", "BB", "CCC", ...`, concatenating until `out_len` bytes
/// are available.
fn ssl3_expand(secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_len + 16);
    let mut i: u8 = 1;
    while out.len() < out_len {
        let letters = vec![b'A' + (i - 1); i as usize];
        let mut sha = Sha1::new();
        sha.update(&letters);
        sha.update(secret);
        sha.update(seed);
        let sha_digest = sha.finalize();

        let mut md5 = Md5::new();
        md5.update(secret);
        md5.update(sha_digest);
        out.extend_from_slice(&md5.finalize());
        i += 1;
    }
    out.truncate(out_len);
    out
}

/// Derive the 48-byte master secret for the negotiated `version`.
pub fn master_secret(
    version: ProtocolVersion,
    pre_master: &[u8],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
) -> [u8; MASTER_SECRET_LEN] {
    let mut seed = Vec::with_capacity(64);
    seed.extend_from_slice(client_random);
    seed.extend_from_slice(server_random);

    let bytes = if version.is_ssl3() {
        ssl3_expand(pre_master, &seed, MASTER_SECRET_LEN)
    } else if version.uses_tls12_prf() {
        tls12_prf(pre_master, MASTER_SECRET_LABEL, &seed, MASTER_SECRET_LEN)
    } else {
        tls10_prf(pre_master, MASTER_SECRET_LABEL, &seed, MASTER_SECRET_LEN)
    };
    let mut out = [0u8; MASTER_SECRET_LEN];
    out.copy_from_slice(&bytes);
    out
}

/// Derive the key block of `size` bytes for the negotiated `version`.
pub fn key_block(
    version: ProtocolVersion,
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    master_secret: &[u8; MASTER_SECRET_LEN],
    size: usize,
) -> Vec<u8> {
    if version.is_ssl3() {
        let mut seed = Vec::with_capacity(64);
        seed.extend_from_slice(server_random);
        seed.extend_from_slice(client_random);
        ssl3_expand(master_secret, &seed, size)
    } else {
        let mut seed = Vec::with_capacity(64);
        seed.extend_from_slice(server_random);
        seed.extend_from_slice(client_random);
        if version.uses_tls12_prf() {
            tls12_prf(master_secret, KEY_EXPANSION_LABEL, &seed, size)
        } else {
            tls10_prf(master_secret, KEY_EXPANSION_LABEL, &seed, size)
        }
    }
}

fn ssl3_finished(
    sender: [u8; 4],
    master_secret: &[u8; MASTER_SECRET_LEN],
    transcript: &TranscriptDigest,
) -> Vec<u8> {
    let mut md5_extra = Vec::with_capacity(4 + MASTER_SECRET_LEN + 48);
    md5_extra.extend_from_slice(&sender);
    md5_extra.extend_from_slice(master_secret);
    md5_extra.extend_from_slice(&[0x36u8; 48]);
    let md5_inner = transcript.md5_with_extra(&md5_extra);

    let mut sha1_extra = Vec::with_capacity(4 + MASTER_SECRET_LEN + 40);
    sha1_extra.extend_from_slice(&sender);
    sha1_extra.extend_from_slice(master_secret);
    sha1_extra.extend_from_slice(&[0x36u8; 40]);
    let sha1_inner = transcript.sha1_with_extra(&sha1_extra);

    let mut md5_outer = Md5::new();
    md5_outer.update(master_secret);
    md5_outer.update([0x5cu8; 48]);
    md5_outer.update(md5_inner);
    let md5_hash = md5_outer.finalize();

    let mut sha1_outer = Sha1::new();
    sha1_outer.update(master_secret);
    sha1_outer.update([0x5cu8; 40]);
    sha1_outer.update(sha1_inner);
    let sha_hash = sha1_outer.finalize();

    let mut out = Vec::with_capacity(36);
    out.extend_from_slice(&md5_hash);
    out.extend_from_slice(&sha_hash);
    out
}

fn tls_finished(
    version: ProtocolVersion,
    label: &[u8],
    master_secret: &[u8; MASTER_SECRET_LEN],
    transcript: &TranscriptDigest,
) -> Vec<u8> {
    if version.uses_tls12_prf() {
        let seed = transcript.snapshot_sha256();
        tls12_prf(master_secret, label, &seed, FINISHED_VERIFY_DATA_LEN)
    } else {
        let (md5, sha1) = transcript.snapshot();
        let mut seed = Vec::with_capacity(md5.len() + sha1.len());
        seed.extend_from_slice(&md5);
        seed.extend_from_slice(&sha1);
        tls10_prf(master_secret, label, &seed, FINISHED_VERIFY_DATA_LEN)
    }
}

/// The client's Finished `verify_data`.
pub fn client_finished(
    version: ProtocolVersion,
    master_secret: &[u8; MASTER_SECRET_LEN],
    transcript: &TranscriptDigest,
) -> Vec<u8> {
    if version.is_ssl3() {
        ssl3_finished(SSL3_SENDER_CLIENT, master_secret, transcript)
    } else {
        tls_finished(version, CLIENT_FINISHED_LABEL, master_secret, transcript)
    }
}

/// The server's Finished `verify_data`.
pub fn server_finished(
    version: ProtocolVersion,
    master_secret: &[u8; MASTER_SECRET_LEN],
    transcript: &TranscriptDigest,
) -> Vec<u8> {
    if version.is_ssl3() {
        ssl3_finished(SSL3_SENDER_SERVER, master_secret, transcript)
    } else {
        tls_finished(version, SERVER_FINISHED_LABEL, master_secret, transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls10_prf_is_deterministic() {
        let secret = [1u8; 48];
        let a = tls10_prf(&secret, b"label", b"seed", 32);
        let b = tls10_prf(&secret, b"label", b"seed", 32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn tls12_prf_changes_with_label() {
        let secret = [2u8; 48];
        let a = tls12_prf(&secret, b"master secret", b"seed", 48);
        let b = tls12_prf(&secret, b"key expansion", b"seed", 48);
        assert_ne!(a, b);
    }

    #[test]
    fn master_secret_requires_both_randoms_to_differ_output() {
        let cr1 = [3u8; 32];
        let sr1 = [4u8; 32];
        let sr2 = [5u8; 32];
        let pre = [6u8; 48];
        let a = master_secret(ProtocolVersion::Tls1_2, &pre, &cr1, &sr1);
        let b = master_secret(ProtocolVersion::Tls1_2, &pre, &cr1, &sr2);
        assert_ne!(a, b);
    }

    #[test]
    fn finished_idempotent_without_mutating_transcript() {
        let mut t = TranscriptDigest::new();
        t.update(b"client-hello");
        t.update(b"server-hello");
        let ms = [9u8; 48];
        let a = client_finished(ProtocolVersion::Tls1_2, &ms, &t);
        let b = client_finished(ProtocolVersion::Tls1_2, &ms, &t);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn ssl3_finished_is_36_bytes_and_sender_sensitive() {
        let mut t = TranscriptDigest::new();
        t.update(b"hello");
        let ms = [1u8; 48];
        let c = client_finished(ProtocolVersion::Ssl3, &ms, &t);
        let s = server_finished(ProtocolVersion::Ssl3, &ms, &t);
        assert_eq!(c.len(), 36);
        assert_eq!(s.len(), 36);
        assert_ne!(c, s);
    }
}
