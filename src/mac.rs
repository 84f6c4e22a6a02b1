//! Record MAC constructions: HMAC (RFC 2104) for TLS 1.0+, and the SSLv3
//! MAC (RFC 6101 §5.2.3.1) for SSL3. Both are keyed by a
//! [`crate::cipher_suite::MacHash`] chosen by the negotiated cipher suite.

use hmac::{Hmac, Mac as HmacTrait};
use md5::Md5;
use sha1::Sha1;
use sha2::digest::Digest;
use sha2::Sha256;

use crate::cipher_suite::MacHash;
use crate::error::{Error, Result};

/// HMAC(hash, key, msg), dispatched on the MAC hash bound to the cipher
/// suite. All three TLS hash choices use a 64-byte HMAC block size.
pub fn hmac(hash: MacHash, key: &[u8], msg: &[u8]) -> Result<Vec<u8>> {
    match hash {
        MacHash::Md5 => {
            let mut mac = Hmac::<Md5>::new_from_slice(key)
                .map_err(|_| Error::protocol("hmac key length"))?;
            mac.update(msg);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        MacHash::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key)
                .map_err(|_| Error::protocol("hmac key length"))?;
            mac.update(msg);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        MacHash::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|_| Error::protocol("hmac key length"))?;
            mac.update(msg);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// The SSLv3-specific MAC construction:
/// `hash(secret || pad2 || hash(secret || pad1 || msg))`.
pub fn ssl_mac(hash: MacHash, secret: &[u8], msg: &[u8]) -> Vec<u8> {
    let pad_len = match hash {
        MacHash::Md5 => 48,
        MacHash::Sha1 | MacHash::Sha256 => 40,
    };
    let pad1 = vec![0x36u8; pad_len];
    let pad2 = vec![0x5cu8; pad_len];

    match hash {
        MacHash::Md5 => ssl_mac_with::<Md5>(secret, &pad1, &pad2, msg),
        MacHash::Sha1 => ssl_mac_with::<Sha1>(secret, &pad1, &pad2, msg),
        MacHash::Sha256 => ssl_mac_with::<Sha256>(secret, &pad1, &pad2, msg),
    }
}

fn ssl_mac_with<D: Digest>(secret: &[u8], pad1: &[u8], pad2: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut inner = D::new();
    inner.update(secret);
    inner.update(pad1);
    inner.update(msg);
    let inner_digest = inner.finalize();

    let mut outer = D::new();
    outer.update(secret);
    outer.update(pad2);
    outer.update(&inner_digest);
    outer.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hmac_sha1_matches_rfc_2202_test_case_1() {
        let key = [0x0bu8; 20];
        let data = b"Hi There";
        let expected = hex!("b617318655057264e28bc0b6fb378c8ef146be00");
        let mac = hmac(MacHash::Sha1, &key, data).unwrap();
        assert_eq!(mac, expected.to_vec());
    }

    #[test]
    fn hmac_sha1_is_deterministic_and_key_sensitive() {
        let a = hmac(MacHash::Sha1, b"key-one", b"msg").unwrap();
        let b = hmac(MacHash::Sha1, b"key-one", b"msg").unwrap();
        let c = hmac(MacHash::Sha1, b"key-two", b"msg").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn ssl_mac_is_deterministic_and_msg_sensitive() {
        let a = ssl_mac(MacHash::Md5, b"secret", b"one");
        let b = ssl_mac(MacHash::Md5, b"secret", b"one");
        let c = ssl_mac(MacHash::Md5, b"secret", b"two");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }
}
