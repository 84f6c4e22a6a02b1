//! Property-based tests for this crate's algebraic laws: key-block
//! partition round-trip, transcript-update-splitted equivalence, and the
//! monotone-sequence invariant.

use proptest::prelude::*;
use tls_state_core::cipher_suite::{CipherSuite, MacHash, TLS_RSA_WITH_AES_128_CBC_SHA};
use tls_state_core::hash::TranscriptDigest;
use tls_state_core::status::HandshakeMessageType;
use tls_state_core::wire::{encode_handshake_header, ContentType, RecordHeader};
use tls_state_core::{ConnectionState, Direction, ProtocolVersion, Role};

proptest! {
    #[test]
    fn key_block_partition_round_trips(
        client_random in any::<[u8; 32]>(),
        server_random in any::<[u8; 32]>(),
        pre_master in prop::collection::vec(any::<u8>(), 48..=48),
    ) {
        let suite = TLS_RSA_WITH_AES_128_CBC_SHA;
        let mut conn = ConnectionState::new_with_seed(Role::Client, ProtocolVersion::Tls1_2, [0u8; 32]);
        conn.start_handshake_client(ProtocolVersion::Tls1_2, client_random).unwrap();
        conn.set_server_random(server_random).unwrap();
        conn.set_cipher(suite);
        conn.set_master_secret(&pre_master).unwrap();
        conn.set_key_block().unwrap();

        let tx = conn.direction(Direction::Tx).crypt().unwrap();
        let rx = conn.direction(Direction::Rx).crypt().unwrap();

        let total = tx.mac_secret.len() + rx.mac_secret.len()
            + tx.key.len() + rx.key.len()
            + tx.iv.len() + rx.iv.len();
        prop_assert_eq!(total, suite.key_block_size());

        prop_assert_eq!(tx.mac_secret.len(), suite.digest_size());
        prop_assert_eq!(rx.mac_secret.len(), suite.digest_size());
        prop_assert_eq!(tx.key.len(), suite.key_size);
        prop_assert_eq!(rx.key.len(), suite.key_size);
        prop_assert_eq!(tx.iv.len(), suite.iv_size);
        prop_assert_eq!(rx.iv.len(), suite.iv_size);
    }

    #[test]
    fn transcript_splitted_matches_manual_concat(
        ty in 0u8..=10,
        body in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut a = TranscriptDigest::new();
        a.update_splitted(ty, &body);

        let mut manual = encode_handshake_header(ty, body.len() as u32).to_vec();
        manual.extend_from_slice(&body);
        let mut b = TranscriptDigest::new();
        b.update(&manual);

        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn sequence_is_monotone_across_n_calls(n in 1u64..20) {
        let suite = CipherSuite {
            name: "test-suite",
            key_size: 16,
            iv_size: 16,
            mac_hash: MacHash::Sha1,
        };
        let mut conn = ConnectionState::new_with_seed(Role::Client, ProtocolVersion::Tls1_2, [1u8; 32]);
        conn.start_handshake_client(ProtocolVersion::Tls1_2, [2u8; 32]).unwrap();
        conn.set_server_random([3u8; 32]).unwrap();
        conn.set_cipher(suite);
        conn.set_master_secret(&[4u8; 48]).unwrap();
        conn.set_key_block().unwrap();

        let header = RecordHeader {
            content_type: ContentType::ApplicationData,
            version: ProtocolVersion::Tls1_2,
            length: 3,
        };

        for expected in 0..n {
            prop_assert_eq!(conn.direction(Direction::Tx).mac().sequence(), expected);
            conn.make_digest(Direction::Tx, &header, b"abc").unwrap();
        }
    }
}

#[test]
fn hello_request_disallowed_from_init() {
    let mut conn = ConnectionState::new(Role::Client, ProtocolVersion::Tls1_2);
    assert!(conn
        .update_status_hs(HandshakeMessageType::HelloRequest)
        .is_err());
}
