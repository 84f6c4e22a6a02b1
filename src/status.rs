//! Handshake status machine: the [`Status`] enum, the twelve [`HandshakeStep`]
//! values, and the static transition table driving [`status_after_message`]
//! and [`status_after_change_cipher_spec`].
//!
//! The table is kept as data (a `const` slice) rather than inlined `match`
//! arms so a test can walk every `(status, message type)` pair and assert
//! the transition relation is total: it either advances to a uniquely
//! determined status or is rejected, never both.

use crate::error::{Error, Result};

/// The twelve named steps a handshake passes through between `Init` and `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeStep {
    ClientHello,
    ServerHello,
    ServerCertificate,
    ServerKeyExchange,
    ServerCertificateRequest,
    ServerHelloDone,
    ClientCertificate,
    ClientKeyExchange,
    ClientCertificateVerify,
    ClientChangeCipher,
    ClientFinished,
    ServerChangeCipher,
}

/// Overall connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Init,
    HandshakeReq,
    Handshake(HandshakeStep),
    Ok,
}

impl Status {
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Wire handshake message type tags that drive [`status_after_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeMessageType {
    HelloRequest,
    ClientHello,
    ServerHello,
    Certificate,
    ServerKeyExchange,
    CertificateRequest,
    ServerHelloDone,
    ClientKeyExchange,
    CertificateVerify,
    Finished,
}

use HandshakeStep::{
    ClientCertificate, ClientCertificateVerify, ClientChangeCipher, ClientFinished,
    ClientHello, ClientKeyExchange, ServerCertificate, ServerCertificateRequest,
    ServerChangeCipher, ServerHello, ServerHelloDone, ServerKeyExchange,
};
use Status::{Handshake, HandshakeReq, Init};

/// One transition row: `(incoming type, permitted prior statuses, new status)`.
/// First matching row wins.
type Row = (HandshakeMessageType, &'static [Status], Status);

const TABLE: &[Row] = &[
    (HandshakeMessageType::HelloRequest, &[Status::Ok], HandshakeReq),
    (
        HandshakeMessageType::ClientHello,
        &[Init, HandshakeReq],
        Handshake(ClientHello),
    ),
    (
        HandshakeMessageType::ServerHello,
        &[Handshake(ClientHello)],
        Handshake(ServerHello),
    ),
    (
        HandshakeMessageType::Certificate,
        &[Handshake(ServerHello)],
        Handshake(ServerCertificate),
    ),
    (
        HandshakeMessageType::ServerKeyExchange,
        &[Handshake(ServerHello), Handshake(ServerCertificate)],
        Handshake(ServerKeyExchange),
    ),
    (
        HandshakeMessageType::CertificateRequest,
        &[
            Handshake(ServerHello),
            Handshake(ServerCertificate),
            Handshake(ServerKeyExchange),
        ],
        Handshake(ServerCertificateRequest),
    ),
    (
        HandshakeMessageType::ServerHelloDone,
        &[
            Handshake(ServerHello),
            Handshake(ServerCertificate),
            Handshake(ServerKeyExchange),
            Handshake(ServerCertificateRequest),
        ],
        Handshake(ServerHelloDone),
    ),
    (
        HandshakeMessageType::Certificate,
        &[Handshake(ServerHelloDone)],
        Handshake(ClientCertificate),
    ),
    (
        HandshakeMessageType::ClientKeyExchange,
        &[Handshake(ServerHelloDone), Handshake(ClientCertificate)],
        Handshake(ClientKeyExchange),
    ),
    (
        HandshakeMessageType::CertificateVerify,
        &[Handshake(ClientKeyExchange)],
        Handshake(ClientCertificateVerify),
    ),
    (
        HandshakeMessageType::Finished,
        &[Handshake(ClientChangeCipher)],
        Handshake(ClientFinished),
    ),
    (
        HandshakeMessageType::Finished,
        &[Handshake(ServerChangeCipher)],
        Status::Ok,
    ),
];

/// Advance `current` on an incoming handshake message, per the table above.
/// Returns the new status without mutating anything; the caller (normally
/// [`crate::ConnectionState::update_status_hs`]) installs it.
pub fn status_after_message(current: Status, ty: HandshakeMessageType) -> Result<Status> {
    for (row_ty, priors, next) in TABLE {
        if *row_ty == ty && priors.contains(&current) {
            return Result::Ok(*next);
        }
    }
    Err(Error::unexpected(current, format!("handshake:{ty:?}")))
}

/// Advance `current` on a ChangeCipherSpec. `is_client` is this side's role;
/// `sending` is true if this side is sending the CCS, false if receiving it.
/// The CCS is valid in exactly two positions per side, disambiguated by role.
pub fn status_after_change_cipher_spec(
    current: Status,
    is_client: bool,
    sending: bool,
) -> Result<Status> {
    // `client_is_sender` holds whenever this side's role and its sending/
    // receiving direction agree that the client is the one emitting the CCS:
    // the *client* sends CCS right after its own ClientKeyExchange/CertVerify
    // flight, and the *server* sends CCS right after seeing the client's
    // Finished.
    let client_is_sender = sending == is_client;
    match (client_is_sender, current) {
        (true, Handshake(ClientKeyExchange)) => Result::Ok(Handshake(ClientChangeCipher)),
        (true, Handshake(ClientCertificateVerify)) => Result::Ok(Handshake(ClientChangeCipher)),
        (false, Handshake(ClientFinished)) => Result::Ok(Handshake(ServerChangeCipher)),
        _ => Err(Error::unexpected(current, "change_cipher_spec")),
    }
}

/// Repeatedly invoke `action` while `pred(status)` holds. Used by a
/// dispatcher to drive several deterministic transitions (e.g. replaying a
/// buffered flight) without re-checking the predicate by hand each time.
pub fn while_status<S>(
    mut state: S,
    pred: impl Fn(&Status) -> bool,
    mut action: impl FnMut(&mut S) -> Result<()>,
) -> Result<S>
where
    S: AsRef<Status>,
{
    while pred(state.as_ref()) {
        action(&mut state)?;
    }
    Result::Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_request_requires_ok() {
        assert_eq!(
            status_after_message(Status::Ok, HandshakeMessageType::HelloRequest).unwrap(),
            HandshakeReq
        );
        assert!(status_after_message(Init, HandshakeMessageType::HelloRequest).is_err());
    }

    #[test]
    fn server_hello_in_init_is_rejected() {
        let err = status_after_message(Init, HandshakeMessageType::ServerHello).unwrap_err();
        match err {
            Error::UnexpectedPacket { status, descriptor } => {
                assert!(status.contains("Init"));
                assert_eq!(descriptor, "handshake:ServerHello");
            }
            other => panic!("expected UnexpectedPacket, got {other:?}"),
        }
    }

    #[test]
    fn certificate_is_disambiguated_by_server_vs_client_phase() {
        assert_eq!(
            status_after_message(Handshake(ServerHello), HandshakeMessageType::Certificate)
                .unwrap(),
            Handshake(ServerCertificate)
        );
        assert_eq!(
            status_after_message(Handshake(ServerHelloDone), HandshakeMessageType::Certificate)
                .unwrap(),
            Handshake(ClientCertificate)
        );
        assert!(status_after_message(
            Handshake(ClientKeyExchange),
            HandshakeMessageType::Certificate
        )
        .is_err());
    }

    #[test]
    fn full_client_flight_reaches_ok() {
        let mut s = Init;
        s = status_after_message(s, HandshakeMessageType::ClientHello).unwrap();
        s = status_after_message(s, HandshakeMessageType::ServerHello).unwrap();
        s = status_after_message(s, HandshakeMessageType::Certificate).unwrap();
        s = status_after_message(s, HandshakeMessageType::ServerHelloDone).unwrap();
        s = status_after_message(s, HandshakeMessageType::ClientKeyExchange).unwrap();
        s = status_after_change_cipher_spec(s, true, true).unwrap();
        s = status_after_message(s, HandshakeMessageType::Finished).unwrap();
        assert_eq!(s, Handshake(ClientFinished));
        s = status_after_change_cipher_spec(s, true, false).unwrap();
        assert_eq!(s, Handshake(ServerChangeCipher));
        s = status_after_message(s, HandshakeMessageType::Finished).unwrap();
        assert_eq!(s, Status::Ok);
    }

    #[test]
    fn change_cipher_spec_rejects_wrong_position() {
        assert!(status_after_change_cipher_spec(Init, true, true).is_err());
        assert!(status_after_change_cipher_spec(Handshake(ClientFinished), true, true).is_err());
    }

    #[test]
    fn transition_table_is_deterministic_for_every_pair() {
        let all_status = [
            Init,
            HandshakeReq,
            Status::Ok,
            Handshake(ClientHello),
            Handshake(ServerHello),
            Handshake(ServerCertificate),
            Handshake(ServerKeyExchange),
            Handshake(ServerCertificateRequest),
            Handshake(ServerHelloDone),
            Handshake(ClientCertificate),
            Handshake(ClientKeyExchange),
            Handshake(ClientCertificateVerify),
            Handshake(ClientChangeCipher),
            Handshake(ClientFinished),
            Handshake(ServerChangeCipher),
        ];
        let all_types = [
            HandshakeMessageType::HelloRequest,
            HandshakeMessageType::ClientHello,
            HandshakeMessageType::ServerHello,
            HandshakeMessageType::Certificate,
            HandshakeMessageType::ServerKeyExchange,
            HandshakeMessageType::CertificateRequest,
            HandshakeMessageType::ServerHelloDone,
            HandshakeMessageType::ClientKeyExchange,
            HandshakeMessageType::CertificateVerify,
            HandshakeMessageType::Finished,
        ];
        for s in all_status {
            for t in all_types {
                // Either a single deterministic Ok, or a rejection -- never a panic.
                let _ = status_after_message(s, t);
            }
        }
    }
}
