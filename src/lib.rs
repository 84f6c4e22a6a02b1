//! Connection-state core for a TLS 1.0/1.1/1.2 endpoint.
//!
//! This crate owns the state that both the send path and the receive path
//! of a TLS connection must agree on: the handshake status machine, the
//! negotiated cryptographic parameters, the key schedule derived from the
//! negotiated secrets, the running handshake transcript digests, and the
//! per-direction record sequence/MAC state.
//!
//! It does not parse records off the wire, does not implement bulk
//! symmetric ciphers, does not validate certificate chains, and does not
//! speak TLS 1.3 or DTLS. A record dispatcher built on top of this crate
//! owns those concerns and drives [`ConnectionState`] through its methods.
#![forbid(unsafe_code)]

pub mod cipher_suite;
pub mod connection;
pub mod direction;
pub mod error;
pub mod handshake_state;
pub mod hash;
pub mod mac;
pub mod prf;
pub mod prng;
pub mod role;
pub mod status;
pub mod version;
pub mod wire;

pub use cipher_suite::CipherSuite;
pub use connection::ConnectionState;
pub use direction::{CryptState, Direction, DirectionState, MacState};
pub use error::{Error, Result};
pub use handshake_state::{HandshakeSecrets, HandshakeState};
pub use prng::RandomSource;
pub use role::Role;
pub use status::{HandshakeMessageType, HandshakeStep, Status};
pub use version::ProtocolVersion;
