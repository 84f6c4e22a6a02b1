//! Error taxonomy for the connection-state core.
//!
//! The two kinds mirror the distinction the RFC draws: an [`Error::UnexpectedPacket`]
//! is a protocol violation by the peer and should become a fatal TLS alert
//! upstream; an [`Error::InternalError`] is a dispatcher bug -- an operation's
//! documented precondition was not met -- and is always worth a `tracing::warn!`
//! since the core does not recover from it on its own.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An incoming handshake message type, or a ChangeCipherSpec, was not
    /// permitted from the current status.
    #[error("unexpected packet: status={status}, descriptor={descriptor}")]
    UnexpectedPacket {
        /// `Debug` rendering of the status at the time of rejection.
        status: String,
        /// What was rejected (e.g. `"handshake:ServerHello"` or `"change_cipher_spec"`).
        descriptor: String,
    },

    /// A caller invoked an operation whose precondition was not satisfied.
    /// This is always a programming error in the dispatcher, never a
    /// protocol error.
    #[error("internal error at {site}: {precondition}")]
    InternalError {
        /// Name of the operation that detected the violation.
        site: &'static str,
        /// Human-readable description of the unmet precondition.
        precondition: &'static str,
    },

    /// A primitive helper (key-block partition, header encoding, PRF
    /// expansion) was given malformed input.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl Error {
    pub(crate) fn unexpected(status: impl std::fmt::Debug, descriptor: impl Into<String>) -> Self {
        let err = Self::UnexpectedPacket {
            status: format!("{status:?}"),
            descriptor: descriptor.into(),
        };
        tracing::debug!(?err, "rejected packet");
        err
    }

    pub(crate) fn internal(site: &'static str, precondition: &'static str) -> Self {
        let err = Self::InternalError { site, precondition };
        tracing::warn!(?err, "precondition violated");
        err
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
