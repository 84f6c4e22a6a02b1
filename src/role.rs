//! Client/server role. Deliberately has no [`Default`] impl -- callers of
//! [`crate::ConnectionState::new`] must name the role explicitly rather than
//! fall back to an implicit side (see DESIGN.md).

/// Which side of the handshake this connection plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }
}
