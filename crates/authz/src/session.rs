//! Session boundary types.
//!
//! Credential issuance and verification live outside this crate; all the
//! authorization core consumes is "who is calling and what role does their
//! credential claim".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use postdesk_core::PrincipalId;

use crate::Role;

/// Opaque bearer credential presented by a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An established session: principal identity plus the role claim the
/// credential carries.
///
/// The claimed role may be stale relative to the principal store; it is a
/// fallback value, never an authority (see [`crate::RoleResolver`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub principal_id: PrincipalId,
    pub claimed_role: Role,
}

/// Session lookup boundary.
#[async_trait]
pub trait SessionAccessor: Send + Sync {
    /// Resolve the live session for a token.
    ///
    /// `None` means "no session" — including when the session store cannot
    /// be read; the gate treats both as unauthenticated.
    async fn current_session(&self, token: &SessionToken) -> Option<Session>;
}
