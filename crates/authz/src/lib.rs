//! `postdesk-authz` — role resolution and tenant query scoping.
//!
//! This crate decides, for every authenticated request, which client-owned
//! records the caller may see or mutate. It is intentionally decoupled from
//! HTTP and storage: collaborators plug in behind the [`SessionAccessor`],
//! [`PrincipalDirectory`] and [`MembershipStore`] traits, and route handlers
//! consume the [`AuthorizationGate`].

pub mod access;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod role;
pub mod scope;
pub mod session;
pub mod store;

pub use access::{AccessSet, TenantAccessResolver};
pub use error::AuthzError;
pub use gate::{AuthenticatedPrincipal, AuthorizationGate};
pub use resolver::RoleResolver;
pub use role::{Role, RoleClass, RoleConfig};
pub use scope::{ScopedQuery, TenantFilter, TenantPredicate, scope_access};
pub use session::{Session, SessionAccessor, SessionToken};
pub use store::{MembershipStore, PrincipalDirectory, StoreError};
