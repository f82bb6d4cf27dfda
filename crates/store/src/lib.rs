//! `postdesk-store` — collaborator store implementations and the query model.
//!
//! In-memory stores back dev/test wiring; Postgres stores (sqlx) back
//! production. Both implement the seams `postdesk-authz` defines.

pub mod memory;
pub mod postgres;
pub mod query;

pub use memory::{
    InMemoryDirectory, InMemoryMemberships, InMemoryRowStore, InMemorySessionStore,
};
pub use postgres::{PgDirectory, PgMemberships, count_scoped, fetch_scoped};
pub use query::{Predicate, TableQuery, TenantOwned, Value, render_count, render_select};
