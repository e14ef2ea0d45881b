//! `haulnet-auth`: pure authentication/authorization boundary.
//!
//! Credential *issuance* lives elsewhere. This crate turns a bearer token into a
//! verified `{actor, role}` fact and decides which actor may run which operation.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, JobParties, Operation, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::Principal;
pub use roles::Role;
