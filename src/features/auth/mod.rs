//! Authentication and access control.
//!
//! Login issues HS256 access tokens; `AccessGuard` resolves the caller on
//! every protected request; `policy` decides incident permissions.

pub mod access;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod policy;
pub mod routes;
pub mod services;

pub use access::AccessGuard;
