//! Credential and identity store.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/auth/profile` | Current user's profile |
//! | PUT | `/api/auth/profile` | Update name, address, phone |
//! | PUT | `/api/auth/change-password` | Verify current password and set a new one |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod routes;
pub mod services;
