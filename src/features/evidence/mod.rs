//! Evidence attachments.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/incidents/{id}/evidence` | Upload up to 5 media files (reporter only) |
//! | GET | `/api/incidents/{id}/evidence` | List evidence for a visible incident |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::EvidenceService;
