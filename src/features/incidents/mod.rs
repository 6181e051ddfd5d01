//! Incident record manager.
//!
//! Citizens file incidents and follow their own; operators and admins list,
//! filter, transition and aggregate every incident.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod repository;
pub mod routes;
pub mod services;

pub use services::IncidentService;
