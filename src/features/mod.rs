pub mod auth;
pub mod evidence;
pub mod incidents;
pub mod users;
