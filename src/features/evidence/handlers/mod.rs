mod evidence_handler;

pub use evidence_handler::*;
