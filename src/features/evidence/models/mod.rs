mod evidence;

pub use evidence::{Evidence, EvidenceKind, NewEvidence, UploadedFile};
