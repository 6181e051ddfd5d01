mod evidence_dto;

pub use evidence_dto::{
    check_file_count, check_file_name, check_file_size, check_mime_type, extension_for_mime,
    validate_batch, EvidenceResponseDto, EvidenceSummaryDto, UploadEvidenceDto,
};
