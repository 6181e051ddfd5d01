use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// National identity number: 7 or 8 digits, no separators
    /// - Valid: "1234567", "12345678"
    /// - Invalid: "123456", "123456789", "12.345.678"
    pub static ref DNI_REGEX: Regex = Regex::new(r"^\d{7,8}$").unwrap();

    /// Phone number: exactly 10 digits
    /// - Valid: "1123456789"
    /// - Invalid: "11-2345-6789", "+541123456789", "112345678"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10}$").unwrap();
}

/// Rejects strings that are empty or whitespace only
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
