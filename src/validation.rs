// Validation utilities module
// Provides custom validation functions for domain-specific rules

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Maximum number of reference photos a customer can attach to one order
pub const MAX_REFERENCE_IMAGES: usize = 10;

fn phone_pattern() -> Option<&'static Regex> {
    static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
    PHONE
        .get_or_init(|| {
            // Digits with an optional leading '+', spaces and dashes allowed
            Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").ok()
        })
        .as_ref()
}

/// Validates that a string contains something other than whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Validates a coupon code: non-blank, no inner whitespace, at most 40 characters
pub fn validate_coupon_code(code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(ValidationError::new("coupon_code_blank"));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("coupon_code_whitespace"));
    }
    if code.chars().count() > 40 {
        return Err(ValidationError::new("coupon_code_too_long"));
    }
    Ok(())
}

/// Validates a customer phone number (7-20 characters)
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    match phone_pattern() {
        Some(pattern) if pattern.is_match(phone.trim()) => Ok(()),
        _ => Err(ValidationError::new("invalid_phone")),
    }
}

/// Validates reference image URLs: at most `MAX_REFERENCE_IMAGES`, each http(s)
pub fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > MAX_REFERENCE_IMAGES {
        return Err(ValidationError::new("too_many_reference_images"));
    }
    let all_http = urls.iter().all(|url| {
        let url = url.trim();
        let has_scheme = url.starts_with("https://") || url.starts_with("http://");
        has_scheme && !url.contains(char::is_whitespace)
    });
    if all_http {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_image_url"))
    }
}

/// Canonical form used to match a customer's orders by phone number
///
/// Drops spaces and dashes so "+1 555-0100" and "+15550100" are the same customer.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}
