//! # Validation Module
//!
//! Input validation utilities for Vitrina.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI arguments (clap)                                         │
//! │  ├── Types and required flags                                          │
//! │  └── Immediate usage errors                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (email shape, subdomain charset, quantities)          │
//! │  └── Runs before any request is built                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── The only authority (stock, permissions, prices)                   │
//! │                                                                         │
//! │  Client checks are advisory: the server still decides                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrina_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("ana@tienda.com").is_ok());
//! assert!(validate_email("foo@bar").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted customer or product name.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted free-text field (address, notes).
pub const MAX_TEXT_LEN: usize = 500;

/// Longest accepted search query.
pub const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a field is present after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a person or product name.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_required(field, name)?;

    if name.trim().chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional free-text field (address, notes).
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates an email address.
///
/// ## Rules
/// Shape `local@domain.tld`:
/// - No whitespace anywhere
/// - Exactly one `@` with a non-empty local part
/// - The domain contains a dot and every dot-separated label is non-empty
///
/// ## Example
/// ```rust
/// use vitrina_core::validation::validate_email;
///
/// assert!(validate_email("cliente@tienda.com.ar").is_ok());
/// assert!(validate_email("foo@bar").is_err());
/// assert!(validate_email("a b@c.com").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(invalid()),
    };

    if local.is_empty() || !domain.contains('.') {
        return Err(invalid());
    }

    if domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a contact phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits plus the usual separators (`+`, `-`, spaces, parentheses)
/// - At least 6 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    validate_required("phone", phone)?;

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if !phone.chars().all(allowed) || digits < 6 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain at least 6 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a tenant subdomain.
///
/// ## Rules
/// - 1 to 63 characters
/// - Lowercase ASCII letters, digits and hyphens
/// - Cannot start or end with a hyphen
///
/// ## Example
/// ```rust
/// use vitrina_core::validation::validate_subdomain;
///
/// assert!(validate_subdomain("mi-tienda").is_ok());
/// assert!(validate_subdomain("-tienda").is_err());
/// assert!(validate_subdomain("Tienda").is_err());
/// ```
pub fn validate_subdomain(subdomain: &str) -> ValidationResult<()> {
    validate_required("subdomain", subdomain)?;

    if subdomain.len() > 63 {
        return Err(ValidationError::TooLong {
            field: "subdomain".to_string(),
            max: 63,
        });
    }

    let valid_chars = subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !valid_chars || subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(ValidationError::InvalidFormat {
            field: "subdomain".to_string(),
            reason: "use lowercase letters, digits and inner hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates and normalizes a search query.
///
/// Returns `None` for a blank query so callers can omit the parameter.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.is_empty() {
        return Ok(None);
    }

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(Some(query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - At least 1. There is no upper bound here; stock caps are advisory
///   and applied by the caller.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@tienda.com").is_ok());
        assert!(validate_email("  ana@tienda.com  ").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());

        assert!(validate_email("foo@bar").is_err());
        assert!(validate_email("foo@@bar.com").is_err());
        assert!(validate_email("foo@bar.com@baz.com").is_err());
        assert!(validate_email("@bar.com").is_err());
        assert!(validate_email("foo@.com").is_err());
        assert!(validate_email("foo@bar.").is_err());
        assert!(validate_email("fo o@bar.com").is_err());

        assert_eq!(
            validate_email(""),
            Err(ValidationError::Required {
                field: "email".to_string()
            })
        );
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+54 11 5555-1234").is_ok());
        assert!(validate_phone("(011) 4444 5555").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Ana").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_subdomain() {
        assert!(validate_subdomain("tienda1").is_ok());
        assert!(validate_subdomain("mi-tienda").is_ok());
        assert!(validate_subdomain("").is_err());
        assert!(validate_subdomain("tienda-").is_err());
        assert!(validate_subdomain("mi_tienda").is_err());
        assert!(validate_subdomain(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ").unwrap(), None);
        assert_eq!(
            validate_search_query(" remera ").unwrap(),
            Some("remera".to_string())
        );
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text("notes", None).is_ok());
        assert!(validate_optional_text("notes", Some("ring twice")).is_ok());
        assert!(validate_optional_text("notes", Some(&"n".repeat(501))).is_err());
    }
}
