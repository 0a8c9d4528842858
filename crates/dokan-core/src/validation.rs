//! # Validation Module
//!
//! Input validation utilities for Dokan checkout.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront form (TypeScript)                                  │
//! │  ├── Required fields, phone/email patterns                              │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler + OrderAssembler (Rust)                          │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: the same rules again, server-side                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── UNIQUE constraints (order_number, discount code)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dokan_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("rahim@example.com").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{CustomerDetails, NewDiscountCode};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_POISHA};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length bounds for a discount code.
pub const DISCOUNT_CODE_MIN_LEN: usize = 3;
pub const DISCOUNT_CODE_MAX_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Only digits, `+`, `-`, spaces and parentheses
///
/// ## Example
/// ```rust
/// use dokan_core::validation::validate_phone;
///
/// assert!(validate_phone("+880 1711-000000").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    require("phone", phone)?;

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
    if !phone.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may only contain digits, spaces, +, -, ( and )".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// ```text
/// <local>@<domain>.<tld>
///   local, domain, tld: at least one character, no whitespace, no '@'
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    require("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // Some dot with at least one character on each side
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !dotted {
        return Err(invalid());
    }

    Ok(())
}

/// Validates the checkout form's customer fields.
///
/// ## Rules
/// - name, district, thana, full address: required
/// - phone: required, phone pattern
/// - email: required, email pattern
/// - alternative phone: phone pattern when present and non-blank
pub fn validate_customer(customer: &CustomerDetails) -> ValidationResult<()> {
    require("name", &customer.name)?;
    validate_phone(&customer.phone)?;
    if let Some(alt) = customer.alternative_phone.as_deref() {
        if !alt.trim().is_empty() {
            validate_phone(alt).map_err(|_| ValidationError::InvalidFormat {
                field: "alternativePhone".to_string(),
                reason: "may only contain digits, spaces, +, -, ( and )".to_string(),
            })?;
        }
    }
    validate_email(&customer.email)?;
    require("district", &customer.district)?;
    require("thana", &customer.thana)?;
    require("fullAddress", &customer.full_address)?;
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Customer picks quantity: 5                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"      │
/// │       │                                                                 │
/// │       └── OK → Proceed with add to cart                                 │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in poisha: `0..=MAX_PRICE_POISHA`.
pub fn validate_price_poisha(poisha: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_POISHA).contains(&poisha) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_POISHA,
        });
    }

    Ok(())
}

// =============================================================================
// Discount Definition
// =============================================================================

/// Validates a discount code before it is created.
///
/// ## Rules
/// - code: 3 to 20 characters, no whitespace
/// - name: required
/// - percentage_off: 1 to 100
/// - max_usage_count: at least 1
/// - start_date must not be after end_date
pub fn validate_discount_definition(new: &NewDiscountCode) -> ValidationResult<()> {
    let code_len = new.code.chars().count();
    if code_len < DISCOUNT_CODE_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "code".to_string(),
            min: DISCOUNT_CODE_MIN_LEN,
        });
    }
    if code_len > DISCOUNT_CODE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: DISCOUNT_CODE_MAX_LEN,
        });
    }
    if new.code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    require("name", &new.name)?;

    if !(1..=100).contains(&new.percentage_off) {
        return Err(ValidationError::OutOfRange {
            field: "percentageOff".to_string(),
            min: 1,
            max: 100,
        });
    }

    if new.max_usage_count < 1 {
        return Err(ValidationError::MustBePositive {
            field: "maxUsageCount".to_string(),
        });
    }

    if new.start_date > new.end_date {
        return Err(ValidationError::InvalidFormat {
            field: "endDate".to_string(),
            reason: "must not be before startDate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
