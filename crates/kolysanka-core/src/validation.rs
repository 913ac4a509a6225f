//! # Validation Module
//!
//! Input validation for catalog and checkout fields.
//!
//! Validation runs at the service boundary, before any write reaches the
//! store. The UI layer may duplicate checks for immediate feedback, but
//! these rules are authoritative.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{COLORS, SIZES};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Catalog Fields
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product price.
///
/// ## Rules
/// - Must be positive; a free product is a data-entry mistake here
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a product's offered sizes.
///
/// ## Rules
/// - At least one size
/// - Every size is a member of the [`SIZES`] vocabulary
pub fn validate_sizes(sizes: &[String]) -> ValidationResult<()> {
    if sizes.is_empty() {
        return Err(ValidationError::Required {
            field: "sizes".to_string(),
        });
    }

    for size in sizes {
        if !SIZES.contains(&size.as_str()) {
            return Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                value: size.clone(),
            });
        }
    }

    Ok(())
}

/// Validates a product's offered colors.
///
/// ## Rules
/// - At least one color
/// - Every color is a member of the [`COLORS`] vocabulary
pub fn validate_colors(colors: &[String]) -> ValidationResult<()> {
    if colors.is_empty() {
        return Err(ValidationError::Required {
            field: "colors".to_string(),
        });
    }

    for color in colors {
        if !COLORS.contains(&color.as_str()) {
            return Err(ValidationError::NotAllowed {
                field: "color".to_string(),
                value: color.clone(),
            });
        }
    }

    Ok(())
}

/// Validates a stock quantity.
///
/// ## Rules
/// - Must be non-negative; zero is a valid out-of-stock count
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Cart Fields
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
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

// =============================================================================
// Checkout Fields
// =============================================================================

/// Validates the customer name on an order.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    Ok(())
}

/// Validates a contact phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits, spaces, and `+ - ( )` only; formats vary too much between
///   carriers to pin down further
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional contact email when supplied.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() || !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain @".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Admin Fields
// =============================================================================

/// Validates a new admin password (for credential rotation).
///
/// ## Rules
/// - At least 8 characters; the hash layer handles the rest
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < 8 {
        return Err(ValidationError::OutOfRange {
            field: "password".to_string(),
            min: 8,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
