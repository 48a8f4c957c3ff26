//! # Validation Module
//!
//! Form input validation run by the stores before a create or update
//! request is sent.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client side)                                    │
//! │  ├── Required fields, lengths, number ranges, email shape              │
//! │  └── Failure → ApiResult::failure without a network call               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend (authoritative)                                      │
//! │  ├── Uniqueness, referential checks                                    │
//! │  └── Failure → {detail: [{loc, msg}]} → normalized message             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use emporium_core::validation::Validate;
//! use emporium_core::NewCategory;
//!
//! let form = NewCategory { category_name: "  ".into(), ..Default::default() };
//! assert!(form.validate().is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{
    CategoryUpdate, CustomerUpdate, NewCategory, NewCustomer, NewPermission, NewProduct,
    NewSubcategory, PermissionUpdate, ProductUpdate, RoleAssignment, SubcategoryUpdate,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest display name accepted for categories, products, permissions.
pub const MAX_NAME_LEN: usize = 200;

/// Longest SKU accepted.
pub const MAX_SKU_LEN: usize = 50;

/// A request payload that can be checked before it is sent.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required display name.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens, underscores only
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a price: finite and not negative. Zero is allowed.
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "stock_quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates an email address shape (`local@domain.tld`).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.contains(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a page size requested from a server-driven list.
pub fn validate_page_size(limit: u32) -> ValidationResult<()> {
    if limit == 0 || limit > crate::MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: crate::MAX_PAGE_SIZE as i64,
        });
    }
    Ok(())
}

fn validate_opt<T: ?Sized>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> ValidationResult<()>,
) -> ValidationResult<()> {
    match value {
        Some(v) => check(v),
        None => Ok(()),
    }
}

// =============================================================================
// Payload Validation
// =============================================================================

impl Validate for NewCategory {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("category_name", &self.category_name)
    }
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> ValidationResult<()> {
        validate_opt(self.category_name.as_deref(), |n| {
            validate_name("category_name", n)
        })
    }
}

impl Validate for NewSubcategory {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("subcategory_name", &self.subcategory_name)
    }
}

impl Validate for SubcategoryUpdate {
    fn validate(&self) -> ValidationResult<()> {
        validate_opt(self.subcategory_name.as_deref(), |n| {
            validate_name("subcategory_name", n)
        })
    }
}

impl Validate for NewProduct {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_opt(self.sku.as_deref(), validate_sku)?;
        validate_price(self.price)?;
        validate_stock(self.stock_quantity)
    }
}

impl Validate for ProductUpdate {
    fn validate(&self) -> ValidationResult<()> {
        validate_opt(self.name.as_deref(), |n| validate_name("name", n))?;
        validate_opt(self.sku.as_deref(), validate_sku)?;
        validate_opt(self.price.as_ref(), |p| validate_price(*p))?;
        validate_opt(self.stock_quantity.as_ref(), |q| validate_stock(*q))
    }
}

impl Validate for NewCustomer {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("first_name", &self.first_name)?;
        validate_email(&self.email)
    }
}

impl Validate for CustomerUpdate {
    fn validate(&self) -> ValidationResult<()> {
        validate_opt(self.first_name.as_deref(), |n| validate_name("first_name", n))?;
        validate_opt(self.email.as_deref(), validate_email)
    }
}

impl Validate for NewPermission {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("permission_name", &self.permission_name)
    }
}

impl Validate for PermissionUpdate {
    fn validate(&self) -> ValidationResult<()> {
        validate_opt(self.permission_name.as_deref(), |n| {
            validate_name("permission_name", n)
        })
    }
}

impl Validate for RoleAssignment {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("role", &self.role)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("category_name", "Electronics").is_ok());
        assert_eq!(
            validate_name("category_name", "   "),
            Err(ValidationError::Required {
                field: "category_name".to_string()
            })
        );
        assert!(validate_name("name", &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("LAMP-01").is_ok());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(19.99).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@shop.test").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana.shop.test").is_err());
        assert!(validate_email("ana@shop").is_err());
        assert!(validate_email("ana @shop.test").is_err());
        assert!(validate_email("a@b@c.test").is_err());
    }

    #[test]
    fn test_product_payloads() {
        let product = NewProduct {
            name: "Desk Lamp".to_string(),
            sku: Some("LAMP-01".to_string()),
            price: 24.5,
            stock_quantity: 3,
            ..Default::default()
        };
        assert!(product.validate().is_ok());

        let update = ProductUpdate {
            price: Some(-3.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(ProductUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_page_size() {
        assert!(validate_page_size(20).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
    }
}
