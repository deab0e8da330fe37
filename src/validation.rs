use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::models::{Product, User};

/// Inline form errors keyed by field name. Iteration and `Display` go in
/// field-name order, not in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &'static str, value: &str, message: &'static str) {
        if value.trim().is_empty() {
            self.0.insert(field, message);
        }
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, message) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Whether the product dialog shows the site and category dropdowns.
/// When it does, both become required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFormOptions {
    pub require_references: bool,
}

pub fn validate_product(product: &Product, options: ProductFormOptions) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require("name", &product.name, "Name is required.");
    if product.price < Decimal::ZERO {
        errors.add("price", "Price must be zero or more.");
    }
    if options.require_references {
        if product.site_id.is_none() {
            errors.add("site_id", "Site is required.");
        }
        if product.category_id.is_none() {
            errors.add("category_id", "Category is required.");
        }
    }
    errors.into_result()
}

/// Password is only required when the user does not exist yet.
pub fn validate_user(user: &User) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require("first_name", &user.first_name, "First Name is required.");
    errors.require("last_name", &user.last_name, "Last Name is required.");
    errors.require("email", &user.email, "Email is required.");
    if user.id.is_none() {
        errors.require(
            "password",
            user.password.as_deref().unwrap_or_default(),
            "Password is required.",
        );
    }
    errors.into_result()
}
