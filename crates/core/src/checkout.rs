//! Checkout form rules.
//!
//! Every field is required. Beyond presence only the email's structure is
//! checked; card details are not validated for correctness.

use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError};

/// A field of the checkout form, in the order it appears on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    FullName,
    Email,
    Address,
    City,
    PostalCode,
    CardNumber,
    Expiry,
    Cvv,
}

impl CheckoutField {
    /// All fields in form order.
    pub const ALL: [Self; 8] = [
        Self::FullName,
        Self::Email,
        Self::Address,
        Self::City,
        Self::PostalCode,
        Self::CardNumber,
        Self::Expiry,
        Self::Cvv,
    ];

    /// Form input name (also the element id).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postal_code",
            Self::CardNumber => "card",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::City => "City",
            Self::PostalCode => "Postal code",
            Self::CardNumber => "Card number",
            Self::Expiry => "Expiry (MM/YY)",
            Self::Cvv => "CVV",
        }
    }
}

/// Why a field failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{} is required", .0.label())]
    Missing(CheckoutField),
    /// The email is not structurally valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl ValidationError {
    /// The offending field.
    #[must_use]
    pub const fn field(&self) -> CheckoutField {
        match self {
            Self::Missing(field) => *field,
            Self::InvalidEmail(_) => CheckoutField::Email,
        }
    }
}

/// Values submitted with the checkout form.
///
/// Missing form keys deserialize as empty strings so a partial submission
/// reaches validation instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub card: String,
    pub expiry: String,
    pub cvv: String,
}

impl CheckoutForm {
    /// Current value of a field.
    #[must_use]
    pub fn value(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::FullName => &self.full_name,
            CheckoutField::Email => &self.email,
            CheckoutField::Address => &self.address,
            CheckoutField::City => &self.city,
            CheckoutField::PostalCode => &self.postal_code,
            CheckoutField::CardNumber => &self.card,
            CheckoutField::Expiry => &self.expiry,
            CheckoutField::Cvv => &self.cvv,
        }
    }

    /// Check a single field.
    ///
    /// # Errors
    ///
    /// Returns the reason the field is invalid.
    pub fn check(&self, field: CheckoutField) -> Result<(), ValidationError> {
        let value = self.value(field).trim();
        if value.is_empty() {
            return Err(ValidationError::Missing(field));
        }
        if field == CheckoutField::Email {
            Email::parse(value)?;
        }
        Ok(())
    }

    /// All validation failures, in form order.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        CheckoutField::ALL
            .into_iter()
            .filter_map(|field| self.check(field).err())
            .collect()
    }

    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns the failure of the first invalid field in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        CheckoutField::ALL
            .into_iter()
            .try_for_each(|field| self.check(field))
    }
}

/// Where a checkout attempt stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// The shopper is filling in the form.
    #[default]
    Editing,
    /// The last submission failed validation.
    Invalid {
        /// First invalid field, which receives focus.
        field: CheckoutField,
    },
    /// The order is being placed.
    Submitting,
    /// The order was placed. Terminal.
    Success,
}

impl CheckoutPhase {
    /// Returns `true` if a submission may be attempted from this phase.
    #[must_use]
    pub const fn accepts_submission(&self) -> bool {
        matches!(self, Self::Editing | Self::Invalid { .. })
    }

    /// Returns `true` once the order was placed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Success)
    }
}
