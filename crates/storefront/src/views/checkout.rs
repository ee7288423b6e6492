//! Checkout page view models and templates.

use askama::Template;
use askama_web::WebTemplate;
use shopease_core::{
    Cart, CheckoutField, CheckoutForm, CheckoutPhase, LineItem, ShippingPolicy, ValidationError,
};

use super::cart::SummaryView;

/// Shown when a submission fails validation.
pub const VALIDATION_MESSAGE: &str = "Please fill in all required fields correctly.";

/// Shown once the order is placed.
pub const SUCCESS_MESSAGE: &str = "✓ Order placed successfully! Thank you for your purchase.";

/// Read-only order line.
#[derive(Debug, Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&LineItem> for CheckoutLineView {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.qty.get(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order summary beside the checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutSummaryView {
    pub items: Vec<CheckoutLineView>,
    pub summary: SummaryView,
}

impl CheckoutSummaryView {
    /// Derive the summary from the cart and the shipping rules.
    #[must_use]
    pub fn build(cart: &Cart, shipping: &ShippingPolicy) -> Self {
        if cart.is_empty() {
            return Self {
                items: Vec::new(),
                summary: SummaryView::empty(),
            };
        }
        Self {
            items: cart.iter().map(CheckoutLineView::from).collect(),
            summary: shipping.quote(cart).into(),
        }
    }

    /// Returns `true` when the empty-cart message should be shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Status banner above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub message: String,
    /// CSS modifier: `error` or `success`.
    pub kind: &'static str,
}

/// One form input.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub autocomplete: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub autofocus: bool,
    pub error: Option<String>,
}

impl FieldView {
    fn new(field: CheckoutField, value: &str) -> Self {
        let (input_type, autocomplete, placeholder) = match field {
            CheckoutField::FullName => ("text", "name", ""),
            CheckoutField::Email => ("email", "email", "you@example.com"),
            CheckoutField::Address => ("text", "street-address", ""),
            CheckoutField::City => ("text", "address-level2", ""),
            CheckoutField::PostalCode => ("text", "postal-code", ""),
            CheckoutField::CardNumber => ("text", "cc-number", "1234 5678 9012 3456"),
            CheckoutField::Expiry => ("text", "cc-exp", "MM/YY"),
            CheckoutField::Cvv => ("text", "cc-csc", "123"),
        };
        Self {
            name: field.name(),
            label: field.label(),
            input_type,
            autocomplete,
            placeholder,
            value: value.to_string(),
            autofocus: false,
            error: None,
        }
    }

    /// Returns `true` if the field failed validation.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.error.is_some()
    }
}

/// The checkout form as rendered for a given phase.
#[derive(Debug, Clone)]
pub struct CheckoutFormView {
    pub fields: Vec<FieldView>,
    pub status: Option<FormStatus>,
}

impl CheckoutFormView {
    /// Blank form with no status.
    #[must_use]
    pub fn editing() -> Self {
        Self::blank(None)
    }

    /// Form after a rejected submission.
    ///
    /// Keeps the submitted values, marks every invalid field and focuses the
    /// first one.
    #[must_use]
    pub fn invalid(form: &CheckoutForm, errors: &[ValidationError]) -> Self {
        let first = errors.first().map(ValidationError::field);
        let fields = CheckoutField::ALL
            .into_iter()
            .map(|field| {
                let mut view = FieldView::new(field, form.value(field));
                view.error = errors
                    .iter()
                    .find(|err| err.field() == field)
                    .map(ToString::to_string);
                view.autofocus = first == Some(field);
                view
            })
            .collect();
        Self {
            fields,
            status: Some(FormStatus {
                message: VALIDATION_MESSAGE.to_string(),
                kind: "error",
            }),
        }
    }

    /// Reset form after the order was placed.
    #[must_use]
    pub fn success() -> Self {
        Self::blank(Some(FormStatus {
            message: SUCCESS_MESSAGE.to_string(),
            kind: "success",
        }))
    }

    /// Form for a checkout phase.
    ///
    /// `Submitting` renders like `Editing`; it never outlives a request.
    #[must_use]
    pub fn for_phase(phase: CheckoutPhase, form: &CheckoutForm) -> Self {
        match phase {
            CheckoutPhase::Editing | CheckoutPhase::Submitting => Self::editing(),
            CheckoutPhase::Invalid { .. } => Self::invalid(form, &form.errors()),
            CheckoutPhase::Success => Self::success(),
        }
    }

    fn blank(status: Option<FormStatus>) -> Self {
        Self {
            fields: CheckoutField::ALL
                .into_iter()
                .map(|field| FieldView::new(field, ""))
                .collect(),
            status,
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub summary: CheckoutSummaryView,
    pub form: CheckoutFormView,
    pub badge_count: u64,
}
