//! Cart page view models and templates.

use askama::Template;
use askama_web::WebTemplate;
use shopease_core::{Cart, CartTotals, LineItem, Price, ShippingPolicy};

/// Label shown instead of a zero shipping fee.
pub const FREE_SHIPPING_LABEL: &str = "FREE";

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
    pub image_url: String,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.to_string(),
            quantity: item.qty.get(),
            line_price: item.line_total().to_string(),
            image_url: format!(
                "https://via.placeholder.com/100x75?text={}",
                urlencoding::encode(&item.name)
            ),
        }
    }
}

/// Subtotal, shipping and total as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl SummaryView {
    /// Summary of an empty cart: every amount is zero.
    #[must_use]
    pub fn empty() -> Self {
        let zero = Price::ZERO.to_string();
        Self {
            subtotal: zero.clone(),
            shipping: zero.clone(),
            total: zero,
        }
    }
}

impl From<CartTotals> for SummaryView {
    fn from(totals: CartTotals) -> Self {
        Self {
            subtotal: totals.subtotal.to_string(),
            shipping: if totals.is_free_shipping() {
                FREE_SHIPPING_LABEL.to_string()
            } else {
                totals.shipping.to_string()
            },
            total: totals.total.to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            summary: SummaryView::empty(),
            item_count: 0,
        }
    }

    /// Derive the view from the cart and the shipping rules.
    #[must_use]
    pub fn build(cart: &Cart, shipping: &ShippingPolicy) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            summary: shipping.quote(cart).into(),
            item_count: cart.total_quantity(),
        }
    }

    /// Returns `true` when the empty-cart message should be shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub badge_count: u64,
}

/// Cart contents fragment template (for HTMX).
///
/// Rendered after every quantity change or removal; replaces the whole
/// cart listing and summary.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_contents.html")]
pub struct CartContentsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopease_core::{ProductId, Quantity};

    use super::*;

    fn cart(items: &[(&str, &str, u64, u32)]) -> Cart {
        items
            .iter()
            .map(|(id, name, price, qty)| {
                LineItem::new(
                    ProductId::parse(id).unwrap(),
                    *name,
                    Price::new(*price),
                    Quantity::new(*qty).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::build(&Cart::new(), &ShippingPolicy::default());
        assert!(view.is_empty());
        assert_eq!(view.summary, SummaryView::empty());
        assert_eq!(view.summary.total, "₱0");
    }

    #[test]
    fn test_free_shipping_label() {
        let view = CartView::build(
            &cart(&[("p1", "Widget", 1000, 3)]),
            &ShippingPolicy::default(),
        );
        assert_eq!(view.summary.subtotal, "₱3,000");
        assert_eq!(view.summary.shipping, "FREE");
        assert_eq!(view.summary.total, "₱3,000");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_flat_fee_shown() {
        let view = CartView::build(&cart(&[("p2", "Gadget", 500, 1)]), &ShippingPolicy::default());
        assert_eq!(view.summary.shipping, "₱150");
        assert_eq!(view.summary.total, "₱650");
    }

    #[test]
    fn test_item_view() {
        let view = CartView::build(
            &cart(&[("p1", "Desk Lamp", 1250, 2)]),
            &ShippingPolicy::default(),
        );
        let item = &view.items[0];
        assert_eq!(item.price, "₱1,250");
        assert_eq!(item.line_price, "₱2,500");
        assert!(item.image_url.ends_with("Desk%20Lamp"));
    }

    #[test]
    fn test_render_empty_page() {
        let html = CartShowTemplate {
            cart: CartView::empty(),
            badge_count: 0,
        }
        .render()
        .unwrap();
        assert!(html.contains("Your cart is empty."));
        assert!(html.contains("Start Shopping"));
    }

    #[test]
    fn test_render_contents_escapes_names() {
        let view = CartView::build(
            &cart(&[("p1", "<b>Bold</b>", 100, 1)]),
            &ShippingPolicy::default(),
        );
        let html = CartContentsTemplate { cart: view }.render().unwrap();
        assert!(!html.contains("<b>Bold</b>"));
        assert!(html.contains("cart-qty"));
        assert!(html.contains("cart-remove"));
    }

    #[test]
    fn test_render_count() {
        let html = CartCountTemplate { count: 7 }.render().unwrap();
        assert_eq!(html.trim(), "7");
    }
}
