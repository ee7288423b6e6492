//! Demo catalog page.
//!
//! The storefront has no product backend. The catalog is a fixed list and
//! each add-to-cart form carries the product's id, name and price.

use askama::Template;
use askama_web::WebTemplate;
use shopease_core::Price;

/// A product in the demo catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub description: &'static str,
}

/// Products listed on the home page.
pub const CATALOG: &[CatalogProduct] = &[
    CatalogProduct {
        id: "p1",
        name: "Wireless Mouse",
        price: 1000,
        description: "Quiet clicks, two-month battery life.",
    },
    CatalogProduct {
        id: "p2",
        name: "USB-C Cable",
        price: 500,
        description: "Braided, one metre, 60 W charging.",
    },
    CatalogProduct {
        id: "p3",
        name: "Mechanical Keyboard",
        price: 3500,
        description: "Hot-swappable switches with a compact layout.",
    },
    CatalogProduct {
        id: "p4",
        name: "Laptop Stand",
        price: 1450,
        description: "Aluminium, adjustable height, folds flat.",
    },
];

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Raw amount submitted with the add-to-cart form.
    pub price: u64,
    pub price_label: String,
}

impl From<&CatalogProduct> for ProductView {
    fn from(product: &CatalogProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            price_label: Price::new(product.price).to_string(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub badge_count: u64,
}

impl HomeTemplate {
    /// Home page listing the whole catalog.
    #[must_use]
    pub fn new(badge_count: u64) -> Self {
        Self {
            products: CATALOG.iter().map(ProductView::from).collect(),
            badge_count,
        }
    }
}
