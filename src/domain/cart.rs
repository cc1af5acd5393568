use serde::{Deserialize, Serialize};
use crate::domain::{OrderLineItem, Product};

/// One product entry in the cart paired with a quantity (always >= 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }

    /// The product name, or its id for lines rebuilt from an order.
    pub fn display_name(&self) -> &str {
        if self.product.name.trim().is_empty() {
            &self.product.id
        } else {
            &self.product.name
        }
    }

    /// Rebuilds a cart line from an order line item. Only the id and the
    /// price at order time are known; the rest is refreshed by reconciling
    /// against the catalog.
    pub fn from_order_item(item: &OrderLineItem) -> Self {
        let product = Product::new(item.product_id.clone(), String::new(), item.price_at_time, 0);
        Self {
            product,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restored_line_falls_back_to_product_id() {
        let item = OrderLineItem {
            product_id: "P7".to_string(),
            quantity: 3,
            price_at_time: 12_000.0,
        };
        let line = CartLine::from_order_item(&item);
        assert_eq!(line.display_name(), "P7");
        assert_eq!(line.line_total(), 36_000.0);

        let named = CartLine::new(Product::new("P7", "Trà xanh", 12_000.0, 4), 1);
        assert_eq!(named.display_name(), "Trà xanh");
    }
}
