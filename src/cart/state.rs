use serde::{Deserialize, Serialize};

use super::CartError;
use crate::domain::{CartLine, Product};

/// Ordered cart lines plus an incrementally maintained total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: f64,
}

/// Immutable copy of the cart handed out by the cart service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: f64,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}

/// What [`Cart::reconcile`] changed on one line.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAdjustment {
    /// The product is no longer listed; the line was dropped.
    Removed { product_id: String },
    /// Fewer units are available than were in the cart.
    Clamped { product_id: String, from: u32, to: u32 },
    /// The listed price changed.
    Repriced { product_id: String, from: f64, to: f64 },
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a cart from persisted lines. Zero-quantity lines are dropped
    /// and the total is computed once.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let lines: Vec<CartLine> = lines.into_iter().filter(|line| line.quantity > 0).collect();
        let total = sum(&lines);
        Self { lines, total }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total: self.total,
        }
    }

    /// Adds one unit of `product`. New products go to the front of the cart.
    ///
    /// # Errors
    /// [`CartError::OutOfStock`] when no unit is available; the cart is left
    /// unchanged.
    pub fn add(&mut self, product: &Product) -> Result<&CartLine, CartError> {
        if product.is_out_of_stock() {
            return Err(CartError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        let index = match self.position(&product.id) {
            Some(index) => {
                self.lines[index].quantity += 1;
                index
            }
            None => {
                self.lines.insert(0, CartLine::new(product.clone(), 1));
                0
            }
        };
        self.total += self.lines[index].product.price;
        Ok(&self.lines[index])
    }

    /// Removes one unit of the product. Returns the remaining line, or `None`
    /// when that was the last unit and the line is gone.
    pub fn remove(&mut self, product_id: &str) -> Result<Option<&CartLine>, CartError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::NotInCart(product_id.to_string()))?;

        self.total -= self.lines[index].product.price;
        self.lines[index].quantity -= 1;
        if self.lines[index].quantity == 0 {
            self.lines.remove(index);
            if self.lines.is_empty() {
                self.total = 0.0;
            }
            return Ok(None);
        }
        Ok(Some(&self.lines[index]))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0.0;
    }

    /// Replaces the cart contents wholesale.
    pub fn replace(&mut self, lines: Vec<CartLine>) {
        *self = Self::from_lines(lines);
    }

    /// Whether the running total matches Σ price × quantity.
    pub fn is_consistent(&self) -> bool {
        let expected = sum(&self.lines);
        let tolerance = 1e-6 * expected.abs().max(1.0);
        (self.total - expected).abs() <= tolerance && self.lines.iter().all(|line| line.quantity > 0)
    }

    /// Aligns the cart with a freshly fetched catalog: lines for unlisted
    /// products are dropped, quantities are clamped to what is available and
    /// prices and product details are refreshed. The total is recomputed.
    pub fn reconcile(&mut self, catalog: &[Product]) -> Vec<CartAdjustment> {
        let mut adjustments = Vec::new();
        let mut kept = Vec::with_capacity(self.lines.len());

        for mut line in self.lines.drain(..) {
            let Some(current) = catalog.iter().find(|product| product.id == line.product.id) else {
                adjustments.push(CartAdjustment::Removed { product_id: line.product.id.clone() });
                continue;
            };

            let available = current.available();
            if available == 0 {
                adjustments.push(CartAdjustment::Removed { product_id: line.product.id.clone() });
                continue;
            }
            if line.quantity > available {
                adjustments.push(CartAdjustment::Clamped {
                    product_id: line.product.id.clone(),
                    from: line.quantity,
                    to: available,
                });
                line.quantity = available;
            }
            if line.product.price != current.price {
                adjustments.push(CartAdjustment::Repriced {
                    product_id: line.product.id.clone(),
                    from: line.product.price,
                    to: current.price,
                });
            }
            line.product = current.clone();
            kept.push(line);
        }

        self.lines = kept;
        self.total = sum(&self.lines);
        adjustments
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == product_id)
    }
}

fn sum(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn product(id: &str, price: f64, stock: u32) -> Product {
        Product::new(id, format!("Product {}", id), price, stock)
    }

    #[test]
    fn adding_twice_then_removing_once() {
        let mut cart = Cart::new();
        let mouse = product("p2", 50000.0, 10);

        cart.add(&mouse).unwrap();
        cart.add(&mouse).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), 100000.0);

        let remaining = cart.remove("p2").unwrap().map(|line| line.quantity);
        assert_eq!(remaining, Some(1));
        assert_eq!(cart.total(), 50000.0);
        assert!(cart.is_consistent());
    }

    #[test]
    fn out_of_stock_product_is_rejected() {
        let mut cart = Cart::new();
        let sold_out = product("p1", 100000.0, 5).with_reserved(5);

        let err = cart.add(&sold_out).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { ref product_id, .. } if product_id == "p1"));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn removing_last_unit_drops_the_line() {
        let mut cart = Cart::new();
        cart.add(&product("p1", 10.0, 3)).unwrap();
        cart.add(&product("p2", 20.0, 3)).unwrap();

        assert!(cart.remove("p1").unwrap().is_none());
        assert_eq!(cart.line_count(), 1);
        assert!(cart.lines().iter().all(|line| line.quantity > 0));
        assert!(matches!(cart.remove("p1"), Err(CartError::NotInCart(_))));
    }

    #[test]
    fn new_products_are_prepended() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1.0, 1)).unwrap();
        cart.add(&product("b", 1.0, 1)).unwrap();
        let ids: Vec<&str> = cart.lines().iter().map(|line| line.product.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn total_stays_consistent_over_random_sequences() {
        let catalog = vec![
            product("p1", 35000000.0, 50),
            product("p2", 19999.5, 150),
            product("p3", 2500000.0, 300),
            product("p4", 0.5, 100),
            product("p5", 3200000.0, 0),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut cart = Cart::new();
            for _ in 0..60 {
                let chosen = &catalog[rng.gen_range(0..catalog.len())];
                if rng.gen_bool(0.6) {
                    let _ = cart.add(chosen);
                } else {
                    let _ = cart.remove(&chosen.id);
                }
                assert!(cart.is_consistent(), "total drifted: {:?}", cart);
            }
        }
    }

    #[test]
    fn restored_cart_computes_its_total() {
        let cart = Cart::from_lines(vec![
            CartLine::new(product("p1", 100.0, 5), 2),
            CartLine::new(product("p2", 5.0, 5), 0),
        ]);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), 200.0);
    }

    #[test]
    fn reconcile_drops_clamps_and_reprices() {
        let mut cart = Cart::from_lines(vec![
            CartLine::new(product("gone", 10.0, 5), 1),
            CartLine::new(product("low", 10.0, 5), 4),
            CartLine::new(product("pricy", 10.0, 5), 1),
        ]);
        let catalog = vec![product("low", 10.0, 3).with_reserved(1), product("pricy", 12.0, 9)];

        let adjustments = cart.reconcile(&catalog);

        assert_eq!(
            adjustments,
            vec![
                CartAdjustment::Removed { product_id: "gone".into() },
                CartAdjustment::Clamped { product_id: "low".into(), from: 4, to: 2 },
                CartAdjustment::Repriced { product_id: "pricy".into(), from: 10.0, to: 12.0 },
            ]
        );
        assert_eq!(cart.total(), 32.0);
        assert!(cart.is_consistent());
    }
}
