use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::cart::{Cart, CartAdjustment, CartError, CartSnapshot};
use crate::clients::CartClient;
use crate::domain::{CartLine, Product};
use crate::messages::{CartRequest, ServiceResponse};
use crate::storage::CartMirror;

/// Owns the shopping cart. Every mutation is mirrored to the local store so a
/// restart picks the cart back up.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    mirror: CartMirror,
}

impl CartService {
    pub fn new(buffer_size: usize, mirror: CartMirror) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let cart = match mirror.load() {
            Ok(lines) => Cart::from_lines(lines),
            Err(e) => {
                warn!(error = %e, "Cart mirror unreadable, starting empty");
                Cart::new()
            }
        };
        let service = Self {
            receiver,
            cart,
            mirror,
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(lines = self.cart.line_count(), total = self.cart.total(), "CartService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::Add { product, respond_to } => self.handle_add(product, respond_to),
                CartRequest::Remove { product_id, respond_to } => self.handle_remove(product_id, respond_to),
                CartRequest::Clear { respond_to } => self.handle_clear(respond_to),
                CartRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.snapshot()));
                }
                CartRequest::Restore { lines, respond_to } => self.handle_restore(lines, respond_to),
                CartRequest::Reconcile { products, respond_to } => self.handle_reconcile(products, respond_to),
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }
        info!("CartService stopped");
    }

    #[instrument(fields(product_id = %product.id), skip(self, product, respond_to))]
    fn handle_add(&mut self, product: Product, respond_to: ServiceResponse<CartSnapshot, CartError>) {
        debug!("Processing add request");
        match self.cart.add(&product) {
            Ok(line) => info!(quantity = line.quantity, "Product added to cart"),
            Err(e) => {
                warn!(error = %e, "Add rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        }
        let _ = respond_to.send(self.persist());
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove(&mut self, product_id: String, respond_to: ServiceResponse<CartSnapshot, CartError>) {
        debug!("Processing remove request");
        match self.cart.remove(&product_id) {
            Ok(Some(line)) => info!(quantity = line.quantity, "Decremented cart line"),
            Ok(None) => info!("Cart line removed"),
            Err(e) => {
                debug!(error = %e, "Nothing to remove");
                let _ = respond_to.send(Err(e));
                return;
            }
        }
        let _ = respond_to.send(self.persist());
    }

    #[instrument(skip(self, respond_to))]
    fn handle_clear(&mut self, respond_to: ServiceResponse<CartSnapshot, CartError>) {
        self.cart.clear();
        info!("Cart cleared");
        let _ = respond_to.send(self.persist());
    }

    #[instrument(skip(self, lines, respond_to), fields(lines = lines.len()))]
    fn handle_restore(&mut self, lines: Vec<CartLine>, respond_to: ServiceResponse<CartSnapshot, CartError>) {
        self.cart.replace(lines);
        info!(total = self.cart.total(), "Cart restored");
        let _ = respond_to.send(self.persist());
    }

    #[instrument(skip(self, products, respond_to), fields(products = products.len()))]
    fn handle_reconcile(&mut self, products: Vec<Product>, respond_to: ServiceResponse<Vec<CartAdjustment>, CartError>) {
        let adjustments = self.cart.reconcile(&products);
        if adjustments.is_empty() {
            debug!("Cart matches catalog");
            let _ = respond_to.send(Ok(adjustments));
            return;
        }
        info!(adjustments = adjustments.len(), "Cart reconciled against catalog");
        let _ = respond_to.send(self.persist().map(|_| adjustments));
    }

    /// Writes the cart through to the mirror. An empty cart deletes the mirror.
    /// The in-memory state is kept even when the write fails.
    fn persist(&self) -> Result<CartSnapshot, CartError> {
        let written = if self.cart.is_empty() {
            self.mirror.clear()
        } else {
            self.mirror.save(self.cart.lines())
        };
        if let Err(e) = written {
            warn!(error = %e, "Cart mirror write failed");
            return Err(e.into());
        }
        Ok(self.cart.snapshot())
    }
}
