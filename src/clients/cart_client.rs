use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::cart::{CartAdjustment, CartError, CartSnapshot};
use crate::domain::{CartLine, Product};
use crate::messages::CartRequest;

/// Client for interacting with the cart service.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending request");
        let _ = self.sender.send(CartRequest::Shutdown).await;
    }
}

client_method!(CartClient => fn add(product: Product) -> CartSnapshot as CartRequest::Add, Error = CartError);
client_method!(CartClient => fn remove(product_id: String) -> CartSnapshot as CartRequest::Remove, Error = CartError);
client_method!(CartClient => fn clear() -> CartSnapshot as CartRequest::Clear, Error = CartError);
client_method!(CartClient => fn snapshot() -> CartSnapshot as CartRequest::Snapshot, Error = CartError);
client_method!(CartClient => fn restore(lines: Vec<CartLine>) -> CartSnapshot as CartRequest::Restore, Error = CartError);
client_method!(CartClient => fn reconcile(products: Vec<Product>) -> Vec<CartAdjustment> as CartRequest::Reconcile, Error = CartError);
