//! The payment view: confirms or cancels a prepaid order.
//!
//! The order context arrives from checkout (or order history) and is written
//! to session storage, so re-entering the view without navigation state
//! recovers the same order.

mod error;

pub use error::*;

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::StoreApi;
use crate::clients::CartClient;
use crate::domain::{CartLine, OrderRequest, OrderResult, PaymentContext, PaymentRecord, PaymentStatus};
use crate::session::Route;
use crate::storage::{keys, KeyValueStore, KeyValueStoreExt};

/// How the view obtained its order context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEntry {
    /// Handed over by navigation and persisted.
    Fresh,
    /// Read back from session storage.
    Recovered,
    /// Nothing to pay for.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub record: PaymentRecord,
    /// Number of lines put back into the cart on cancel.
    pub restored_lines: usize,
    pub next: Route,
}

pub struct PaymentFlow {
    api: Arc<dyn StoreApi>,
    store: Arc<dyn KeyValueStore>,
    cart: CartClient,
    context: Option<PaymentContext>,
    entry: PaymentEntry,
}

impl PaymentFlow {
    #[instrument(skip_all, fields(with_state = nav_state.is_some()))]
    pub fn enter(
        api: Arc<dyn StoreApi>,
        store: Arc<dyn KeyValueStore>,
        cart: CartClient,
        nav_state: Option<PaymentContext>,
    ) -> Result<Self, PaymentError> {
        let (context, entry) = match nav_state {
            Some(context) => {
                store.set_json(keys::ORDER_DATA, &context.order_data)?;
                store.set_json(keys::ORDER_RESULT, &context.result)?;
                info!(order_id = %context.order_id(), "Payment context stored");
                (Some(context), PaymentEntry::Fresh)
            }
            None => match recover(store.as_ref()) {
                Some(context) => {
                    info!(order_id = %context.order_id(), "Payment context recovered");
                    (Some(context), PaymentEntry::Recovered)
                }
                None => {
                    warn!("No order data found for payment");
                    (None, PaymentEntry::Unavailable)
                }
            },
        };
        Ok(Self {
            api,
            store,
            cart,
            context,
            entry,
        })
    }

    pub fn entry(&self) -> PaymentEntry {
        self.entry
    }

    pub fn context(&self) -> Option<&PaymentContext> {
        self.context.as_ref()
    }

    /// Records a successful payment and leaves the view.
    #[instrument(skip(self))]
    pub async fn confirm(&mut self) -> Result<PaymentOutcome, PaymentError> {
        let record = self.submit(PaymentStatus::Success).await?;
        info!(transaction_id = %record.transaction_id, "Payment confirmed");
        self.finish()?;
        Ok(PaymentOutcome {
            record,
            restored_lines: 0,
            next: Route::UserPage,
        })
    }

    /// Records a failed payment. With `restore_cart` the cart is replaced by
    /// exactly the order's line items. The persisted order data is kept.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self, restore_cart: bool) -> Result<PaymentOutcome, PaymentError> {
        let record = self.submit(PaymentStatus::Failed).await?;
        info!(transaction_id = %record.transaction_id, "Payment canceled");

        let mut restored_lines = 0;
        if restore_cart {
            let lines: Vec<CartLine> = self
                .context
                .as_ref()
                .map(|context| context.order_data.list_item_detail.iter().map(CartLine::from_order_item).collect())
                .unwrap_or_default();
            restored_lines = lines.len();
            self.cart.restore(lines).await?;
            info!(lines = restored_lines, "Cart restored from order");
        }

        // The order is still pending; a later visit recovers it.
        self.context = None;
        Ok(PaymentOutcome {
            record,
            restored_lines,
            next: Route::UserPage,
        })
    }

    /// Leaving without paying; `/` resolves to the login view.
    pub fn go_back(&self) -> Route {
        Route::from_path("/").unwrap_or(Route::Login)
    }

    async fn submit(&self, status: PaymentStatus) -> Result<PaymentRecord, PaymentError> {
        let context = self.context.as_ref().ok_or(PaymentError::NoOrderContext)?;
        let record = PaymentRecord::now(context.order_id(), context.amount(), status);
        if let Err(e) = self.api.create_payment(record.clone()).await {
            warn!(error = %e, order_id = %context.order_id(), "Payment submission failed");
            return Err(PaymentError::Submit(e));
        }
        Ok(record)
    }

    fn finish(&mut self) -> Result<(), PaymentError> {
        self.context = None;
        self.store.remove(keys::ORDER_DATA)?;
        self.store.remove(keys::ORDER_RESULT)?;
        Ok(())
    }
}

fn recover(store: &dyn KeyValueStore) -> Option<PaymentContext> {
    let order_data = store.get_json::<OrderRequest>(keys::ORDER_DATA);
    let result = store.get_json::<OrderResult>(keys::ORDER_RESULT);
    match (order_data, result) {
        (Ok(Some(order_data)), Ok(Some(result))) => Some(PaymentContext {
            order_data,
            result,
            full_name: None,
        }),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Stored payment context unreadable");
            None
        }
        _ => None,
    }
}
