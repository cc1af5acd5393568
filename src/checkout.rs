use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, StoreApi};
use crate::cart::{CartAdjustment, CartError};
use crate::clients::CartClient;
use crate::domain::{OrderRequest, OrderResult, PaymentContext, PaymentType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Order was not accepted: {0}")]
    Rejected(ApiError),
    #[error("Could not refresh the catalog: {0}")]
    Resync(ApiError),
    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub buyer_name: Option<String>,
    /// Blank falls back to the configured default address.
    pub address: String,
    pub payment_type: PaymentType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Prepaid order; the payment view takes over with this context.
    AwaitingPayment(PaymentContext),
    /// Postpaid order; nothing left to do.
    Placed(OrderResult),
}

/// An accepted order. `cart_not_cleared` is set when the order went through
/// but the cart, or its persisted mirror, still holds the ordered lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub outcome: CheckoutOutcome,
    pub cart_not_cleared: Option<CartError>,
}

/// Values used to prefill the checkout form.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerDefaults {
    pub name: Option<String>,
    pub address: String,
}

/// Turns the cart into an order.
pub struct Checkout {
    api: Arc<dyn StoreApi>,
    cart: CartClient,
    default_address: String,
}

impl Checkout {
    pub fn new(api: Arc<dyn StoreApi>, cart: CartClient, default_address: impl Into<String>) -> Self {
        Self {
            api,
            cart,
            default_address: default_address.into(),
        }
    }

    /// Submits the cart as one order. The request is sent exactly once; on
    /// rejection the cart is left as it was.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, payment_type = ?request.payment_type))]
    pub async fn submit(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        let cart = self.cart.snapshot().await?;
        if cart.is_empty() {
            warn!("Checkout attempted with an empty cart");
            return Err(CheckoutError::EmptyCart);
        }

        let address = if request.address.trim().is_empty() {
            self.default_address.clone()
        } else {
            request.address
        };
        let order = OrderRequest::from_cart(
            request.user_id,
            Utc::now(),
            &cart.lines,
            cart.total,
            request.payment_type,
            address,
        );

        let result = match self.api.create_order(order.clone()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Order rejected, cart kept");
                return Err(CheckoutError::Rejected(e));
            }
        };
        info!(order_id = %result.id, total = order.total_amount, "Order placed");

        let cart_not_cleared = match self.cart.clear().await {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Order placed but the cart could not be cleared");
                Some(e)
            }
        };

        let outcome = if request.payment_type.requires_prepayment() {
            CheckoutOutcome::AwaitingPayment(PaymentContext {
                order_data: order,
                result,
                full_name: request.buyer_name,
            })
        } else {
            CheckoutOutcome::Placed(result)
        };
        Ok(CheckoutReceipt { outcome, cart_not_cleared })
    }

    /// Looks up the buyer's profile for the form. Any failure falls back to
    /// the configured defaults.
    #[instrument(skip(self))]
    pub async fn buyer_defaults(&self, user_id: &str) -> BuyerDefaults {
        match self.api.get_user(user_id.to_string()).await {
            Ok(user) => BuyerDefaults {
                name: Some(user.name).filter(|name| !name.trim().is_empty()),
                address: user
                    .address
                    .filter(|address| !address.trim().is_empty())
                    .unwrap_or_else(|| self.default_address.clone()),
            },
            Err(e) => {
                warn!(error = %e, "Could not load buyer profile");
                BuyerDefaults {
                    name: None,
                    address: self.default_address.clone(),
                }
            }
        }
    }

    /// Reloads the catalog and aligns the cart with it, typically after the
    /// server refused an order over stock or price.
    #[instrument(skip(self))]
    pub async fn resync(&self) -> Result<Vec<CartAdjustment>, CheckoutError> {
        let products = self.api.list_products().await.map_err(CheckoutError::Resync)?;
        let adjustments = self.cart.reconcile(products).await?;
        info!(adjustments = adjustments.len(), "Cart resynced with catalog");
        Ok(adjustments)
    }
}
