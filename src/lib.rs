//! Client-side workflows of a small storefront: session and route guarding,
//! catalog, cart, checkout, payment, order history, live notifications and
//! the admin screens, all talking to the shop's REST backend.
//!
//! Long-lived state (the cart, a user's notification feed, local admin
//! collections) is owned by services that run as tokio tasks and are driven
//! through cloneable clients. [`app_system::StorefrontSystem`] starts and
//! wires them.

pub mod actor_framework;
pub mod actors;
pub mod admin;
pub mod api;
pub mod app_system;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod payment;
pub mod session;
pub mod storage;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
