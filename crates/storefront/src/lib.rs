//! Pocket Shop storefront library.
//!
//! Holds the cart store, checkout flow and HTTP routes as a library so the
//! server binary, the CLI and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notices;
pub mod routes;
pub mod shop;
pub mod state;
pub mod storage;
pub mod theme;
pub mod view;
