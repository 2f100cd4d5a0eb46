//! Pocket Shop Core - Shared domain types.
//!
//! This crate provides the types used by every Pocket Shop component:
//! - `storefront` - Cart store, checkout flow and the HTTP storefront
//! - `cli` - Command-line driver for the same shop state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no timers.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, catalog records, theme and payment stage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
