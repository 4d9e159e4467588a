//! Adapters - Concrete implementations of the ports.
//!
//! - `postgres` - sqlx-backed store and catalog adapters
//! - `razorpay` - payment gateway client
//! - `storage` - HMAC-signed download link provider
//! - `memory` - in-memory store adapters for tests and local development

pub mod memory;
pub mod postgres;
pub mod razorpay;
pub mod storage;
