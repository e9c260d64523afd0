//! Cryptographic utilities for ClickUp webhooks.
//!
//! This crate provides:
//! - HMAC-SHA256 signature generation
//! - Constant-time comparison for security
//! - Webhook signature verification with a non-failing result type
//! - A buffered webhook payload that stays readable after verification

#![warn(missing_docs)]

mod error;
mod hmac_impl;
mod timing;
pub mod webhook;

pub use error::{CryptoError, Result};
pub use hmac_impl::hmac_sha256;
pub use timing::constant_time_compare;
pub use webhook::{verify_webhook_signature, WebhookPayload, WebhookVerification, SIGNATURE_HEADER};
