//! Razorpay payment gateway adapter.

mod razorpay_adapter;
mod types;

pub use razorpay_adapter::{RazorpayConfig, RazorpayGatewayAdapter};
