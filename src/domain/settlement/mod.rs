//! Settlement domain - orders, payments, licenses, and signatures.
//!
//! The correctness-critical core of the marketplace: an Order moves through
//! a finite payment lifecycle, a cryptographic signature authorizes trust in
//! gateway-reported state, and exactly one License is issued per settled
//! order.

mod errors;
mod license;
mod order;
mod payment;
mod signature;

pub use errors::SettlementError;
pub use license::{generate_license_key, License};
pub use order::{Order, OrderNotes, OrderStatus, LICENSE_OPTION_ID_KEY, ORDER_EXPIRY_MINUTES};
pub use payment::{Payment, PaymentInstrument, CAPTURED_STATUS};
pub use signature::{sign_payment, PaymentSignatureVerifier};
