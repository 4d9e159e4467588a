//! Settlement command and query handlers.
//!
//! One handler per operation. Command handlers mutate through repository
//! ports; query handlers only read. All collaborators arrive as `Arc<dyn>`
//! ports so the same handlers run against Postgres, the in-memory adapters,
//! or test mocks.

mod cancel_order;
mod create_order;
mod get_license_downloads;
mod list_licenses;
mod list_orders;
mod verify_payment;

#[cfg(test)]
pub(crate) mod test_support;

pub use cancel_order::{CancelOrderCommand, CancelOrderHandler};
pub use create_order::{CreateOrderCommand, CreateOrderHandler};
pub use get_license_downloads::{
    DownloadBundle, GetLicenseDownloadsHandler, GetLicenseDownloadsQuery, DOWNLOAD_LINK_TTL,
};
pub use list_licenses::{ListLicensesHandler, ListLicensesQuery};
pub use list_orders::{ListBuyerOrdersHandler, ListProducerOrdersHandler};
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler};
