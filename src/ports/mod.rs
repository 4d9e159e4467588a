//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the settlement domain and the outside world. Adapters implement them.
//!
//! ## Store Ports
//!
//! - `OrderRepository` - order persistence and conditional status moves
//! - `PaymentRepository` - immutable gateway charge records
//! - `LicenseRepository` - license issuance, listing, download counters
//!
//! ## Collaborator Ports
//!
//! - `PaymentGateway` - remote order creation and authoritative payment fetch
//! - `CatalogReader` - read-only track/license-option resolution
//! - `FileLinkProvider` - presigned download-link minting

mod catalog_reader;
mod file_link_provider;
mod license_repository;
mod order_repository;
mod payment_gateway;
mod payment_repository;

pub use catalog_reader::{CatalogReader, LicenseOption, Track};
pub use file_link_provider::{FileLinkProvider, LinkError};
pub use license_repository::{LicenseListFilter, LicenseRepository, LicenseSummary};
pub use order_repository::OrderRepository;
pub use payment_gateway::{GatewayError, GatewayPayment, PaymentGateway};
pub use payment_repository::PaymentRepository;
