//! PostgreSQL adapters for the store and catalog ports.

mod catalog_reader;
mod license_repository;
mod order_repository;
mod payment_repository;

pub use catalog_reader::PostgresCatalogReader;
pub use license_repository::PostgresLicenseRepository;
pub use order_repository::PostgresOrderRepository;
pub use payment_repository::PostgresPaymentRepository;
