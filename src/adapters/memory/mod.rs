//! In-memory adapters for the store and catalog ports.
//!
//! Back the same port contracts as the PostgreSQL adapters with plain
//! mutex-guarded maps. Used for integration tests and local development
//! without a database.

mod catalog_reader;
mod license_repository;
mod order_repository;
mod payment_repository;

use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode};

pub use catalog_reader::InMemoryCatalogReader;
pub use license_repository::InMemoryLicenseRepository;
pub use order_repository::InMemoryOrderRepository;
pub use payment_repository::InMemoryPaymentRepository;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "store lock poisoned"))
}
