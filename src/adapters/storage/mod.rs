//! Managed object storage adapters.

mod signed_link_provider;

pub use signed_link_provider::{SignedLinkProvider, StorageLinkConfig};
