//! Application layer - use-case orchestration over domain and ports.
//!
//! Handlers wire domain logic to the outside world without knowing which
//! adapters sit behind the ports. This layer owns cross-cutting application
//! concerns such as pagination.

pub mod handlers;
pub mod pagination;
