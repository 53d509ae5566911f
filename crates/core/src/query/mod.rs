//! Cache-keyed balance queries.
//!
//! - `types` - Query key and result
//! - `source` - Balance providers
//! - `service` - Moka-backed query cache

pub mod service;
pub mod source;
pub mod types;

pub use service::BalanceQueryService;
pub use source::{BalanceSource, StaticBalanceSource};
pub use types::{BalanceData, BalanceQuery};
