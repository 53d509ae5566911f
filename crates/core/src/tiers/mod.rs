//! Client and supplier registry.

pub mod error;
pub mod service;
pub mod types;

pub use error::TiersError;
pub use service::TiersService;
pub use types::{
    CreateThirdPartyInput, ThirdParty, ThirdPartyFilter, ThirdPartyKind, ThirdPartyStatus,
    UpdateThirdPartyInput,
};
