//! Types library for the custodial token exchange
//!
//! Value types shared by the registry and the balance ledger. Everything here
//! is plain data: validated on construction, immutable afterwards.
//!
//! # Modules
//! - `ids`: Identifiers (AccountId, AssetHandle)
//! - `ticker`: Fixed-width token symbols
//! - `numeric`: Integer base-unit amounts and decimal unit conversion
//! - `errors`: Validation errors for the types above

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod ticker;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::ticker::*;
}
