//! Domain value objects and types.
//!
//! Checksummed addresses, the network selector and exact base-unit
//! formatting. Value objects validate at construction so invalid data never
//! reaches an upstream call.

pub mod address;
pub mod errors;
pub mod network;
pub mod units;

pub use address::Address;
pub use errors::ValidationError;
pub use network::{Network, NetworkSelector};
pub use units::{format_ether, format_units, format_units_str, parse_base_units, NATIVE_DECIMALS};
